//! Immutable, fully-defaulted configuration consumed by every pipeline stage.
//!
//! `Config::default()` is the base record (§4.8 of the format spec). Callers
//! load a TOML file of partial overrides with [`ConfigOverrides`] and merge it
//! onto the default with [`Config::merge`]; merging never mutates the default
//! and missing leaves simply inherit it.
//!
//! The merge step accepts override values as-is — it does not validate or
//! clamp. Each consumer clamps to its own domain when it reads a field (e.g.
//! an indentation size of 0 or less becomes 1 wherever it is used to repeat a
//! string). No diagnostic is raised for an out-of-range override; this keeps
//! the merge a pure structural fold.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndentStyle {
    Space,
    Tab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlineStyle {
    Lf,
    Crlf,
    Preserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollapseWhitespace {
    Preserve,
    Conservative,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeWrapping {
    Preserve,
    Auto,
    ForceMultiLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScriptingFormat {
    Heuristic,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndentationConfig {
    pub size: i64,
    pub style: IndentStyle,
    pub continuation: i64,
}

impl IndentationConfig {
    /// `size`, clamped to at least 1 unit.
    pub fn effective_size(&self) -> usize {
        self.size.max(1) as usize
    }

    pub fn unit(&self) -> String {
        let ch = match self.style {
            IndentStyle::Space => ' ',
            IndentStyle::Tab => '\t',
        };
        ch.to_string().repeat(self.effective_size())
    }

    pub fn indent(&self, level: usize) -> String {
        self.unit().repeat(level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitespaceConfig {
    pub trim_trailing: bool,
    pub ensure_final_newline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HtmlConfig {
    pub collapse_whitespace: CollapseWhitespace,
    pub line_width: Option<i64>,
    pub attribute_wrapping: AttributeWrapping,
}

impl HtmlConfig {
    pub fn effective_line_width(&self) -> Option<usize> {
        self.line_width.map(|w| w.max(0) as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptingConfig {
    pub format: ScriptingFormat,
    pub line_width: Option<i64>,
}

impl ScriptingConfig {
    pub fn effective_line_width(&self) -> Option<usize> {
        self.line_width.map(|w| w.max(0) as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub indentation: IndentationConfig,
    pub newline: NewlineStyle,
    pub whitespace: WhitespaceConfig,
    pub html: HtmlConfig,
    pub scripting: ScriptingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indentation: IndentationConfig {
                size: 2,
                style: IndentStyle::Space,
                continuation: 2,
            },
            newline: NewlineStyle::Lf,
            whitespace: WhitespaceConfig {
                trim_trailing: true,
                ensure_final_newline: true,
            },
            html: HtmlConfig {
                collapse_whitespace: CollapseWhitespace::Conservative,
                line_width: Some(100),
                attribute_wrapping: AttributeWrapping::Preserve,
            },
            scripting: ScriptingConfig {
                format: ScriptingFormat::Heuristic,
                line_width: Some(100),
            },
        }
    }
}

/// Mirrors [`Config`] field-for-field but every leaf is optional, so a
/// partial TOML document deserializes cleanly. Unknown top-level keys are
/// ignored (forward-compatible with newer config files).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub indentation: IndentationOverrides,
    pub newline: Option<NewlineStyle>,
    #[serde(default)]
    pub whitespace: WhitespaceOverrides,
    #[serde(default)]
    pub html: HtmlOverrides,
    #[serde(default)]
    pub scripting: ScriptingOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndentationOverrides {
    pub size: Option<i64>,
    pub style: Option<IndentStyle>,
    pub continuation: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhitespaceOverrides {
    pub trim_trailing: Option<bool>,
    pub ensure_final_newline: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HtmlOverrides {
    pub collapse_whitespace: Option<CollapseWhitespace>,
    // `0` deserializes to `Some(0)` meaning "no wrap limit"; an absent key
    // means "inherit the default" instead.
    pub line_width: Option<i64>,
    pub attribute_wrapping: Option<AttributeWrapping>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptingOverrides {
    pub format: Option<ScriptingFormat>,
    pub line_width: Option<i64>,
}

impl Config {
    /// Fold `overrides` onto a fresh default, leaf by leaf. The default is
    /// never mutated; each present override leaf replaces the corresponding
    /// default leaf, everything else is inherited.
    pub fn merge(overrides: &ConfigOverrides) -> Self {
        let mut cfg = Self::default();

        if let Some(size) = overrides.indentation.size {
            cfg.indentation.size = size;
        }
        if let Some(style) = overrides.indentation.style {
            cfg.indentation.style = style;
        }
        if let Some(continuation) = overrides.indentation.continuation {
            cfg.indentation.continuation = continuation;
        }
        if let Some(newline) = overrides.newline {
            cfg.newline = newline;
        }
        if let Some(trim) = overrides.whitespace.trim_trailing {
            cfg.whitespace.trim_trailing = trim;
        }
        if let Some(ensure) = overrides.whitespace.ensure_final_newline {
            cfg.whitespace.ensure_final_newline = ensure;
        }
        if let Some(collapse) = overrides.html.collapse_whitespace {
            cfg.html.collapse_whitespace = collapse;
        }
        if let Some(width) = overrides.html.line_width {
            cfg.html.line_width = Some(width);
        }
        if let Some(wrap) = overrides.html.attribute_wrapping {
            cfg.html.attribute_wrapping = wrap;
        }
        if let Some(format) = overrides.scripting.format {
            cfg.scripting.format = format;
        }
        if let Some(width) = overrides.scripting.line_width {
            cfg.scripting.line_width = Some(width);
        }

        cfg
    }
}

/// Best-effort discovery of a project config file, preferring the current
/// directory before falling back to the platform config directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(".erbfmt.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("erbfmt").join("config.toml");
    }
    PathBuf::from(".erbfmt.toml")
}

/// Load and merge overrides from `path` (or the discovered default location).
/// A missing or unparsable file silently falls back to [`Config::default`];
/// this mirrors the resilience policy used for every other input-driven
/// failure in the pipeline — report, never throw, on malformed input.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    load_path(&path)
}

fn load_path(path: &Path) -> Result<Config> {
    let Ok(content) = std::fs::read_to_string(path) else {
        debug!(target: "config", path = %path.display(), "config_file_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigOverrides>(&content) {
        Ok(overrides) => Ok(Config::merge(&overrides)),
        Err(err) => {
            debug!(target: "config", path = %path.display(), error = %err, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.indentation.size, 2);
        assert_eq!(cfg.indentation.style, IndentStyle::Space);
        assert_eq!(cfg.indentation.continuation, 2);
        assert_eq!(cfg.newline, NewlineStyle::Lf);
        assert!(cfg.whitespace.trim_trailing);
        assert!(cfg.whitespace.ensure_final_newline);
        assert_eq!(cfg.html.collapse_whitespace, CollapseWhitespace::Conservative);
        assert_eq!(cfg.html.line_width, Some(100));
        assert_eq!(cfg.html.attribute_wrapping, AttributeWrapping::Preserve);
        assert_eq!(cfg.scripting.format, ScriptingFormat::Heuristic);
        assert_eq!(cfg.scripting.line_width, Some(100));
    }

    #[test]
    fn merge_is_a_pure_leaf_fold() {
        let overrides: ConfigOverrides = toml::from_str(
            r#"
            [indentation]
            size = 4

            [html]
            attribute-wrapping = "force-multi-line"
            "#,
        )
        .unwrap();
        let cfg = Config::merge(&overrides);
        assert_eq!(cfg.indentation.size, 4);
        assert_eq!(cfg.indentation.style, IndentStyle::Space); // inherited
        assert_eq!(cfg.html.attribute_wrapping, AttributeWrapping::ForceMultiLine);
        assert_eq!(cfg.html.line_width, Some(100)); // inherited

        // Default is untouched by the merge above.
        assert_eq!(Config::default().indentation.size, 2);
    }

    #[test]
    fn negative_indent_size_clamps_at_point_of_use_not_merge() {
        let overrides: ConfigOverrides = toml::from_str("[indentation]\nsize = -3\n").unwrap();
        let cfg = Config::merge(&overrides);
        assert_eq!(cfg.indentation.size, -3); // merge stores it as-is
        assert_eq!(cfg.indentation.effective_size(), 1); // consumer clamps
    }

    #[test]
    fn zero_line_width_means_unlimited() {
        let overrides: ConfigOverrides = toml::from_str("[html]\nline-width = 0\n").unwrap();
        let cfg = Config::merge(&overrides);
        assert_eq!(cfg.html.line_width, Some(0));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_from(Some(PathBuf::from("__does_not_exist__.toml"))).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_real_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[indentation]\nsize = 4\nstyle = \"tab\"\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.indentation.size, 4);
        assert_eq!(cfg.indentation.style, IndentStyle::Tab);
    }
}
