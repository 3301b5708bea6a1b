//! Attribute layout (§4.5): normalisation of individual attributes and the
//! preserve/auto/force-multi-line wrapping policy.

use core_config::{AttributeWrapping, HtmlConfig};
use core_grammar::Node;

/// Collapses whitespace outside quoted spans and trims the ends. Attribute
/// *values* are left untouched once inside a quote — only the layout around
/// `=` may change.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_single = false;
    let mut in_double = false;
    for c in raw.trim().chars() {
        if c == '\'' && !in_double {
            in_single = !in_single;
            out.push(c);
            continue;
        }
        if c == '"' && !in_single {
            in_double = !in_double;
            out.push(c);
            continue;
        }
        if !in_single && !in_double && c.is_whitespace() {
            continue;
        }
        out.push(c);
    }
    out
}

/// Whether the source slice spanning `attrs` (first to last, inclusive)
/// contained a line break, read before any collapsing (§9: "Implementations
/// must read that slice before any collapsing").
pub fn original_has_linebreak(source: &str, attrs: &[Node<'_>]) -> bool {
    let (Some(first), Some(last)) = (attrs.first(), attrs.last()) else {
        return false;
    };
    let start = first.range().start_byte;
    let end = last.range().end_byte;
    source
        .get(start..end)
        .map(|slice| slice.contains('\n'))
        .unwrap_or(false)
}

/// Decides whether attributes should wrap onto their own lines.
pub fn should_wrap(
    config: &HtmlConfig,
    original_break: bool,
    inline_tag_width: usize,
) -> bool {
    match config.attribute_wrapping {
        AttributeWrapping::ForceMultiLine => true,
        AttributeWrapping::Preserve => original_break,
        AttributeWrapping::Auto => {
            original_break
                || config
                    .effective_line_width()
                    .map(|w| w > 0 && inline_tag_width > w)
                    .unwrap_or(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::{CollapseWhitespace, Config};

    #[test]
    fn normalize_removes_space_around_equals() {
        assert_eq!(normalize(r#"id = "x""#), r#"id="x""#);
    }

    #[test]
    fn normalize_preserves_space_inside_quotes() {
        assert_eq!(normalize(r#"class = "a b  c""#), r#"class="a b  c""#);
    }

    #[test]
    fn preserve_policy_only_wraps_on_original_break() {
        let cfg = Config::default().html;
        assert!(!should_wrap(&cfg, false, 9999));
        assert!(should_wrap(&cfg, true, 1));
    }

    #[test]
    fn auto_policy_wraps_on_width_overflow() {
        let mut cfg = Config::default().html;
        cfg.attribute_wrapping = core_config::AttributeWrapping::Auto;
        cfg.line_width = Some(20);
        cfg.collapse_whitespace = CollapseWhitespace::Conservative;
        assert!(should_wrap(&cfg, false, 50));
        assert!(!should_wrap(&cfg, false, 10));
    }
}
