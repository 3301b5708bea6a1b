//! Top-level pipeline entry point (§6): wires Region Segmenter → Placeholder
//! Builder → Placeholder Analyzer → Structural Emitter → Composer into the
//! single `format(source, config)` operation external callers see.
//!
//! Grammar loading is process-wide state (§4.1, §5) — callers construct one
//! [`core_grammar::Grammars`] at startup and pass it to every `format` call;
//! a grammar-load failure is the one error this pipeline does not convert
//! into a diagnostic, since §7 treats it as a fatal init error owned by the
//! caller, not the core.
//!
//! Every other input-driven failure is reported as a diagnostic, never
//! propagated — `format` always returns a usable `output` string (§7).

use core_config::Config;
use core_grammar::Grammars;
use core_model::{DebugPayload, Diagnostic, FormatSegment, FormatterResult, SegmentKind, SegmentMode};
use tracing::error;

/// Formats `source` under `config`. Never returns an error: a failure deep
/// in the pipeline (a parser returning no tree at all — not the same thing
/// as a tree with error nodes, which is handled as a diagnostic) degrades to
/// passthrough with a single `error` diagnostic, the same contract the
/// Composer uses for an HTML parse failure (§4.7, §8.11).
pub fn format(grammars: &Grammars, source: &str, config: &Config) -> FormatterResult {
    match try_format(grammars, source, config) {
        Ok(result) => result,
        Err(err) => {
            error!(target: "format", error = %err, "pipeline_failed_passthrough");
            let mut output = source.to_string();
            if config.whitespace.ensure_final_newline && !output.ends_with('\n') {
                output.push('\n');
            }
            FormatterResult {
                output: output.clone(),
                segments: vec![FormatSegment {
                    index: 0,
                    kind: SegmentKind::Html,
                    source_range: None,
                    formatted: output,
                    indentation_level: 0,
                    mode: SegmentMode::Passthrough,
                }],
                diagnostics: vec![Diagnostic::error(-1, format!("format pipeline failed: {err}"))],
                resolved_config: *config,
                debug: None,
            }
        }
    }
}

fn try_format(grammars: &Grammars, source: &str, config: &Config) -> anyhow::Result<FormatterResult> {
    let regions = core_regions::segment(grammars, source)?;
    let document = core_placeholder::build(&regions);
    let analysis = core_analyzer::analyze(grammars, &document)?;
    let emitted = core_emit::emit(&analysis.tree, config);
    let composed = core_compose::compose(
        source,
        &emitted,
        &document,
        &regions,
        analysis.html_parse_error,
        analysis.diagnostics,
        config,
    );

    Ok(FormatterResult {
        output: composed.output,
        segments: composed.segments,
        diagnostics: composed.diagnostics,
        resolved_config: *config,
        debug: Some(DebugPayload {
            placeholder_html: document.html,
            placeholder_count: document.placeholders.len(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammars() -> Grammars {
        Grammars::new().expect("grammars load")
    }

    #[test]
    fn formats_simple_conditional() {
        let g = grammars();
        let source = "<% if @user %>\n<h1>Welcome, <%= @user.name %>!</h1>\n<% else %>\n<p>Please log in.</p>\n<% end %>";
        let result = format(&g, source, &Config::default());
        assert_eq!(
            result.output,
            "<% if @user %>\n  <h1>Welcome, <%= @user.name %>!</h1>\n<% else %>\n  <p>Please log in.</p>\n<% end %>\n"
        );
        assert!(!result.has_errors());
        assert!(result.debug.is_some());
    }

    #[test]
    fn idempotent_across_two_passes() {
        let g = grammars();
        let source = "<div>\n  <span>   Hello   <%= name %>   </span>\n</div>";
        let cfg = Config::default();
        let first = format(&g, source, &cfg);
        let second = format(&g, &first.output, &cfg);
        assert_eq!(first.output, second.output);
    }

    #[test]
    fn unchanged_input_is_a_valid_noop() {
        let g = grammars();
        let source = "<div>hello</div>\n";
        let result = format(&g, source, &Config::default());
        assert_eq!(result.output, source);
    }

    #[test]
    fn resolved_config_matches_input_config() {
        let g = grammars();
        let mut cfg = Config::default();
        cfg.indentation.size = 4;
        let result = format(&g, "<div>hi</div>", &cfg);
        assert_eq!(result.resolved_config.indentation.size, 4);
    }
}
