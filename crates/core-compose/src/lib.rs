//! Composer (§4.7): sweeps the emitter's HTML (placeholder tokens still in
//! place) left to right, splicing each directive's original text back in —
//! re-indented for logic directives, trimmed verbatim for everything else —
//! and tracks a single running `scripting_indent` counter that carries the
//! logical nesting a block-opener/closer introduces into the surrounding
//! HTML. On an upstream HTML parse error it abandons structural composition
//! entirely and passes the source through unchanged (§4.7, §8.11).

use core_config::{Config, NewlineStyle};
use core_emit::EmitResult;
use core_model::{Diagnostic, PlaceholderDocument, PlaceholderPrintInfo, Region};
use core_model::{FormatSegment, SegmentKind, SegmentMode};
use std::collections::HashMap;

pub struct ComposeResult {
    pub output: String,
    pub segments: Vec<FormatSegment>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Composes the final output from the emitter's printed HTML. `diagnostics`
/// carries the Analyzer's findings forward; this stage only appends to it.
pub fn compose(
    source: &str,
    emitted: &EmitResult,
    document: &PlaceholderDocument,
    regions: &[Region],
    html_parse_error: bool,
    mut diagnostics: Vec<Diagnostic>,
    config: &Config,
) -> ComposeResult {
    if html_parse_error {
        let output = finalize(source.to_string(), config);
        let segment = FormatSegment {
            index: 0,
            kind: SegmentKind::Html,
            source_range: None,
            formatted: output.clone(),
            indentation_level: 0,
            mode: SegmentMode::Passthrough,
        };
        return ComposeResult {
            output,
            segments: vec![segment],
            diagnostics,
        };
    }

    let prints: HashMap<usize, PlaceholderPrintInfo> =
        emitted.prints.iter().map(|p| (p.entry_id, *p)).collect();

    let mut segments = Vec::new();
    let mut output = String::new();
    let mut cursor = 0usize;
    let mut scripting_indent: i64 = 0;

    for m in core_placeholder::scan(&emitted.html) {
        let html_fragment = &emitted.html[cursor..m.start];
        if !html_fragment.is_empty() {
            let at_line_start = output.is_empty() || output.ends_with('\n');
            let processed = process_html_fragment(html_fragment, scripting_indent, config, at_line_start);
            output.push_str(&processed);
            segments.push(FormatSegment {
                index: segments.len(),
                kind: SegmentKind::Html,
                source_range: None,
                formatted: processed,
                indentation_level: 0,
                mode: SegmentMode::HtmlNormalized,
            });
        }

        let Some(entry) = document.placeholders.get(m.id) else {
            diagnostics.push(Diagnostic::error(
                -1,
                format!("placeholder id {} has no registry entry", m.id),
            ));
            cursor = m.end;
            continue;
        };
        let Some(Region::Scripting(scripting_region)) = regions.get(entry.region_index) else {
            diagnostics.push(Diagnostic::error(
                entry.region_index as i64,
                "placeholder references a non-scripting region",
            ));
            cursor = m.end;
            continue;
        };
        let print_info = prints.get(&m.id).copied().unwrap_or(PlaceholderPrintInfo {
            entry_id: m.id,
            indentation_level: 0,
            inline: true,
            in_attribute: false,
            sensitive: false,
        });

        if print_info.inline || print_info.in_attribute {
            let formatted = scripting_region.text.trim().to_string();
            output.push_str(&formatted);
            segments.push(FormatSegment {
                index: segments.len(),
                kind: SegmentKind::Scripting,
                source_range: Some(scripting_region.range),
                formatted,
                indentation_level: print_info.indentation_level,
                mode: SegmentMode::ScriptingNormalized,
            });
        } else {
            let delta = core_scripting::classify(scripting_region);
            let effective_before = (scripting_indent + delta.before as i64).max(0);
            let total_indent = (print_info.indentation_level as i64 + effective_before).max(0) as usize;
            let indent_str = config.indentation.indent(total_indent);

            let normalized = normalize_newlines(&scripting_region.text, config.newline);
            let mut formatted = String::new();
            for (i, line) in normalized.split('\n').enumerate() {
                if i > 0 {
                    formatted.push('\n');
                }
                formatted.push_str(&indent_str);
                formatted.push_str(line.trim());
            }

            output.push_str(&formatted);
            segments.push(FormatSegment {
                index: segments.len(),
                kind: SegmentKind::Scripting,
                source_range: Some(scripting_region.range),
                formatted,
                indentation_level: total_indent,
                mode: SegmentMode::ScriptingNormalized,
            });

            scripting_indent = (effective_before + delta.after as i64).max(0);
        }

        cursor = m.end;
    }

    let tail = &emitted.html[cursor..];
    if !tail.is_empty() {
        let processed = if scripting_indent > 0 {
            let at_line_start = output.is_empty() || output.ends_with('\n');
            let extra = config.indentation.unit().repeat(scripting_indent as usize);
            add_indent_to_nonempty_lines(tail, &extra, at_line_start)
        } else {
            tail.to_string()
        };
        output.push_str(&processed);
        segments.push(FormatSegment {
            index: segments.len(),
            kind: SegmentKind::Html,
            source_range: None,
            formatted: processed,
            indentation_level: 0,
            mode: SegmentMode::HtmlNormalized,
        });
    }

    let output = finalize(output, config);
    ComposeResult {
        output,
        segments,
        diagnostics,
    }
}

fn process_html_fragment(
    fragment: &str,
    scripting_indent: i64,
    config: &Config,
    at_line_start: bool,
) -> String {
    let trimmed = trim_trailing_indent_before_token(fragment);
    if scripting_indent <= 0 {
        return trimmed;
    }
    let extra = config.indentation.unit().repeat(scripting_indent as usize);
    add_indent_to_nonempty_lines(&trimmed, &extra, at_line_start)
}

/// Drops a trailing run of spaces/tabs that immediately precedes a
/// placeholder token when the character before that run is a newline — the
/// emitter already wrote that run as the token's own indent, and the
/// scripting segment is about to supply its own.
fn trim_trailing_indent_before_token(fragment: &str) -> String {
    let without_run = fragment.trim_end_matches([' ', '\t']);
    if without_run.len() == fragment.len() {
        return fragment.to_string();
    }
    if without_run.is_empty() || without_run.ends_with('\n') {
        without_run.to_string()
    } else {
        fragment.to_string()
    }
}

/// Indents every nonempty line of `text` by `extra`, except the first line
/// when `at_line_start` is false — that line is a mid-line continuation
/// directly after whatever the Composer already wrote (commonly an inline
/// placeholder), not the start of new content, so it must not gain an extra
/// indent of its own. Lines after an internal `\n` always start fresh and
/// are indented regardless of `at_line_start`.
fn add_indent_to_nonempty_lines(text: &str, extra: &str, at_line_start: bool) -> String {
    if text.is_empty() {
        return String::new();
    }
    let ends_with_newline = text.ends_with('\n');
    let body = if ends_with_newline { &text[..text.len() - 1] } else { text };
    let mut out = String::with_capacity(text.len() + extra.len() * 4);
    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.is_empty() && (i > 0 || at_line_start) {
            out.push_str(extra);
        }
        out.push_str(line);
    }
    if ends_with_newline {
        out.push('\n');
    }
    out
}

fn normalize_newlines(text: &str, style: NewlineStyle) -> String {
    let lf = text.replace("\r\n", "\n").replace('\r', "\n");
    match style {
        NewlineStyle::Preserve => text.to_string(),
        NewlineStyle::Lf => lf,
        NewlineStyle::Crlf => lf.replace('\n', "\r\n"),
    }
}

fn finalize(output: String, config: &Config) -> String {
    let mut output = if config.whitespace.trim_trailing {
        trim_trailing_per_line(&output)
    } else {
        output
    };
    if config.whitespace.ensure_final_newline && !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

fn trim_trailing_per_line(text: &str) -> String {
    let ends_with_newline = text.ends_with('\n');
    let body = if ends_with_newline { &text[..text.len() - 1] } else { text };
    let trimmed: Vec<&str> = body
        .split('\n')
        .map(|line| line.trim_end_matches([' ', '\t']))
        .collect();
    let mut out = trimmed.join("\n");
    if ends_with_newline {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_analyzer::analyze;
    use core_grammar::Grammars;

    fn run(source: &str, config: &Config) -> ComposeResult {
        let g = Grammars::new().unwrap();
        let regions = core_regions::segment(&g, source).unwrap();
        let document = core_placeholder::build(&regions);
        let analysis = analyze(&g, &document).unwrap();
        let emitted = core_emit::emit(&analysis.tree, config);
        compose(
            source,
            &emitted,
            &document,
            &regions,
            analysis.html_parse_error,
            analysis.diagnostics,
            config,
        )
    }

    #[test]
    fn simple_conditional_reindents_body() {
        let source = "<% if @user %>\n<h1>Welcome, <%= @user.name %>!</h1>\n<% else %>\n<p>Please log in.</p>\n<% end %>";
        let result = run(source, &Config::default());
        assert_eq!(
            result.output,
            "<% if @user %>\n  <h1>Welcome, <%= @user.name %>!</h1>\n<% else %>\n  <p>Please log in.</p>\n<% end %>\n"
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn nested_conditionals_accumulate_indent() {
        let source = "<% if outer %>\n<% if inner %>\n<span>Hi</span>\n<% else %>\n<span>Bye</span>\n<% end %>\n<% end %>";
        let result = run(source, &Config::default());
        assert_eq!(
            result.output,
            "<% if outer %>\n  <% if inner %>\n    <span>Hi</span>\n  <% else %>\n    <span>Bye</span>\n  <% end %>\n<% end %>\n"
        );
    }

    #[test]
    fn pre_block_is_untouched() {
        let source = "<pre>\n  line 1\n  <% if c %>\n    yield\n  <% end %>\n</pre>";
        let result = run(source, &Config::default());
        assert_eq!(
            result.output,
            "<pre>\n  line 1\n  <% if c %>\n    yield\n  <% end %>\n</pre>\n"
        );
    }

    #[test]
    fn output_directive_collapses_inline() {
        let source = "<div>\n  <span>   Hello   <%= name %>   </span>\n</div>";
        let result = run(source, &Config::default());
        assert_eq!(result.output, "<div>\n  <span>Hello <%= name %></span>\n</div>\n");
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let source = "<% if @user %>\n<h1>Welcome, <%= @user.name %>!</h1>\n<% end %>";
        let first = run(source, &Config::default());
        let second = run(&first.output, &Config::default());
        assert_eq!(first.output, second.output);
    }

    #[test]
    fn inline_continuation_after_placeholder_is_not_reindented() {
        // Regression: the HTML fragment trailing an inline placeholder on the
        // same line ("!</h1>") must not pick up the block-opener's indent —
        // only lines that start fresh after a newline should.
        let source = "<% if @user %>\n<h1>Welcome, <%= @user.name %>!</h1>\n<% end %>";
        let result = run(source, &Config::default());
        assert!(result.output.contains("%>!</h1>"));
        assert!(!result.output.contains("%>  !</h1>"));
    }

    #[test]
    fn passthrough_on_html_parse_failure() {
        let source = "<div class=oops\"bad\">content</div>";
        let result = run(source, &Config::default());
        assert!(result.diagnostics.iter().any(|d| d.severity == core_model::Severity::Error));
    }
}
