//! Structural Emitter (§4.5): walks the placeholder document's HTML tree and
//! prints a re-indented, attribute-aware rendering while leaving every
//! placeholder token untouched in place. Produces a [`PlaceholderPrintInfo`]
//! record per token occurrence, in print order, for the Composer to consume.
//!
//! The emitter only ever reasons about real HTML structure — element
//! nesting, void/sensitive/inline classification, attribute layout. It has
//! no notion of scripting-logic nesting; that half of the indentation comes
//! entirely from the Composer's running `scripting_indent` counter (§4.7,
//! §9). This keeps the two concerns — markup shape and logic shape —
//! decoupled, the way the source text's own two-pass renderer keeps them.

mod attrs;
mod elements;
mod text;

use core_config::Config;
use core_grammar::{Node, Tree, html_kind};
use core_model::PlaceholderPrintInfo;

pub struct EmitResult {
    pub html: String,
    pub prints: Vec<PlaceholderPrintInfo>,
}

/// Prints `tree` (a parsed [`core_model::PlaceholderDocument::html`]) under
/// `config`.
pub fn emit(tree: &Tree, config: &Config) -> EmitResult {
    let mut printer = Printer {
        source: tree.source(),
        config,
        output: String::new(),
        prints: Vec::new(),
    };
    for child in tree.root_node().named_children() {
        printer.render_block(&child, 0);
    }
    if !printer.output.is_empty() && !printer.output.ends_with('\n') {
        printer.output.push('\n');
    }
    EmitResult {
        html: printer.output,
        prints: printer.prints,
    }
}

struct Printer<'a> {
    source: &'a str,
    config: &'a Config,
    output: String,
    prints: Vec<PlaceholderPrintInfo>,
}

impl<'a> Printer<'a> {
    fn indent(&self, level: usize) -> String {
        self.config.indentation.indent(level)
    }

    fn record_tokens_in(&mut self, text: &str, depth: usize, inline: bool, in_attribute: bool, sensitive: bool) {
        for m in core_placeholder::scan(text) {
            self.prints.push(PlaceholderPrintInfo {
                entry_id: m.id,
                indentation_level: depth,
                inline,
                in_attribute,
                sensitive,
            });
        }
    }

    fn render_block(&mut self, node: &Node<'_>, depth: usize) {
        match node.kind() {
            html_kind::ELEMENT | html_kind::SCRIPT_ELEMENT | html_kind::STYLE_ELEMENT => {
                self.render_element_block(node, depth)
            }
            html_kind::TEXT => self.render_text_block(node, depth),
            _ => self.render_verbatim_line(node, depth),
        }
    }

    /// Comments, doctypes, and any node kind the printer has no dedicated
    /// rule for: emitted as a single trimmed line at `depth`. A placeholder
    /// token can in principle land inside one of these (a directive wrapped
    /// in an HTML comment); tokens are still tracked so the Composer's scan
    /// never encounters an untracked occurrence.
    fn render_verbatim_line(&mut self, node: &Node<'_>, depth: usize) {
        let text = node.text().trim();
        if text.is_empty() {
            return;
        }
        self.output.push_str(&self.indent(depth));
        self.record_tokens_in(text, depth, true, false, false);
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn render_text_block(&mut self, node: &Node<'_>, depth: usize) {
        let collapsed = text::collapse(node.text());
        if collapsed.is_empty() {
            return;
        }
        for line in collapsed.split('\n') {
            if line.is_empty() {
                continue;
            }
            let own_line = core_placeholder::is_tokens_only(line);
            self.output.push_str(&self.indent(depth));
            self.record_tokens_in(line, depth, !own_line, false, false);
            self.output.push_str(line);
            self.output.push('\n');
        }
    }

    fn render_inline_text(&mut self, node: &Node<'_>, depth: usize) -> String {
        let collapsed = text::collapse(node.text());
        self.record_tokens_in(&collapsed, depth, true, false, false);
        collapsed
    }

    fn meaningful_children<'t>(&self, node: &Node<'t>) -> Vec<Node<'t>> {
        self.structural_children(node)
            .into_iter()
            .filter(|c| {
                if c.kind() == html_kind::TEXT {
                    !text::collapse(c.text()).is_empty()
                } else {
                    true
                }
            })
            .collect()
    }

    /// Like [`Self::meaningful_children`] but keeps whitespace-only text
    /// nodes — the inline joiner needs them to tell a single separating
    /// space between two elements (`<b>a</b> <b>b</b>`) apart from two
    /// elements with nothing between them.
    fn structural_children<'t>(&self, node: &Node<'t>) -> Vec<Node<'t>> {
        node.named_children()
            .into_iter()
            .filter(|c| {
                !matches!(
                    c.kind(),
                    html_kind::START_TAG
                        | html_kind::END_TAG
                        | html_kind::SELF_CLOSING_TAG
                        | html_kind::ERRONEOUS_END_TAG
                )
            })
            .collect()
    }

    fn render_element_block(&mut self, node: &Node<'_>, depth: usize) {
        let Some(opening) = elements::opening_tag(node) else {
            self.render_verbatim_line(node, depth);
            return;
        };
        let tag_name = elements::tag_name(&opening);
        let self_closing = opening.kind() == html_kind::SELF_CLOSING_TAG;

        self.render_tag(&opening, &tag_name, depth);

        if self_closing {
            self.output.push('\n');
            return;
        }
        if elements::is_void(&tag_name) {
            self.output.push('\n');
            return;
        }
        if elements::is_sensitive(&tag_name) {
            self.render_sensitive_body(node, &opening, &tag_name, depth);
            return;
        }

        let children = self.meaningful_children(node);
        let end = elements::end_tag(node);
        let end_text = end_tag_text(end.as_ref(), &tag_name);

        match children.as_slice() {
            [] => {
                self.output.push_str(&end_text);
                self.output.push('\n');
            }
            [only] if only.kind() == html_kind::TEXT && !text::collapse(only.text()).contains('\n') => {
                let inline = self.render_inline_text(only, depth);
                self.output.push_str(&inline);
                self.output.push_str(&end_text);
                self.output.push('\n');
            }
            _ if elements::is_inline(&tag_name) => {
                let structural = self.structural_children(node);
                match self.render_inline_children(&structural, depth) {
                    Some(inline) => {
                        self.output.push_str(&inline);
                        self.output.push_str(&end_text);
                        self.output.push('\n');
                    }
                    None => self.render_children_block(&children, &end_text, depth),
                }
            }
            _ => self.render_children_block(&children, &end_text, depth),
        }
    }

    fn render_children_block(&mut self, children: &[Node<'_>], end_text: &str, depth: usize) {
        self.output.push('\n');
        for child in children {
            self.render_block(child, depth + 1);
        }
        self.output.push_str(&self.indent(depth));
        self.output.push_str(end_text);
        self.output.push('\n');
    }

    /// Attempts to print `children` of an inline element on a single line
    /// (§4.5: "its content is emitted on the same line as its open tag unless
    /// a child explicitly breaks"). A child "explicitly breaks" when it is a
    /// block-level element, a whitespace-sensitive element, or text whose
    /// collapsed form still spans multiple lines — any of those force the
    /// caller to fall back to the normal block rendering instead.
    fn render_inline_children(&mut self, children: &[Node<'_>], depth: usize) -> Option<String> {
        let mut out = String::new();
        let mut pending_space = false;
        for child in children {
            match child.kind() {
                html_kind::TEXT => {
                    let raw = child.text();
                    let collapsed = text::collapse(raw);
                    if collapsed.contains('\n') {
                        return None;
                    }
                    if !out.is_empty() && raw.starts_with(char::is_whitespace) {
                        pending_space = true;
                    }
                    if !collapsed.is_empty() {
                        if pending_space {
                            out.push(' ');
                        }
                        self.record_tokens_in(&collapsed, depth, true, false, false);
                        out.push_str(&collapsed);
                        pending_space = false;
                    }
                    if raw.ends_with(char::is_whitespace) {
                        pending_space = true;
                    }
                }
                html_kind::ELEMENT => {
                    let opening = elements::opening_tag(child)?;
                    let child_tag = elements::tag_name(&opening);
                    if elements::is_sensitive(&child_tag) || !elements::is_inline(&child_tag) {
                        return None;
                    }
                    let self_closing = opening.kind() == html_kind::SELF_CLOSING_TAG;
                    let mut rendered = self.render_inline_tag(&opening, &child_tag, self_closing);

                    if !(self_closing || elements::is_void(&child_tag)) {
                        let grandchildren = self.structural_children(child);
                        rendered.push_str(&self.render_inline_children(&grandchildren, depth)?);
                        let end = elements::end_tag(child);
                        rendered.push_str(&end_tag_text(end.as_ref(), &child_tag));
                    }

                    if pending_space {
                        out.push(' ');
                    }
                    out.push_str(&rendered);
                    pending_space = false;
                }
                _ => return None,
            }
        }
        Some(out)
    }

    /// Renders a start tag with inline attribute layout only — the layout
    /// decision in `render_tag` (preserve/auto/force-multi-line, line width)
    /// makes no sense for a tag that is itself mid-line.
    fn render_inline_tag(&mut self, tag: &Node<'_>, tag_name: &str, self_closing: bool) -> String {
        let raw_attrs = elements::attributes(tag);
        let normalized: Vec<String> = raw_attrs.iter().map(|a| attrs::normalize(a.text())).collect();
        let closer = if self_closing { "/>" } else { ">" };
        let mut out = format!("<{tag_name}");
        if !normalized.is_empty() {
            let joined = normalized.join(" ");
            self.record_tokens_in(&joined, 0, true, true, false);
            out.push(' ');
            out.push_str(&joined);
        }
        out.push_str(closer);
        out
    }

    fn render_sensitive_body(&mut self, node: &Node<'_>, opening: &Node<'_>, tag_name: &str, depth: usize) {
        let end = elements::end_tag(node);
        let inner_start = opening.range().end_byte;
        let inner_end = end
            .as_ref()
            .map(|e| e.range().start_byte)
            .unwrap_or_else(|| node.range().end_byte);
        let inner = self.source.get(inner_start..inner_end).unwrap_or("");

        self.record_tokens_in(inner, depth + 1, true, false, true);
        self.output.push_str(inner);

        match end {
            Some(e) => self.output.push_str(e.text()),
            None => {
                self.output.push_str("</");
                self.output.push_str(tag_name);
                self.output.push('>');
            }
        }
        self.output.push('\n');
    }

    fn render_tag(&mut self, tag: &Node<'_>, tag_name: &str, depth: usize) {
        let raw_attrs = elements::attributes(tag);
        let normalized: Vec<String> = raw_attrs.iter().map(|a| attrs::normalize(a.text())).collect();
        let self_closing = tag.kind() == html_kind::SELF_CLOSING_TAG;
        let closer = if self_closing { "/>" } else { ">" };
        let open = format!("<{tag_name}");

        self.output.push_str(&self.indent(depth));
        self.output.push_str(&open);

        if normalized.is_empty() {
            self.output.push_str(closer);
            return;
        }

        let inline_joined = normalized.join(" ");
        let indent_width = core_text::display_width(&self.indent(depth));
        let inline_width = indent_width
            + core_text::display_width(&open)
            + 1
            + core_text::display_width(&inline_joined)
            + core_text::display_width(closer);
        let original_break = attrs::original_has_linebreak(self.source, &raw_attrs);
        let wrap = attrs::should_wrap(&self.config.html, original_break, inline_width);

        if !wrap {
            self.output.push(' ');
            self.record_tokens_in(&inline_joined, 0, true, true, false);
            self.output.push_str(&inline_joined);
            self.output.push_str(closer);
        } else {
            self.output.push('\n');
            let attr_indent = self.indent(depth + 1);
            for attr in &normalized {
                self.output.push_str(&attr_indent);
                self.record_tokens_in(attr, 0, true, true, false);
                self.output.push_str(attr);
                self.output.push('\n');
            }
            self.output.push_str(&self.indent(depth));
            self.output.push_str(closer);
        }
    }
}

fn end_tag_text(end: Option<&Node<'_>>, tag_name: &str) -> String {
    match end {
        Some(e) => e.text().to_string(),
        None => format!("</{tag_name}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_grammar::Grammars;

    fn emit_document(html: &str) -> EmitResult {
        let g = Grammars::new().unwrap();
        let tree = g.parse_html(html).unwrap();
        emit(&tree, &Config::default())
    }

    #[test]
    fn void_element_has_no_close_tag() {
        let result = emit_document("<br>");
        assert_eq!(result.html, "<br>\n");
    }

    #[test]
    fn single_text_child_collapses_to_one_line() {
        let result = emit_document("<h1>   Welcome   </h1>");
        assert_eq!(result.html, "<h1>Welcome</h1>\n");
    }

    #[test]
    fn nested_element_without_text_goes_block() {
        let result = emit_document("<div>\n  <span>Hi</span>\n</div>");
        assert_eq!(result.html, "<div>\n  <span>Hi</span>\n</div>\n");
    }

    #[test]
    fn pre_content_is_copied_verbatim() {
        let result = emit_document("<pre>\n  line 1\n  line 2\n</pre>");
        assert_eq!(result.html, "<pre>\n  line 1\n  line 2\n</pre>\n");
    }

    #[test]
    fn empty_element_stays_on_one_line() {
        let result = emit_document("<div></div>");
        assert_eq!(result.html, "<div></div>\n");
    }

    #[test]
    fn single_attribute_stays_inline_by_default() {
        let result = emit_document(r#"<div id="x">hi</div>"#);
        assert_eq!(result.html, "<div id=\"x\">hi</div>\n");
    }

    #[test]
    fn output_always_ends_with_a_newline() {
        let result = emit_document("<div>text</div>");
        assert!(result.html.ends_with('\n'));
    }

    #[test]
    fn multi_child_inline_element_stays_on_one_line() {
        let result = emit_document("<span>hi <b>x</b></span>");
        assert_eq!(result.html, "<span>hi <b>x</b></span>\n");
    }

    #[test]
    fn inline_element_with_block_child_breaks() {
        let result = emit_document("<span>hi <div>x</div></span>");
        assert_eq!(result.html, "<span>\n  hi\n  <div>x</div>\n</span>\n");
    }
}
