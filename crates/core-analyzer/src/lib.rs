//! Placeholder Analyzer (§4.4): parses the placeholder document as HTML and
//! resolves, for every placeholder token, the structural context the
//! Structural Emitter needs — element depth, whitespace-sensitivity,
//! attribute membership, and the enclosing element's tag name.

use core_grammar::{Grammars, Node, Tree, html_kind};
use core_model::{Diagnostic, PlaceholderContext, PlaceholderDocument};

const SENSITIVE_TAGS: &[&str] = &["pre", "code", "textarea", "script", "style"];

pub struct AnalyzeResult {
    pub tree: Tree,
    /// Parallel to `document.placeholders`, same order.
    pub contexts: Vec<PlaceholderContext>,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the HTML parse of the placeholder document reported a tree
    /// error. This is the Composer's passthrough-fallback trigger (§4.7) —
    /// kept as its own field rather than inferred from `diagnostics` so the
    /// condition can't drift from the message text.
    pub html_parse_error: bool,
}

/// Parses `document.html` and resolves structural context for every
/// placeholder. An HTML parse error on the root yields a single `error`
/// diagnostic — the signal the Composer uses to fall back to passthrough
/// (§4.7) — but the analyzer still returns best-effort contexts so callers
/// that ignore the diagnostic get a usable (if unreliable) result.
pub fn analyze(grammars: &Grammars, document: &PlaceholderDocument) -> anyhow::Result<AnalyzeResult> {
    let tree = grammars.parse_html(&document.html)?;
    let mut diagnostics = Vec::new();
    let html_parse_error = tree.has_error();

    if html_parse_error {
        diagnostics.push(Diagnostic::error(
            -1,
            "HTML parse error in placeholder document",
        ));
    }

    let root = tree.root_node();
    let mut cursor = 0usize;
    let mut contexts = Vec::with_capacity(document.placeholders.len());

    for entry in &document.placeholders {
        let Some(offset) = document.html[cursor..].find(entry.token.as_str()) else {
            diagnostics.push(Diagnostic::error(
                entry.region_index as i64,
                format!("placeholder token {} not found in placeholder document", entry.token),
            ));
            contexts.push(PlaceholderContext::default());
            continue;
        };
        let start = cursor + offset;
        let end = start + entry.token.len();
        cursor = end;

        let context = root
            .descendant_for_byte_range(start, end)
            .map(|node| context_for(&node))
            .unwrap_or_default();
        contexts.push(context);
    }

    Ok(AnalyzeResult {
        tree,
        contexts,
        diagnostics,
        html_parse_error,
    })
}

fn context_for(node: &Node<'_>) -> PlaceholderContext {
    let mut element_depth = 0usize;
    let mut inside_attribute = false;
    let mut inside_sensitive_element = false;
    let mut parent_element_name = String::new();
    let mut found_parent = false;

    let mut current = Some(*node);
    while let Some(n) = current {
        match n.kind() {
            html_kind::ELEMENT => {
                element_depth += 1;
                if !found_parent {
                    if let Some(name) = tag_name_of(&n) {
                        if SENSITIVE_TAGS.contains(&name.as_str()) {
                            inside_sensitive_element = true;
                        }
                        parent_element_name = name;
                        found_parent = true;
                    }
                } else if let Some(name) = tag_name_of(&n) {
                    if SENSITIVE_TAGS.contains(&name.as_str()) {
                        inside_sensitive_element = true;
                    }
                }
            }
            html_kind::SCRIPT_ELEMENT | html_kind::STYLE_ELEMENT => {
                inside_sensitive_element = true;
                if !found_parent {
                    parent_element_name = if n.kind() == html_kind::SCRIPT_ELEMENT {
                        "script".to_string()
                    } else {
                        "style".to_string()
                    };
                    found_parent = true;
                }
            }
            html_kind::ATTRIBUTE | html_kind::ATTRIBUTE_VALUE | html_kind::QUOTED_ATTRIBUTE_VALUE => {
                inside_attribute = true;
            }
            _ => {}
        }
        current = n.parent();
    }

    PlaceholderContext {
        element_depth,
        inside_attribute,
        inside_sensitive_element,
        parent_element_name,
    }
}

fn tag_name_of(element: &Node<'_>) -> Option<String> {
    for child in element.children() {
        if matches!(child.kind(), html_kind::START_TAG | html_kind::SELF_CLOSING_TAG) {
            if let Some(name) = child.child_for_field("name") {
                return Some(name.text().to_string());
            }
            for grandchild in child.children() {
                if grandchild.kind() == html_kind::TAG_NAME {
                    return Some(grandchild.text().to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::Region;

    fn build_document(regions: &[Region]) -> PlaceholderDocument {
        core_placeholder::build(regions)
    }

    fn segment(src: &str) -> Vec<Region> {
        let g = Grammars::new().unwrap();
        core_regions::segment(&g, src).unwrap()
    }

    #[test]
    fn resolves_depth_and_parent_for_nested_element() {
        let regions = segment("<div><span><%= name %></span></div>");
        let doc = build_document(&regions);
        let g = Grammars::new().unwrap();
        let result = analyze(&g, &doc).unwrap();
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.contexts.len(), 1);
        let ctx = &result.contexts[0];
        assert_eq!(ctx.element_depth, 2);
        assert_eq!(ctx.parent_element_name, "span");
        assert!(!ctx.inside_attribute);
        assert!(!ctx.inside_sensitive_element);
    }

    #[test]
    fn detects_attribute_membership() {
        let regions = segment(r#"<div id="<%= id %>"></div>"#);
        let doc = build_document(&regions);
        let g = Grammars::new().unwrap();
        let result = analyze(&g, &doc).unwrap();
        assert!(result.contexts[0].inside_attribute);
    }

    #[test]
    fn detects_sensitive_pre_element() {
        let regions = segment("<pre><% if c %>yield<% end %></pre>");
        let doc = build_document(&regions);
        let g = Grammars::new().unwrap();
        let result = analyze(&g, &doc).unwrap();
        for ctx in &result.contexts {
            assert!(ctx.inside_sensitive_element);
        }
    }

    #[test]
    fn detects_sensitive_script_element() {
        let regions = segment("<script>var x = <%= x %>;</script>");
        let doc = build_document(&regions);
        let g = Grammars::new().unwrap();
        let result = analyze(&g, &doc).unwrap();
        assert!(result.contexts[0].inside_sensitive_element);
        assert_eq!(result.contexts[0].parent_element_name, "script");
    }

    #[test]
    fn top_level_placeholder_has_zero_depth() {
        let regions = segment("<%= name %>");
        let doc = build_document(&regions);
        let g = Grammars::new().unwrap();
        let result = analyze(&g, &doc).unwrap();
        assert_eq!(result.contexts[0].element_depth, 0);
        assert_eq!(result.contexts[0].parent_element_name, "");
    }
}
