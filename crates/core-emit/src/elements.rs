//! Element classification tables (§4.5) and the small amount of start-tag
//! introspection the printer needs (tag name, attribute children).

use core_grammar::{Node, html_kind};

pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub const SENSITIVE_ELEMENTS: &[&str] = &["pre", "code", "textarea", "script", "style"];

pub const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdo", "big", "br", "button", "cite", "code", "dfn", "em", "i",
    "img", "input", "kbd", "label", "mark", "q", "samp", "small", "span", "strong", "sub", "sup",
    "textarea", "time", "var",
];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_sensitive(tag: &str) -> bool {
    SENSITIVE_ELEMENTS.contains(&tag)
}

pub fn is_inline(tag: &str) -> bool {
    INLINE_ELEMENTS.contains(&tag)
}

/// The `start_tag` or `self_closing_tag` child of an `element` node, if any.
pub fn opening_tag<'a>(element: &Node<'a>) -> Option<Node<'a>> {
    element.children().into_iter().find(|c| {
        matches!(c.kind(), html_kind::START_TAG | html_kind::SELF_CLOSING_TAG)
    })
}

pub fn end_tag<'a>(element: &Node<'a>) -> Option<Node<'a>> {
    element
        .children()
        .into_iter()
        .find(|c| matches!(c.kind(), html_kind::END_TAG | html_kind::ERRONEOUS_END_TAG))
}

pub fn tag_name(tag: &Node<'_>) -> String {
    if let Some(name) = tag.child_for_field("name") {
        return name.text().to_string();
    }
    for child in tag.children() {
        if child.kind() == html_kind::TAG_NAME {
            return child.text().to_string();
        }
    }
    String::new()
}

/// Named `attribute` children of a `start_tag`/`self_closing_tag` node, in
/// source order.
pub fn attributes<'a>(tag: &Node<'a>) -> Vec<Node<'a>> {
    tag.named_children()
        .into_iter()
        .filter(|c| c.kind() == html_kind::ATTRIBUTE)
        .collect()
}
