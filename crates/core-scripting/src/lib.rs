//! Scripting Indent Analyzer (§4.6): classifies how much a single `logic`
//! directive should shift the indent of its own line (`before`) and of
//! everything printed after it (`after`).
//!
//! Classification prefers the directive's own parse subtree — walking past
//! pure structural wrappers (`program`, `body_statement`, error-recovery
//! nodes) to the first node that actually names a construct — and falls
//! back to a leading-keyword heuristic on the trimmed code text when no
//! subtree is available or the subtree's first node doesn't match any rule.
//! Both paths agree on the canonical block-opener/closer keywords; they can
//! only diverge on constructs the fallback heuristic does not recognize,
//! which then fall through to `{0, 0}`.

use core_grammar::Node;
use core_model::{ScriptingFlavor, ScriptingRegion};

/// How a directive shifts indentation: `before` adjusts the directive's own
/// line, `after` carries forward into subsequent content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndentDelta {
    pub before: i32,
    pub after: i32,
}

impl IndentDelta {
    const ZERO: Self = Self { before: 0, after: 0 };

    fn opener() -> Self {
        Self { before: 0, after: 1 }
    }

    fn continuation() -> Self {
        Self { before: -1, after: 1 }
    }

    fn closer() -> Self {
        Self { before: -1, after: 0 }
    }
}

const BLOCK_OPENER_KINDS: &[&str] = &[
    "if", "unless", "while", "until", "case", "class", "module", "begin", "method",
    "singleton_method", "for",
];
const MODIFIER_KINDS: &[&str] = &[
    "if_modifier",
    "unless_modifier",
    "while_modifier",
    "until_modifier",
];
const BRANCH_CONTINUATION_KINDS: &[&str] = &["else", "elsif", "when", "rescue", "ensure"];
const BLOCK_EXPRESSION_KINDS: &[&str] = &["do_block", "block"];
const PASS_THROUGH_KINDS: &[&str] = &["program", "body_statement", "ERROR"];

/// Classifies `region`. Only `ScriptingFlavor::Logic` directives participate
/// — `output` and `comment` directives never shift indentation.
pub fn classify(region: &ScriptingRegion) -> IndentDelta {
    if region.flavor != ScriptingFlavor::Logic {
        return IndentDelta::ZERO;
    }

    if let Some(tree) = &region.parse_tree {
        if let Some(node) = first_significant_node(tree.root_node()) {
            if let Some(delta) = classify_node(&node) {
                return delta;
            }
        }
    }

    classify_fallback(&region.code)
}

fn first_significant_node<'a>(mut node: Node<'a>) -> Option<Node<'a>> {
    loop {
        if PASS_THROUGH_KINDS.contains(&node.kind()) {
            match node.named_child(0) {
                Some(child) => node = child,
                None => return None,
            }
        } else {
            return Some(node);
        }
    }
}

fn classify_node(node: &Node<'_>) -> Option<IndentDelta> {
    let kind = node.kind();
    if BLOCK_OPENER_KINDS.contains(&kind) {
        return Some(IndentDelta::opener());
    }
    if MODIFIER_KINDS.contains(&kind) {
        return Some(IndentDelta::ZERO);
    }
    if BRANCH_CONTINUATION_KINDS.contains(&kind) {
        return Some(IndentDelta::continuation());
    }
    if BLOCK_EXPRESSION_KINDS.contains(&kind) {
        return Some(IndentDelta::opener());
    }
    if kind == "call" || kind == "method_call" {
        if node
            .children()
            .iter()
            .any(|c| c.kind() == "do_block")
        {
            return Some(IndentDelta::opener());
        }
    }
    None
}

fn classify_fallback(code: &str) -> IndentDelta {
    let trimmed = code.trim();
    let first_word = trimmed.split_whitespace().next().unwrap_or("");

    if first_word == "end" {
        return IndentDelta::closer();
    }
    if matches!(first_word, "else" | "elsif" | "when" | "rescue" | "ensure") {
        return IndentDelta::continuation();
    }
    if matches!(
        first_word,
        "if" | "unless" | "while" | "until" | "for" | "case" | "class" | "module" | "begin" | "def"
    ) {
        return IndentDelta::opener();
    }
    if ends_with_do_block_opener(trimmed) {
        return IndentDelta::opener();
    }
    IndentDelta::ZERO
}

fn ends_with_do_block_opener(trimmed: &str) -> bool {
    if let Some(rest) = trimmed.strip_suffix("do") {
        return rest.is_empty() || rest.ends_with(char::is_whitespace);
    }
    if let Some(idx) = trimmed.rfind("do |") {
        return trimmed[idx + 2..].ends_with('|');
    }
    false
}
