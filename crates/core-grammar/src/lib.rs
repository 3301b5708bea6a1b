//! Grammar Facade (§4.1): synchronous parsing of source text into the three
//! trees the rest of the pipeline needs — the embedded-template tree, a
//! fresh HTML tree per placeholder document, and a fresh scripting tree per
//! directive body.
//!
//! Each `tree_sitter::Language` is loaded once per process inside
//! [`Grammars::new`]; `tree_sitter::Parser` instances are cheap and created
//! fresh for every `parse_*` call, matching the concurrency model in §5 (no
//! shared mutable state between calls, callers on separate threads must own
//! their own `Grammars`... in practice `Grammars` itself is `Send + Sync`
//! since `Language` is read-only after construction, so one instance may be
//! shared across threads and only the transient `Parser` is per-call).

mod node;

pub use node::{Node, Tree};

use anyhow::{Context, Result};
use tracing::error;

/// Node kinds the embedded-template grammar emits for a directive body.
pub mod template_kind {
    pub const CONTENT: &str = "content";
    pub const DIRECTIVE: &str = "directive";
    pub const OUTPUT_DIRECTIVE: &str = "output_directive";
    pub const COMMENT_DIRECTIVE: &str = "comment_directive";
    pub const CODE: &str = "code";
}

/// Node kinds consumed from the HTML grammar.
pub mod html_kind {
    pub const ELEMENT: &str = "element";
    pub const START_TAG: &str = "start_tag";
    pub const END_TAG: &str = "end_tag";
    pub const SELF_CLOSING_TAG: &str = "self_closing_tag";
    pub const ERRONEOUS_END_TAG: &str = "erroneous_end_tag";
    pub const SCRIPT_ELEMENT: &str = "script_element";
    pub const STYLE_ELEMENT: &str = "style_element";
    pub const DOCTYPE: &str = "doctype";
    pub const COMMENT: &str = "comment";
    pub const TEXT: &str = "text";
    pub const TAG_NAME: &str = "tag_name";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_NAME: &str = "attribute_name";
    pub const ATTRIBUTE_VALUE: &str = "attribute_value";
    pub const QUOTED_ATTRIBUTE_VALUE: &str = "quoted_attribute_value";
}

/// Process-wide, read-only grammar set. Construction loads each
/// `tree_sitter::Language` once; `parse_*` calls allocate a fresh `Parser`
/// per call and never mutate the `Grammars` value itself.
pub struct Grammars {
    template: tree_sitter::Language,
    html: tree_sitter::Language,
    scripting: tree_sitter::Language,
}

impl Grammars {
    pub fn new() -> Result<Self> {
        let template = tree_sitter::Language::from(tree_sitter_embedded_template::LANGUAGE);
        let html = tree_sitter::Language::from(tree_sitter_html::LANGUAGE);
        let scripting = tree_sitter::Language::from(tree_sitter_ruby::LANGUAGE);

        // A `Parser::set_language` failure here (ABI version mismatch
        // between the `tree-sitter` crate and a grammar crate) is a fatal
        // init error: it is reported once and the process should not
        // proceed to format anything (§4.1, §7).
        if let Err(err) = tree_sitter::Parser::new().set_language(&template) {
            error!(target: "grammar", error = %err, "template_grammar_load_failed");
            return Err(err).context("loading embedded-template grammar");
        }
        if let Err(err) = tree_sitter::Parser::new().set_language(&html) {
            error!(target: "grammar", error = %err, "html_grammar_load_failed");
            return Err(err).context("loading html grammar");
        }
        if let Err(err) = tree_sitter::Parser::new().set_language(&scripting) {
            error!(target: "grammar", error = %err, "scripting_grammar_load_failed");
            return Err(err).context("loading scripting grammar");
        }

        Ok(Self {
            template,
            html,
            scripting,
        })
    }

    pub fn parse_template(&self, text: &str) -> Result<Tree> {
        parse_with(&self.template, text)
    }

    pub fn parse_html(&self, text: &str) -> Result<Tree> {
        parse_with(&self.html, text)
    }

    /// Parses scripting code. Callers append a trailing newline first when
    /// the source grammar requires a terminator on the final statement
    /// (§4.2); this function parses exactly what it is given.
    pub fn parse_scripting(&self, text: &str) -> Result<Tree> {
        parse_with(&self.scripting, text)
    }
}

fn parse_with(language: &tree_sitter::Language, text: &str) -> Result<Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(language)
        .context("attaching language to parser")?;
    let tree = parser
        .parse(text, None)
        .context("grammar returned no tree")?;
    Ok(Tree::new(tree, text.to_string()))
}
