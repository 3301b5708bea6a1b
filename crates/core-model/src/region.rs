use crate::position::Range;

/// Flavor of a scripting directive, carried through from the opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptingFlavor {
    /// `<% ... %>` — code only, no output.
    Logic,
    /// `<%= ... %>` — expression interpolation.
    Output,
    /// `<%# ... %>` — comment, never executed.
    Comment,
    /// Delimiter pair the segmenter did not recognize; treated conservatively.
    Unknown,
}

/// A span of plain HTML markup between (or around) scripting directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRegion {
    pub range: Range,
    pub text: String,
}

/// A single `<% ... %>` / `<%= ... %>` / `<%# ... %>` directive.
#[derive(Debug, Clone)]
pub struct ScriptingRegion {
    pub range: Range,
    /// Full source slice, delimiters included.
    pub text: String,
    pub flavor: ScriptingFlavor,
    pub open_delim: String,
    pub close_delim: String,
    /// Inner code, trimmed of surrounding whitespace.
    pub code: String,
    /// Byte range of `code` within the source, when the directive has a body.
    pub code_range: Option<Range>,
    /// Parsed scripting-language tree for `code`, when non-empty.
    pub parse_tree: Option<core_grammar::Tree>,
}

impl PartialEq for ScriptingRegion {
    fn eq(&self, other: &Self) -> bool {
        self.range == other.range
            && self.text == other.text
            && self.flavor == other.flavor
            && self.open_delim == other.open_delim
            && self.close_delim == other.close_delim
            && self.code == other.code
            && self.code_range == other.code_range
    }
}

/// A template-tree node whose kind the segmenter did not map to a known
/// variant. Carried through verbatim so region tiling still holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegion {
    pub range: Range,
    pub text: String,
    pub node_kind: String,
}

/// One tile of the source, in document order. Concatenating every region's
/// `text` reproduces the source byte-for-byte (the tiling invariant, §8.1).
#[derive(Debug, Clone)]
pub enum Region {
    Html(HtmlRegion),
    Scripting(ScriptingRegion),
    Unknown(UnknownRegion),
}

impl Region {
    pub fn range(&self) -> Range {
        match self {
            Region::Html(r) => r.range,
            Region::Scripting(r) => r.range,
            Region::Unknown(r) => r.range,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Region::Html(r) => &r.text,
            Region::Scripting(r) => &r.text,
            Region::Unknown(r) => &r.text,
        }
    }

    pub fn is_scripting(&self) -> bool {
        matches!(self, Region::Scripting(_))
    }

    pub fn as_scripting(&self) -> Option<&ScriptingRegion> {
        match self {
            Region::Scripting(r) => Some(r),
            _ => None,
        }
    }
}
