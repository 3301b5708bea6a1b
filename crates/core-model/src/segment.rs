use crate::position::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Html,
    Scripting,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentMode {
    HtmlNormalized,
    ScriptingNormalized,
    Passthrough,
    Unknown,
}

/// One piece of the Composer's output, in emission order. `segments` in
/// `FormatterResult` is the authoritative record of how the output was
/// assembled; `output` is simply their concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSegment {
    pub index: usize,
    pub kind: SegmentKind,
    pub source_range: Option<Range>,
    pub formatted: String,
    pub indentation_level: usize,
    pub mode: SegmentMode,
}
