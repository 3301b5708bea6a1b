use crate::diagnostic::Diagnostic;
use crate::segment::FormatSegment;
use core_config::Config;

/// Optional debug payload surfaced for tooling that wants to inspect the
/// intermediate placeholder document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugPayload {
    pub placeholder_html: String,
    pub placeholder_count: usize,
}

/// The sole output of `format(source, config)`.
#[derive(Debug, Clone)]
pub struct FormatterResult {
    pub output: String,
    pub segments: Vec<FormatSegment>,
    pub diagnostics: Vec<Diagnostic>,
    pub resolved_config: Config,
    pub debug: Option<DebugPayload>,
}

impl FormatterResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == crate::Severity::Error)
    }
}
