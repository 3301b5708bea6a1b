//! Shared data model for the embedded-template formatter pipeline.
//!
//! Every stage (region segmentation, placeholder substitution, HTML emission,
//! scripting indent analysis, composition) consumes and produces the types
//! defined here. Values are produced once per `format` call and handed
//! downstream read-only; nothing in this crate mutates a value another stage
//! already returned.

mod diagnostic;
mod placeholder;
mod position;
mod region;
mod result;
mod segment;

pub use diagnostic::{Diagnostic, Severity};
pub use placeholder::{PlaceholderContext, PlaceholderDocument, PlaceholderEntry, PlaceholderPrintInfo};
pub use position::{Position, Range};
pub use region::{HtmlRegion, Region, ScriptingFlavor, ScriptingRegion, UnknownRegion};
pub use result::{DebugPayload, FormatterResult};
pub use segment::{FormatSegment, SegmentKind, SegmentMode};
