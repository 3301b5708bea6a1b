/// One scripting region, recorded as a sentinel token in the placeholder
/// document. `id` is sequential starting at 0 and doubles as the token's
/// numeric body (`token = "{prefix}{id}{suffix}"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderEntry {
    pub id: usize,
    /// Index into the region list this entry was built from. Always a
    /// `Region::Scripting`.
    pub region_index: usize,
    pub token: String,
}

/// The source with every scripting region replaced by its placeholder token,
/// plus the registry needed to undo that substitution.
#[derive(Debug, Clone)]
pub struct PlaceholderDocument {
    pub html: String,
    pub placeholders: Vec<PlaceholderEntry>,
}

/// Structural context of a placeholder's enclosing HTML, resolved by the
/// Placeholder Analyzer from a parse of `PlaceholderDocument::html`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderContext {
    pub element_depth: usize,
    pub inside_attribute: bool,
    pub inside_sensitive_element: bool,
    pub parent_element_name: String,
}

/// How a placeholder ended up being printed, recorded by the Structural
/// Emitter in print (document) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderPrintInfo {
    pub entry_id: usize,
    pub indentation_level: usize,
    pub inline: bool,
    pub in_attribute: bool,
    pub sensitive: bool,
}
