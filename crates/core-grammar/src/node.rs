/// Thin, language-neutral wrapper around a `tree_sitter::Node`.
///
/// Every stage downstream of the Grammar Facade navigates trees through this
/// type rather than `tree_sitter` directly, so the grammar binding stays an
/// implementation detail the rest of the pipeline never names (§9 design
/// note: "a thin adapter that exposes only kind, byte range, row/column,
/// named children, parent, field lookup, and text slice").
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    inner: tree_sitter::Node<'tree>,
    source: &'tree str,
}

impl<'tree> Node<'tree> {
    pub(crate) fn new(inner: tree_sitter::Node<'tree>, source: &'tree str) -> Self {
        Self { inner, source }
    }

    pub fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    /// Byte + row/column span, in `tree_sitter`'s native representation.
    /// Callers that need the pipeline's own [`core_model::Range`] convert at
    /// the boundary where a `Node` is consumed into a `Region` or context
    /// record — keeping that conversion there, rather than here, is what
    /// lets this crate stay independent of `core-model` (it is a leaf the
    /// data model depends on, not the other way around).
    pub fn range(&self) -> tree_sitter::Range {
        self.inner.range()
    }

    pub fn text(&self) -> &'tree str {
        self.inner
            .utf8_text(self.source.as_bytes())
            .unwrap_or_default()
    }

    pub fn has_error(&self) -> bool {
        self.inner.has_error()
    }

    pub fn is_named(&self) -> bool {
        self.inner.is_named()
    }

    pub fn named_child_count(&self) -> usize {
        self.inner.named_child_count()
    }

    pub fn named_child(&self, index: usize) -> Option<Node<'tree>> {
        self.inner
            .named_child(index)
            .map(|n| Node::new(n, self.source))
    }

    pub fn named_children(&self) -> Vec<Node<'tree>> {
        let mut cursor = self.inner.walk();
        self.inner
            .named_children(&mut cursor)
            .map(|n| Node::new(n, self.source))
            .collect()
    }

    /// All children, named and anonymous (e.g. the literal `<%`/`%>` tokens
    /// that a directive node straddles but does not name).
    pub fn children(&self) -> Vec<Node<'tree>> {
        let mut cursor = self.inner.walk();
        self.inner
            .children(&mut cursor)
            .map(|n| Node::new(n, self.source))
            .collect()
    }

    pub fn child_for_field(&self, name: &str) -> Option<Node<'tree>> {
        self.inner
            .child_by_field_name(name)
            .map(|n| Node::new(n, self.source))
    }

    pub fn parent(&self) -> Option<Node<'tree>> {
        self.inner.parent().map(|n| Node::new(n, self.source))
    }

    pub fn descendant_for_byte_range(&self, start: usize, end: usize) -> Option<Node<'tree>> {
        self.inner
            .descendant_for_byte_range(start, end)
            .map(|n| Node::new(n, self.source))
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind())
            .field("range", &self.range())
            .finish()
    }
}

/// Owns a parsed tree plus the source text it was parsed from, so the
/// adapter's `text()` slices never outlive their backing string.
pub struct Tree {
    tree: tree_sitter::Tree,
    source: String,
}

impl Tree {
    pub(crate) fn new(tree: tree_sitter::Tree, source: String) -> Self {
        Self { tree, source }
    }

    pub fn root_node(&self) -> Node<'_> {
        Node::new(self.tree.root_node(), &self.source)
    }

    pub fn has_error(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
