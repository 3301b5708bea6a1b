//! Region Segmenter (§4.2): walks the embedded-template tree's top-level
//! children and produces the ordered, tiling region list every later stage
//! builds on.

use core_grammar::{Grammars, Node, template_kind};
use core_model::{
    Diagnostic, HtmlRegion, Position, Range, Region, ScriptingFlavor, ScriptingRegion,
    UnknownRegion,
};
use tracing::warn;

fn to_position(p: tree_sitter::Point, byte: usize) -> Position {
    Position::new(byte, p.row, p.column)
}

fn to_range(r: tree_sitter::Range) -> Range {
    Range::new(
        to_position(r.start_point, r.start_byte),
        to_position(r.end_point, r.end_byte),
    )
}

/// Segments `source` into an ordered, tiling list of regions, using
/// `grammars` to parse both the template tree and (for non-empty directive
/// bodies) the scripting subtree.
///
/// A template-grammar parse error is not raised as a diagnostic here — the
/// segmenter still walks whatever tree it was given and returns a
/// best-effort region list (§4.2, §7); the error surfaces later if it
/// renders the placeholder document unparsable as HTML.
pub fn segment(grammars: &Grammars, source: &str) -> anyhow::Result<Vec<Region>> {
    let tree = grammars.parse_template(source)?;
    let root = tree.root_node();

    let mut regions = Vec::with_capacity(root.named_child_count());
    for child in root.named_children() {
        regions.push(region_for(grammars, &child));
    }
    Ok(regions)
}

fn region_for(grammars: &Grammars, node: &Node<'_>) -> Region {
    match node.kind() {
        template_kind::CONTENT => Region::Html(HtmlRegion {
            range: to_range(node.range()),
            text: node.text().to_string(),
        }),
        template_kind::DIRECTIVE => {
            Region::Scripting(scripting_region(grammars, node, ScriptingFlavor::Logic))
        }
        template_kind::OUTPUT_DIRECTIVE => {
            Region::Scripting(scripting_region(grammars, node, ScriptingFlavor::Output))
        }
        template_kind::COMMENT_DIRECTIVE => {
            Region::Scripting(scripting_region(grammars, node, ScriptingFlavor::Comment))
        }
        other => Region::Unknown(UnknownRegion {
            range: to_range(node.range()),
            text: node.text().to_string(),
            node_kind: other.to_string(),
        }),
    }
}

fn scripting_region(grammars: &Grammars, node: &Node<'_>, flavor: ScriptingFlavor) -> ScriptingRegion {
    let range = to_range(node.range());
    let text = node.text().to_string();
    let node_start = node.range().start_byte;

    let code_node = node
        .named_children()
        .into_iter()
        .find(|c| c.kind() == template_kind::CODE);

    let (open_delim, close_delim, code, code_range) = match &code_node {
        Some(code_node) => {
            let code_range = code_node.range();
            let open_len = code_range.start_byte.saturating_sub(node_start);
            let close_start = code_range.end_byte.saturating_sub(node_start);
            let open_delim = text.get(..open_len).unwrap_or_default().to_string();
            let close_delim = text.get(close_start..).unwrap_or_default().to_string();
            let code = code_node.text().trim().to_string();
            (open_delim, close_delim, code, Some(to_range(code_range)))
        }
        None => {
            let (open, close) = default_delimiters(flavor);
            (open.to_string(), close.to_string(), String::new(), None)
        }
    };

    let parse_tree = if code.is_empty() {
        None
    } else if matches!(flavor, ScriptingFlavor::Logic | ScriptingFlavor::Output) {
        // Grammars that require a statement terminator need a trailing
        // newline appended; this never changes `code` itself, only what we
        // feed the scripting parser (§4.2).
        let probe = format!("{code}\n");
        match grammars.parse_scripting(&probe) {
            Ok(tree) => Some(tree),
            Err(err) => {
                warn!(target: "regions", error = %err, "scripting_subtree_parse_failed");
                None
            }
        }
    } else {
        None
    };

    ScriptingRegion {
        range,
        text,
        flavor,
        open_delim,
        close_delim,
        code,
        code_range,
        parse_tree,
    }
}

fn default_delimiters(flavor: ScriptingFlavor) -> (&'static str, &'static str) {
    match flavor {
        ScriptingFlavor::Logic => ("<%", "%>"),
        ScriptingFlavor::Output => ("<%=", "%>"),
        ScriptingFlavor::Comment => ("<%#", "%>"),
        ScriptingFlavor::Unknown => ("<%", "%>"),
    }
}

/// Verifies the tiling invariant (§8.1): concatenating every region's text
/// must reproduce `source` exactly. Intended for tests and debug assertions,
/// not the hot path.
pub fn check_tiling(source: &str, regions: &[Region]) -> Result<(), Diagnostic> {
    let mut rebuilt = String::with_capacity(source.len());
    for region in regions {
        rebuilt.push_str(region.text());
    }
    if rebuilt == source {
        Ok(())
    } else {
        Err(Diagnostic::error(
            -1,
            "region list does not tile the source exactly",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammars() -> Grammars {
        Grammars::new().expect("grammars load")
    }

    #[test]
    fn tiles_simple_conditional() {
        let src = "<% if @user %>\n<h1>Welcome, <%= @user.name %>!</h1>\n<% else %>\n<p>Please log in.</p>\n<% end %>";
        let g = grammars();
        let regions = segment(&g, src).unwrap();
        check_tiling(src, &regions).unwrap();
        let scripting: Vec<_> = regions.iter().filter(|r| r.is_scripting()).collect();
        assert_eq!(scripting.len(), 4); // if, output, else, end
    }

    #[test]
    fn classifies_flavors() {
        let src = "<%# comment %><% x = 1 %><%= x %>";
        let g = grammars();
        let regions = segment(&g, src).unwrap();
        let flavors: Vec<_> = regions
            .iter()
            .filter_map(|r| r.as_scripting())
            .map(|r| r.flavor)
            .collect();
        assert_eq!(
            flavors,
            vec![
                ScriptingFlavor::Comment,
                ScriptingFlavor::Logic,
                ScriptingFlavor::Output
            ]
        );
    }

    #[test]
    fn empty_directive_has_no_subtree() {
        let src = "<%%>";
        let g = grammars();
        let regions = segment(&g, src).unwrap();
        let scripting = regions[0].as_scripting().unwrap();
        assert_eq!(scripting.code, "");
        assert!(scripting.parse_tree.is_none());
    }

    #[test]
    fn trims_code_whitespace_but_keeps_delimiters() {
        let src = "<%   @user.name   %>";
        let g = grammars();
        let regions = segment(&g, src).unwrap();
        let scripting = regions[0].as_scripting().unwrap();
        assert_eq!(scripting.code, "@user.name");
        assert_eq!(scripting.open_delim, "<%");
        assert_eq!(scripting.close_delim, "%>");
    }

    #[test]
    fn html_only_template_is_one_region() {
        let src = "<div>hello</div>\n";
        let g = grammars();
        let regions = segment(&g, src).unwrap();
        assert_eq!(regions.len(), 1);
        check_tiling(src, &regions).unwrap();
    }
}
