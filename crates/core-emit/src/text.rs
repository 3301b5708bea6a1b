//! Whitespace collapsing for HTML text nodes (§4.5: "collapse consecutive
//! horizontal whitespace to a single space; collapse `\n`+spaces to a single
//! `\n`; trim leading/trailing whitespace").
//!
//! Placeholder tokens are ordinary non-whitespace characters to this pass —
//! they survive untouched, wherever they land relative to the surrounding
//! text.

/// Collapses `raw` per the conservative HTML text policy. Internal
/// newlines are preserved (one per run); horizontal whitespace runs become a
/// single space; the result has no leading or trailing whitespace.
pub fn collapse(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut pending_newline = false;
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        if c == '\n' {
            pending_newline = true;
            pending_space = false;
            continue;
        }
        if c == ' ' || c == '\t' || c == '\r' {
            pending_space = true;
            continue;
        }
        if pending_newline {
            if !out.is_empty() {
                out.push('\n');
            }
            pending_newline = false;
            pending_space = false;
        } else if pending_space {
            if !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_of_spaces_and_tabs() {
        assert_eq!(collapse("Hello   \t  world"), "Hello world");
    }

    #[test]
    fn trims_leading_and_trailing_whitespace() {
        assert_eq!(collapse("   Hello   "), "Hello");
    }

    #[test]
    fn collapses_newline_runs_to_one_newline() {
        assert_eq!(collapse("line one\n\n   \nline two"), "line one\nline two");
    }

    #[test]
    fn whitespace_only_collapses_to_empty() {
        assert_eq!(collapse("   \n\t  "), "");
    }
}
