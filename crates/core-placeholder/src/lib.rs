//! Placeholder Builder (§4.3): replaces every scripting region with a unique
//! sentinel token so the remaining document is lexically pure HTML, and
//! provides the inverse `restore` used to prove the round-trip law in §8.2.
//!
//! Tokens are built from two private-use-area characters that cannot appear
//! in well-formed UTF-8 source text the grammars would otherwise tokenize as
//! markup, bracketing a decimal id: `"\u{E000}<id>\u{E001}"`. This keeps a
//! token valid as bare HTML text and inside a quoted attribute value (it
//! contains neither `<`, `>`, `"`, nor `'`), and the trailing sentinel means
//! no token is ever a prefix of another token's digits.

use core_model::{PlaceholderDocument, PlaceholderEntry, Region};

pub const PREFIX: char = '\u{E000}';
pub const SUFFIX: char = '\u{E001}';

fn token_for(id: usize) -> String {
    format!("{PREFIX}{id}{SUFFIX}")
}

/// One placeholder token occurrence found by [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch {
    pub start: usize,
    pub end: usize,
    pub id: usize,
}

/// Finds every placeholder token in `text`, left to right. Used by
/// downstream stages (Structural Emitter, Composer) that need to split text
/// around embedded tokens without re-deriving the sentinel format.
pub fn scan(text: &str) -> Vec<TokenMatch> {
    let mut matches = Vec::new();
    let mut rest = text;
    let mut base = 0usize;
    while let Some(prefix_at) = rest.find(PREFIX) {
        let after_prefix = prefix_at + PREFIX.len_utf8();
        let Some(suffix_at) = rest[after_prefix..].find(SUFFIX) else {
            break;
        };
        let digits = &rest[after_prefix..after_prefix + suffix_at];
        let suffix_end = after_prefix + suffix_at + SUFFIX.len_utf8();
        if let Ok(id) = digits.parse::<usize>() {
            matches.push(TokenMatch {
                start: base + prefix_at,
                end: base + suffix_end,
                id,
            });
        }
        base += suffix_end;
        rest = &rest[suffix_end..];
    }
    matches
}

/// True when `text` contains no characters other than complete placeholder
/// tokens (used by the emitter to decide whether a text node is "pure
/// scripting" and belongs on its own line rather than inline).
pub fn is_tokens_only(text: &str) -> bool {
    let matches = scan(text);
    if matches.is_empty() {
        return false;
    }
    let mut cursor = 0usize;
    for m in &matches {
        if text[cursor..m.start].trim().len() > 0 {
            return false;
        }
        cursor = m.end;
    }
    text[cursor..].trim().is_empty()
}

/// Builds a [`PlaceholderDocument`] from a tiling region list. HTML and
/// unknown regions are copied verbatim; each scripting region is assigned
/// the next sequential id and replaced by its token.
pub fn build(regions: &[Region]) -> PlaceholderDocument {
    let mut html = String::new();
    let mut placeholders = Vec::new();
    let mut next_id = 0usize;

    for (region_index, region) in regions.iter().enumerate() {
        if region.is_scripting() {
            let id = next_id;
            next_id += 1;
            let token = token_for(id);
            html.push_str(&token);
            placeholders.push(PlaceholderEntry {
                id,
                region_index,
                token,
            });
        } else {
            html.push_str(region.text());
        }
    }

    PlaceholderDocument { html, placeholders }
}

/// Inverse of [`build`]: replaces each entry's token, in order, with the
/// original text of the region it stands for. A single occurrence is
/// substituted per entry (tokens are unique, so this is equivalent to a
/// global replace, but mirrors the single-occurrence contract in §4.3).
pub fn restore(document_html: &str, placeholders: &[PlaceholderEntry], regions: &[Region]) -> String {
    let mut result = document_html.to_string();
    for entry in placeholders {
        let Some(region) = regions.get(entry.region_index) else {
            continue;
        };
        result = result.replacen(&entry.token, region.text(), 1);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{HtmlRegion, Position, Range, ScriptingFlavor, ScriptingRegion};

    fn html(text: &str) -> Region {
        Region::Html(HtmlRegion {
            range: Range::new(Position::default(), Position::default()),
            text: text.to_string(),
        })
    }

    fn scripting(text: &str, code: &str) -> Region {
        Region::Scripting(ScriptingRegion {
            range: Range::new(Position::default(), Position::default()),
            text: text.to_string(),
            flavor: ScriptingFlavor::Logic,
            open_delim: "<%".into(),
            close_delim: "%>".into(),
            code: code.to_string(),
            code_range: None,
            parse_tree: None,
        })
    }

    #[test]
    fn tokens_are_unique_and_sequential() {
        let regions = vec![
            html("<div>"),
            scripting("<% a %>", "a"),
            html("</div>"),
            scripting("<% b %>", "b"),
        ];
        let doc = build(&regions);
        assert_eq!(doc.placeholders.len(), 2);
        assert_eq!(doc.placeholders[0].id, 0);
        assert_eq!(doc.placeholders[1].id, 1);
        assert_ne!(doc.placeholders[0].token, doc.placeholders[1].token);
        assert_eq!(doc.html.matches(&doc.placeholders[0].token).count(), 1);
        assert_eq!(doc.html.matches(&doc.placeholders[1].token).count(), 1);
    }

    #[test]
    fn placeholder_count_matches_scripting_region_count() {
        let regions = vec![html("x"), scripting("<% a %>", "a"), html("y")];
        let doc = build(&regions);
        assert_eq!(doc.placeholders.len(), 1);
    }

    #[test]
    fn round_trip_reconstructs_source() {
        let regions = vec![
            html("<div>"),
            scripting("<% if x %>", "if x"),
            html("hi"),
            scripting("<% end %>", "end"),
            html("</div>"),
        ];
        let source: String = regions.iter().map(|r| r.text()).collect();
        let doc = build(&regions);
        let restored = restore(&doc.html, &doc.placeholders, &regions);
        assert_eq!(restored, source);
    }

    #[test]
    fn tokens_never_contain_html_meaningful_characters() {
        for id in [0usize, 1, 42, 9999] {
            let token = token_for(id);
            assert!(!token.contains('<'));
            assert!(!token.contains('>'));
            assert!(!token.contains('"'));
            assert!(!token.contains('\''));
        }
    }

    #[test]
    fn ten_and_one_hundred_are_not_confused() {
        // token_for(1) must not be a byte-prefix of token_for(10) in a way
        // that could let a left-to-right scan match the wrong entry.
        let t1 = token_for(1);
        let t10 = token_for(10);
        assert!(!t10.starts_with(&t1));
    }

    #[test]
    fn scan_finds_every_token_in_order() {
        let text = format!("Hello {}0{} and {}12{}!", PREFIX, SUFFIX, PREFIX, SUFFIX);
        let matches = scan(&text);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, 0);
        assert_eq!(matches[1].id, 12);
    }

    #[test]
    fn is_tokens_only_ignores_surrounding_whitespace() {
        let text = format!("  {}0{}  ", PREFIX, SUFFIX);
        assert!(is_tokens_only(&text));
        let mixed = format!("Hello {}0{}", PREFIX, SUFFIX);
        assert!(!is_tokens_only(&mixed));
    }
}
