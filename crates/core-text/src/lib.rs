//! Display-width measurement used to decide when a line exceeds a configured
//! `line_width` (attribute wrapping, scripting re-indent wrapping).
//!
//! A single authoritative `display_width` keeps every width decision in the
//! pipeline consistent; callers should not reach for `str::len()` or
//! `unicode_width` directly when the question is "how wide is this on
//! screen", since byte length and column width diverge for any non-ASCII
//! text.

use unicode_width::UnicodeWidthStr;

/// Column width of `s` as it would print on a single terminal-width line.
/// Tabs count as one column each; callers that care about tab expansion
/// should normalize tabs before measuring.
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Width of the longest line in `s` (newline-delimited). Used when deciding
/// whether a multi-line attribute list would overflow the configured width.
pub fn max_line_width(s: &str) -> usize {
    s.lines().map(display_width).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_is_byte_length() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn wide_cjk_counts_double() {
        assert_eq!(display_width("\u{6F22}\u{5B57}"), 4);
    }

    #[test]
    fn max_line_width_picks_the_longest() {
        assert_eq!(max_line_width("a\nbbb\nbb"), 3);
    }
}
