//! Newline collapsing for compact copying.
//!
//! Replaces each line break with a single space. Only `\n` and `\r\n` count as
//! line breaks; tabs, runs of spaces and a lone `\r` are left as they are.

use regex::Regex;
use std::sync::LazyLock;

/// An optional carriage return followed by a line feed.
static LINE_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n").unwrap());

/// Collapse every line break in `text` to a single space.
///
/// Does not trim. Applying it twice gives the same result as applying it once.
pub fn collapse_newlines(text: &str) -> String {
    LINE_BREAK_REGEX.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lf_and_crlf() {
        assert_eq!(collapse_newlines("A\nB\r\nC"), "A B C");
    }

    #[test]
    fn test_each_break_becomes_one_space() {
        assert_eq!(collapse_newlines("A\n\nB"), "A  B");
        assert_eq!(collapse_newlines("A\r\n\r\nB"), "A  B");
    }

    #[test]
    fn test_other_whitespace_untouched() {
        assert_eq!(collapse_newlines("a\t\tb   c"), "a\t\tb   c");
        assert_eq!(collapse_newlines("a\rb"), "a\rb");
    }

    #[test]
    fn test_no_trimming() {
        assert_eq!(collapse_newlines("\n x \n"), "  x  ");
    }

    #[test]
    fn test_empty() {
        assert_eq!(collapse_newlines(""), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = ["", "A\nB", "A\r\nB\r\n", "\r\r\n\n", "tab\there\n  x"];
        for sample in samples {
            let once = collapse_newlines(sample);
            assert!(!once.contains('\n'));
            assert_eq!(collapse_newlines(&once), once);
        }
    }

    #[test]
    fn test_collapses_paragraph_block() {
        assert_eq!(
            collapse_newlines("Paragraph one, line one.\nParagraph one, line two."),
            "Paragraph one, line one. Paragraph one, line two."
        );
    }
}
