//! Blank-line block splitting.
//!
//! A single newline is an ordinary line wrap and never splits. A blank line,
//! or a run of blank lines (including lines holding only spaces or tabs),
//! separates two blocks. The number of blank lines is not preserved.

use regex::Regex;
use std::sync::LazyLock;

/// A newline, any whitespace, then one or more further newlines.
static BLANK_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Split text into trimmed, non-empty blocks in document order.
///
/// Total over all inputs: empty or all-whitespace text yields no blocks.
pub fn split_blocks(text: &str) -> Vec<String> {
    BLANK_LINE_REGEX
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}
