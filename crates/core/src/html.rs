//! HTML escaping for block text.
//!
//! Extracted text is data. It goes through [`escape_html`] before it is placed
//! in element content or in a quoted attribute.

use std::borrow::Cow;

/// Escape `& < > " '` so the text is safe in element content and in
/// double- or single-quoted attribute values.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
