//! Escaping for free-text columns.
//!
//! Free-text fields (expense, category, tag and shop names) are HTML-escaped
//! before they reach storage and unescaped exactly once when read back.

/// Escape the HTML special characters in `text`.
pub fn escape(text: &str) -> String {
    // '&' first so already-inserted entities are not escaped twice.
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Reverse [escape], restoring the original text.
pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
