//! String utilities for chat markup.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Remove the `*` emphasis markers used by chat markup.
pub fn strip_emphasis(s: &str) -> String {
    s.replace('*', "")
}

/// Split a question into `(title, body)` at its first colon.
///
/// The body is trimmed and keeps any later colons. Without a colon the whole
/// (trimmed) text is the title and the body is empty.
pub fn split_title_body(s: &str) -> (&str, &str) {
    match s.split_once(':') {
        Some((title, body)) => (title.trim(), body.trim()),
        None => (s.trim(), ""),
    }
}

/// Render a question as `*title*: body`, or `*title*` when there is no body.
pub fn emphasize_title(s: &str) -> String {
    let (title, body) = split_title_body(s);
    if body.is_empty() {
        format!("*{}*", title)
    } else {
        format!("*{}*: {}", title, body)
    }
}
