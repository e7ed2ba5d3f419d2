//! Text helpers for displaying issue data
//!
//! User-supplied text is never trusted: it goes through [`escape_html`] before
//! landing in markup and through [`sanitize_terminal`] before being drawn.

/// Number of id characters shown in lists
pub const SHORT_ID_LEN: usize = 8;

/// Escape `& < > " '` so the text is inert inside HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make text safe to draw on a single terminal line.
///
/// Line breaks and tabs become spaces; any other control character (ESC in
/// particular) is shown in its escaped form instead of being emitted.
pub fn sanitize_terminal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\r' | '\t' => out.push(' '),
            c if c.is_control() => out.extend(c.escape_default()),
            c => out.push(c),
        }
    }
    out
}

/// Turn a wire value like `in_progress` into a label like `In Progress`.
///
/// Underscores become spaces and the first character of every word is
/// uppercased. A word starts after any character that is not alphanumeric.
pub fn format_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        let c = if c == '_' { ' ' } else { c };
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    out
}

/// First [`SHORT_ID_LEN`] characters of an id.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#039;y&#039;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_sanitize_terminal_neutralises_escape_sequences() {
        let sanitized = sanitize_terminal("red\x1b[31mtext\nnext\tline");
        assert!(!sanitized.contains('\x1b'));
        assert_eq!(sanitized, "red\\u{1b}[31mtext next line");
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label("in_progress"), "In Progress");
        assert_eq!(format_label("open"), "Open");
        assert_eq!(format_label("high"), "High");
        assert_eq!(format_label("already Mixed_case"), "Already Mixed Case");
        assert_eq!(format_label(""), "");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("3f2a9c1e-1234-5678"), "3f2a9c1e");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("ééééééééé"), "éééééééé");
    }
}
