//! Shared utility functions.

/// Shorten `text` to at most `max_chars` characters, appending `...` when
/// anything was cut.
///
/// Counts `char`s rather than bytes so multi-byte text is never split.
/// The ellipsis is included in the budget.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Character count used for observability metrics.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_short_text_unchanged() {
        assert_eq!(excerpt("hello", 10), "hello");
    }

    #[test]
    fn excerpt_cuts_with_ellipsis() {
        assert_eq!(excerpt("hello world", 8), "hello...");
    }

    #[test]
    fn excerpt_multibyte() {
        // 5 chars, 15 bytes
        assert_eq!(excerpt("あいうえお", 5), "あいうえお");
        assert_eq!(excerpt("あいうえおか", 5), "あい...");
    }

    #[test]
    fn excerpt_trims_whitespace() {
        assert_eq!(excerpt("  padded  ", 20), "padded");
    }

    #[test]
    fn char_count_counts_chars_not_bytes() {
        assert_eq!(char_count("héllo"), 5);
    }
}
