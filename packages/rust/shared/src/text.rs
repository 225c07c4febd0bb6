//! Small text helpers shared by the pipeline, translator and store.

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Whether `text` contains any precomposed Hangul syllable.
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| ('\u{AC00}'..='\u{D7A3}').contains(&c))
}

/// Replace line breaks with spaces and trim the ends.
pub fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn hangul_detection() {
        assert!(contains_hangul("추론 framework"));
        assert!(!contains_hangul("reasoning framework"));
    }

    #[test]
    fn single_line_collapses_breaks() {
        assert_eq!(single_line("  Scaling Laws for\n  Experts \n"), "Scaling Laws for   Experts");
    }
}
