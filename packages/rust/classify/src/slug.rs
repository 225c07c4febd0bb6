//! Stable, human-readable identifiers derived from paper titles.

/// Number of leading title words kept in an identifier.
const ID_WORDS: usize = 4;

/// Derive a slug from the first four alphanumeric words of `title`.
///
/// Lowercases, drops every character that is not an ASCII letter, ASCII digit or
/// whitespace, then joins the first four whitespace-separated tokens with `-`.
/// Distinct titles sharing those words collide; the store merger resolves that.
pub fn generate_id(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .take(ID_WORDS)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_four_words() {
        assert_eq!(
            generate_id("DeepSeek Proposes a New Reasoning Framework"),
            "deepseek-proposes-a-new"
        );
    }

    #[test]
    fn strips_punctuation_before_splitting() {
        assert_eq!(
            generate_id("GPT-4o: Scaling Laws, Revisited!"),
            "gpt4o-scaling-laws-revisited"
        );
        assert_eq!(generate_id("  Multi\nline   title "), "multi-line-title");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(generate_id("Über große Modelle"), "ber-groe-modelle");
    }

    #[test]
    fn empty_and_symbol_only_titles() {
        assert_eq!(generate_id(""), "");
        assert_eq!(generate_id("?!"), "");
    }

    #[test]
    fn depends_only_on_leading_words() {
        let a = generate_id("Attention Is All You Need");
        let b = generate_id("attention is all YOU want, apparently");
        assert_eq!(a, b);
        assert_eq!(a, generate_id("Attention Is All You Need"));
    }
}
