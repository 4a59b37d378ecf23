/// Collapses every run of whitespace into a single space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters, which is what the reveal and the length gates count.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// True when the trimmed text is longer than `threshold` characters.
pub fn has_real_content(text: &str, threshold: usize) -> bool {
    char_len(text.trim()) > threshold
}

/// Whitespace-separated words; empty tokens are not counted.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of characters visible after `elapsed_ms` of a reveal lasting `duration_ms`.
///
/// Derived from elapsed wall-clock time rather than a per-tick step, so a
/// late or dropped tick never stretches the reveal.
pub fn reveal_len(elapsed_ms: u64, duration_ms: u64, total: usize) -> usize {
    if duration_ms == 0 || elapsed_ms >= duration_ms {
        return total;
    }
    (u128::from(elapsed_ms) * total as u128 / u128::from(duration_ms)) as usize
}

#[cfg(test)]
mod tests {
    use super::{has_real_content, normalize_whitespace, reveal_len, word_count};

    #[test]
    fn normalize_collapses_runs_and_trims() {
        assert_eq!(
            normalize_whitespace("  Senior\n\n Engineer\t\t(remote)  "),
            "Senior Engineer (remote)"
        );
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn real_content_is_strictly_longer_than_threshold() {
        assert!(!has_real_content(&"a".repeat(50), 50));
        assert!(has_real_content(&"a".repeat(51), 50));
        assert!(!has_real_content(&format!("   {}   ", "a".repeat(50)), 50));
    }

    #[test]
    fn real_content_counts_characters_not_bytes() {
        assert!(!has_real_content(&"é".repeat(30), 50));
    }

    #[test]
    fn word_count_ignores_empty_tokens() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  one   two\nthree  "), 3);
    }

    #[test]
    fn reveal_len_interpolates_and_clamps() {
        assert_eq!(reveal_len(0, 2_500, 200), 0);
        assert_eq!(reveal_len(1_250, 2_500, 200), 100);
        assert_eq!(reveal_len(2_499, 2_500, 200), 199);
        assert_eq!(reveal_len(2_500, 2_500, 200), 200);
        assert_eq!(reveal_len(9_000, 2_500, 200), 200);
        assert_eq!(reveal_len(0, 0, 200), 200);
    }
}
