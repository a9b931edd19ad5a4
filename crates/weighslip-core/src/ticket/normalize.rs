//! Text normalization ahead of weight extraction.

use super::rules::patterns::{SPLIT_KG, TIME_TOKEN, WHITESPACE_RUN};

/// Normalize raw OCR text for the weight rules.
///
/// Lowercases, drops time-of-day tokens, joins split `k g` units, removes
/// thousands commas between digits and collapses whitespace.
pub fn normalize(raw: &str) -> String {
    let text = raw.to_lowercase();
    let text = TIME_TOKEN.replace_all(&text, " ");
    let text = SPLIT_KG.replace_all(&text, "kg");
    let text = strip_digit_commas(&text);
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

/// Remove every comma with an ASCII digit on both sides.
fn strip_digit_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();

    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            let between_digits = c == ','
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            !between_digits
        })
        .map(|(_, &c)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticket() {
        let raw = "계량일자: 2026-02-02 05:37:55\n총중량:   14,080 K g\n실중량: 5 900 KG";
        assert_eq!(
            normalize(raw),
            "계량일자: 2026-02-02 총중량: 14080 kg 실중량: 5 900 kg"
        );
    }

    #[test]
    fn test_strip_digit_commas() {
        assert_eq!(strip_digit_commas("1,234,567"), "1234567");
        assert_eq!(strip_digit_commas("a, 1, b"), "a, 1, b");
        assert_eq!(strip_digit_commas("1,,2"), "1,,2");
        assert_eq!(strip_digit_commas(",1,"), ",1,");
    }

    #[test]
    fn test_short_time_tokens_removed() {
        assert_eq!(normalize("입차 9:05 출차 10:15:30 완료"), "입차 출차 완료");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }
}
