//! Weighing date extraction.
//!
//! Runs on the raw ticket text: normalization strips time-of-day tokens,
//! which the date value needs to keep.

use super::patterns::{DATE_ANCHOR, DATE_TIME};
use super::{ExtractionMatch, FieldExtractor};

/// Date (and optional time) extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_TIME
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let date = caps.name("date")?.as_str();
                // "YYYY-MM-DD H:MM[:SS]" keeps the time verbatim
                let value = match caps.name("time") {
                    Some(time) => format!("{} {}", date, time.as_str()),
                    None => date.to_string(),
                };
                Some(
                    ExtractionMatch::new(value, 0.7, full.as_str())
                        .with_position(full.start(), full.end()),
                )
            })
            .collect()
    }
}

/// Extract the weighing date, preferring the text right after a date label.
pub fn extract_weighing_date(text: &str) -> Option<ExtractionMatch<String>> {
    let extractor = DateExtractor::new();

    if let Some(near) = DATE_ANCHOR.captures(text).and_then(|caps| caps.name("near")) {
        if let Some(found) = extractor.extract(near.as_str()) {
            let (start, end) = found.position.unwrap_or((0, 0));
            return Some(ExtractionMatch {
                confidence: 0.95,
                position: Some((near.start() + start, near.start() + end)),
                ..found
            });
        }
    }

    extractor.extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_date_with_time() {
        let text = "계량일자: 2026-02-02 05:37:55\n차량번호: 80구8713";
        let date = extract_weighing_date(text).unwrap();
        assert_eq!(date.value, "2026-02-02 05:37:55");
        assert_eq!(date.confidence, 0.95);

        let (start, end) = date.position.unwrap();
        assert_eq!(&text[start..end], "2026-02-02 05:37:55");
    }

    #[test]
    fn test_label_spacing_variants() {
        let date = extract_weighing_date("계량 일자 : 2026-02-01 11:55").unwrap();
        assert_eq!(date.value, "2026-02-01 11:55");

        let date = extract_weighing_date("날 짜: 2026-02-02-00004").unwrap();
        assert_eq!(date.value, "2026-02-02");
    }

    #[test]
    fn test_label_preferred_over_earlier_date() {
        let text = "출력 2025-12-31\n계량일자: 2026-02-02 05:37:55";
        assert_eq!(extract_weighing_date(text).unwrap().value, "2026-02-02 05:37:55");
    }

    #[test]
    fn test_fallback_scan_without_label() {
        let date = extract_weighing_date("ticket 2026-01-15 7:05 total").unwrap();
        assert_eq!(date.value, "2026-01-15 7:05");
        assert_eq!(date.confidence, 0.7);
    }

    #[test]
    fn test_label_without_date_falls_back() {
        let text = "날짜: 미기재\n발행 2026-03-01";
        assert_eq!(extract_weighing_date(text).unwrap().value, "2026-03-01");
    }

    #[test]
    fn test_no_date() {
        assert!(extract_weighing_date("총중량: 12480 kg").is_none());
        assert!(extract_weighing_date("").is_none());
    }
}
