//! Vehicle number extraction.

use super::patterns::{PLATE, VEHICLE_ANCHOR};
use super::{ExtractionMatch, FieldExtractor};

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Plate extractor (`80구8713`, `5405`).
///
/// Whitespace is removed before matching, so positions are not reported.
pub struct PlateExtractor;

impl PlateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PlateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let compact = strip_whitespace(text);
        PLATE
            .find_iter(&compact)
            .map(|m| ExtractionMatch::new(m.as_str().to_string(), 0.7, m.as_str()))
            .collect()
    }
}

/// Extract the vehicle number, preferring the text right after a vehicle label.
pub fn extract_vehicle_number(text: &str) -> Option<ExtractionMatch<String>> {
    let extractor = PlateExtractor::new();

    if let Some(near) = VEHICLE_ANCHOR.captures(text).and_then(|caps| caps.name("near")) {
        if let Some(found) = extractor.extract(near.as_str()) {
            return Some(ExtractionMatch {
                confidence: 0.95,
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
    fn test_labeled_plate() {
        let found = extract_vehicle_number("차량번호: 80구8713\n총중량: 12480 kg").unwrap();
        assert_eq!(found.value, "80구8713");
        assert_eq!(found.confidence, 0.95);
    }

    #[test]
    fn test_plate_split_by_ocr_spaces() {
        let found = extract_vehicle_number("차 번호 : 80 구 8713").unwrap();
        assert_eq!(found.value, "80구8713");
    }

    #[test]
    fn test_fleet_number() {
        assert_eq!(extract_vehicle_number("차량 번호: 5405").unwrap().value, "5405");
    }

    #[test]
    fn test_fallback_without_label() {
        let found = extract_vehicle_number("입고 123가4567 확인").unwrap();
        assert_eq!(found.value, "123가4567");
        assert_eq!(found.confidence, 0.7);
    }

    #[test]
    fn test_no_plate() {
        assert!(extract_vehicle_number("총중량 없음").is_none());
    }
}
