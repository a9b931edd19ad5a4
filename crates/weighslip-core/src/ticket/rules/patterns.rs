//! Common regex patterns for weighing ticket extraction.
//!
//! Digit classes are spelled `[0-9]` so that non-ASCII digits never reach
//! the integer parser.

use lazy_static::lazy_static;
use regex::Regex;

/// Weight token: `1-3` digits followed by space/comma separated groups of
/// exactly three digits (`13 460`, `14,080`), or a bare run of up to six.
pub const KG_NUM: &str = r"(?P<num>[0-9]{1,3}(?:[\s,][0-9]{3})+|[0-9]{1,6})";

/// Junk allowed between a label and its number; never crosses a digit.
/// Gaps holding another weight label are rejected by the extractor.
pub const LABEL_GAP: &str = r"[^0-9]{0,50}?";

/// Weight label alternations, one per role.
pub const GROSS_LABELS: &str = r"총\s*중\s*량|총중량";
pub const TARE_LABELS: &str = r"공\s*차\s*중\s*량|공차중량|차\s*중\s*량|차중량";
pub const NET_LABELS: &str = r"실\s*중\s*량|실중량";

fn labeled_weight(labels: &str) -> Regex {
    Regex::new(&format!(r"(?P<label>{labels})\s*:?\s*{LABEL_GAP}{KG_NUM}\s*kg")).unwrap()
}

lazy_static! {
    // Normalization
    pub static ref TIME_TOKEN: Regex = Regex::new(
        r"\b[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?\b"
    ).unwrap();

    pub static ref SPLIT_KG: Regex = Regex::new(r"k\s*g").unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // Weighing date (계량일자 / 날짜)
    pub static ref DATE_ANCHOR: Regex = Regex::new(
        r"(?:계량\s*일자|계량일자|날\s*짜|날짜)\s*:?\s*(?P<near>[^\n\r]{0,60})"
    ).unwrap();

    pub static ref DATE_TIME: Regex = Regex::new(
        r"(?P<date>[0-9]{4}-[0-9]{2}-[0-9]{2})(?:\s+(?P<time>[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?))?"
    ).unwrap();

    // Vehicle number (차량번호)
    pub static ref VEHICLE_ANCHOR: Regex = Regex::new(
        r"(?:차량\s*번호|차량번호|차\s*번호|차번호)\s*:?\s*(?P<near>[^\n\r]{0,40})"
    ).unwrap();

    pub static ref PLATE: Regex = Regex::new(
        r"[0-9]{2,3}[가-힣][0-9]{4}|[0-9]{4,5}"
    ).unwrap();

    // Labeled weights
    pub static ref GROSS_WEIGHT: Regex = labeled_weight(GROSS_LABELS);

    pub static ref TARE_WEIGHT: Regex = labeled_weight(TARE_LABELS);

    pub static ref NET_WEIGHT: Regex = labeled_weight(NET_LABELS);

    // Any weight label; a label's filler must not run into one
    pub static ref WEIGHT_LABEL: Regex = Regex::new(
        &format!(r"{GROSS_LABELS}|{TARE_LABELS}|{NET_LABELS}")
    ).unwrap();

    // Any unit-suffixed number
    pub static ref ANY_KG: Regex = Regex::new(&format!(r"{KG_NUM}\s*kg")).unwrap();

    // Clock fragments left of a split number ("05:26 18 997 kg", "05:26: 18 997 kg")
    pub static ref CLOCK_TAIL: Regex = Regex::new(r"[0-9]{1,2}:[0-9]{2}\s*$").unwrap();

    pub static ref CLOCK_COLON_TAIL: Regex = Regex::new(r"[0-9]{1,2}:\s*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_weight_patterns() {
        let caps = GROSS_WEIGHT.captures("총 중 량 : 12480 kg").unwrap();
        assert_eq!(&caps["num"], "12480");

        let caps = TARE_WEIGHT.captures("공차중량: ** 7 470 kg").unwrap();
        assert_eq!(&caps["num"], "7 470");

        let caps = NET_WEIGHT.captures("실중량 5010kg").unwrap();
        assert_eq!(&caps["num"], "5010");

        assert!(NET_WEIGHT.captures("실중량 5010 t").is_none());
    }

    #[test]
    fn test_weight_label_covers_every_role() {
        assert!(WEIGHT_LABEL.is_match(": ** 공 차 중 량: "));
        assert!(WEIGHT_LABEL.is_match("총중량"));
        assert!(WEIGHT_LABEL.is_match("실 중량"));
        assert!(!WEIGHT_LABEL.is_match(": ** "));
    }

    #[test]
    fn test_label_gap_is_bounded() {
        let junk = "x".repeat(51);
        assert!(GROSS_WEIGHT.captures(&format!("총중량 {junk}12480 kg")).is_none());

        let junk = "x".repeat(40);
        assert!(GROSS_WEIGHT.captures(&format!("총중량 {junk}12480 kg")).is_some());
    }

    #[test]
    fn test_any_kg_prefers_grouped_form() {
        let nums: Vec<&str> = ANY_KG
            .captures_iter("5 900 kg 14,080 kg 130kg")
            .map(|c| c.name("num").unwrap().as_str())
            .collect();
        assert_eq!(nums, vec!["5 900", "14,080", "130"]);
    }

    #[test]
    fn test_plate_pattern() {
        assert_eq!(PLATE.find("80구8713").unwrap().as_str(), "80구8713");
        assert_eq!(PLATE.find("5405").unwrap().as_str(), "5405");
        assert!(PLATE.find("12").is_none());
    }

    #[test]
    fn test_clock_tails() {
        assert!(CLOCK_TAIL.is_match("계량 05:26 "));
        assert!(CLOCK_COLON_TAIL.is_match("계량 05:26: "));
        assert!(!CLOCK_TAIL.is_match("총중량 : "));
    }
}
