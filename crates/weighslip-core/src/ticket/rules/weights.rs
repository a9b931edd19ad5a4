//! Weight token extraction for weighing tickets.
//!
//! Two passes share one numeric grammar (`KG_NUM` followed by `kg`):
//! a label-anchored pass that yields at most one value per role, and an
//! unanchored scan that collects every plausible unit-suffixed number.

use std::ops::RangeInclusive;

use regex::Regex;
use tracing::trace;

use super::patterns::{
    ANY_KG, CLOCK_COLON_TAIL, CLOCK_TAIL, GROSS_WEIGHT, NET_WEIGHT, TARE_WEIGHT, WEIGHT_LABEL,
};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::WeightRole;

/// Weights outside this range are discarded as OCR garbage.
pub const PLAUSIBLE_WEIGHT_KG: RangeInclusive<u32> = 1..=300_000;

/// Characters inspected left of a scanned number for a clock fragment.
pub const TIME_NOISE_WINDOW: usize = 25;

/// A scanned weight value with its byte span in the normalized text.
pub type WeightCandidate = ExtractionMatch<u32>;

/// Parse a weight token, dropping grouping commas and whitespace.
pub fn parse_kg(token: &str) -> Option<u32> {
    let digits: String = token
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if digits.is_empty() {
        return None;
    }

    digits.parse().ok()
}

/// Label-anchored extractor for a single weight role.
pub struct LabeledWeightExtractor {
    role: WeightRole,
    bounds: RangeInclusive<u32>,
}

impl LabeledWeightExtractor {
    pub fn new(role: WeightRole) -> Self {
        Self {
            role,
            bounds: PLAUSIBLE_WEIGHT_KG,
        }
    }

    /// Set the accepted weight range.
    pub fn with_bounds(mut self, bounds: RangeInclusive<u32>) -> Self {
        self.bounds = bounds;
        self
    }

    fn pattern(&self) -> &'static Regex {
        match self.role {
            WeightRole::Gross => &*GROSS_WEIGHT,
            WeightRole::Tare => &*TARE_WEIGHT,
            WeightRole::Net => &*NET_WEIGHT,
        }
    }

    /// Next labeled match at or after `start` whose filler stays clear of
    /// other weight labels, as an unparsed token plus the match end.
    fn next_token(&self, text: &str, start: usize) -> Option<(ExtractionMatch<String>, usize)> {
        let mut from = start;
        loop {
            let caps = self.pattern().captures_at(text, from)?;
            let (full, label, num) = (caps.get(0)?, caps.name("label")?, caps.name("num")?);

            let gap = &text[label.end()..num.start()];
            if WEIGHT_LABEL.is_match(gap) {
                trace!("Labeled {} filler runs into another label: '{}'", self.role, gap);
                from = label.end();
                continue;
            }

            let token = ExtractionMatch::new(num.as_str().to_string(), 0.95, full.as_str())
                .with_position(num.start(), num.end());
            return Some((token, full.end()));
        }
    }

    /// First labeled numeric token in document order, unparsed.
    pub fn find_token(&self, text: &str) -> Option<ExtractionMatch<String>> {
        self.next_token(text, 0).map(|(token, _)| token)
    }

    /// Convert a token to a weight, applying the plausibility bound.
    pub fn to_weight(&self, token: ExtractionMatch<String>) -> Option<ExtractionMatch<u32>> {
        let value = parse_kg(&token.value)?;
        if !self.bounds.contains(&value) {
            trace!("Labeled {} value {} outside plausible range", self.role, value);
            return None;
        }
        Some(token.map(|_| value))
    }
}

impl FieldExtractor for LabeledWeightExtractor {
    type Output = ExtractionMatch<u32>;

    /// Only the first labeled match counts; an unusable first match means
    /// "not found" rather than a retry on later matches.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.find_token(text).and_then(|token| self.to_weight(token))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut found = Vec::new();
        let mut start = 0;
        while let Some((token, end)) = self.next_token(text, start) {
            found.extend(self.to_weight(token));
            start = end;
        }
        found
    }
}

/// Why a scanned token was not accepted as a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Split number right after a clock fragment.
    TimeNoise,
    /// Token did not fit an integer.
    Unparseable,
    /// Parsed value outside the plausible range.
    Implausible(u32),
}

/// A unit-suffixed token the scanner discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedToken {
    pub token: String,
    pub offset: usize,
    pub reason: RejectReason,
}

/// Output of one candidate scan.
#[derive(Debug, Clone, Default)]
pub struct CandidateScan {
    /// Accepted candidates in document order, not deduplicated.
    pub candidates: Vec<WeightCandidate>,
    /// Discarded tokens in document order.
    pub rejected: Vec<RejectedToken>,
}

impl CandidateScan {
    /// Candidate values in document order.
    pub fn values(&self) -> Vec<u32> {
        self.candidates.iter().map(|c| c.value).collect()
    }
}

/// Unanchored scanner for every unit-suffixed number.
pub struct CandidateScanner {
    bounds: RangeInclusive<u32>,
}

impl CandidateScanner {
    pub fn new() -> Self {
        Self {
            bounds: PLAUSIBLE_WEIGHT_KG,
        }
    }

    /// Set the accepted weight range.
    pub fn with_bounds(mut self, bounds: RangeInclusive<u32>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Scan the whole text, keeping rejected tokens for diagnostics.
    pub fn scan(&self, text: &str) -> CandidateScan {
        let mut scan = CandidateScan::default();

        for caps in ANY_KG.captures_iter(text) {
            let (Some(full), Some(num)) = (caps.get(0), caps.name("num")) else {
                continue;
            };
            let token = num.as_str();

            let reject = |reason: RejectReason| RejectedToken {
                token: token.to_string(),
                offset: num.start(),
                reason,
            };

            if looks_like_time_noise(text, full.start(), token) {
                trace!("Discarding '{}' at {}: clock fragment on the left", token, num.start());
                scan.rejected.push(reject(RejectReason::TimeNoise));
                continue;
            }

            let Some(value) = parse_kg(token) else {
                trace!("Discarding unparseable token '{}'", token);
                scan.rejected.push(reject(RejectReason::Unparseable));
                continue;
            };

            if !self.bounds.contains(&value) {
                trace!("Discarding implausible weight {}", value);
                scan.rejected.push(reject(RejectReason::Implausible(value)));
                continue;
            }

            scan.candidates.push(
                ExtractionMatch::new(value, 0.6, full.as_str()).with_position(num.start(), num.end()),
            );
        }

        scan
    }
}

impl Default for CandidateScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CandidateScanner {
    type Output = WeightCandidate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.scan(text).candidates
    }
}

/// True when a whitespace-split token sits right after a clock fragment
/// (`H:MM` or `H:`) within the preceding `TIME_NOISE_WINDOW` characters.
pub fn looks_like_time_noise(text: &str, match_start: usize, token: &str) -> bool {
    if !token.chars().any(char::is_whitespace) {
        return false;
    }

    let Some(before) = text.get(..match_start) else {
        return false;
    };

    let window_start = before
        .char_indices()
        .rev()
        .nth(TIME_NOISE_WINDOW - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let left = &before[window_start..];

    CLOCK_TAIL.is_match(left) || CLOCK_COLON_TAIL.is_match(left)
}
