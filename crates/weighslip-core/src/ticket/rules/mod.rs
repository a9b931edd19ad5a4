//! Rule-based field extractors for weighing tickets.

pub mod dates;
pub mod patterns;
pub mod reconcile;
pub mod vehicle;
pub mod weights;

pub use dates::{extract_weighing_date, DateExtractor};
pub use patterns::*;
pub use reconcile::{candidate_pool, complete_arithmetic, fill_heuristics, resolve_triple};
pub use vehicle::{extract_vehicle_number, PlateExtractor};
pub use weights::{
    looks_like_time_noise, parse_kg, CandidateScan, CandidateScanner, LabeledWeightExtractor,
    RejectReason, RejectedToken, WeightCandidate, PLAUSIBLE_WEIGHT_KG, TIME_NOISE_WINDOW,
};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Replace the value, keeping confidence and position.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionMatch<U> {
        ExtractionMatch {
            value: f(self.value),
            confidence: self.confidence,
            position: self.position,
            source: self.source,
        }
    }
}
