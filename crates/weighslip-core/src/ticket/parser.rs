//! Weighing ticket parser combining the extraction stages.

use std::any::Any;
use std::fmt;
use std::ops::RangeInclusive;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::input::load_ocr_text;
use crate::models::{ExtractionConfig, WeighingRecord, WeightRole, Weights};

use super::normalize::normalize;
use super::rules::{
    candidate_pool, complete_arithmetic, extract_vehicle_number, extract_weighing_date,
    fill_heuristics, parse_kg, resolve_triple, CandidateScanner, LabeledWeightExtractor,
    RejectReason, PLAUSIBLE_WEIGHT_KG,
};

/// Pipeline stage, as reported in issue markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Vehicle,
    Date,
    Normalize,
    Labeled,
    Scan,
    Resolve,
    Fill,
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Vehicle => "vehicle",
            Stage::Date => "date",
            Stage::Normalize => "normalize",
            Stage::Labeled => "labeled",
            Stage::Scan => "scan",
            Stage::Resolve => "resolve",
            Stage::Fill => "fill",
            Stage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Recoverable problem noticed while extracting one ticket.
///
/// None of these stop extraction; they let callers tell "nothing found"
/// apart from "something was masked".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionIssue {
    /// A matched weight token did not fit an integer. `role` is `None`
    /// for unlabeled tokens from the candidate scan.
    UnparseableWeight {
        role: Option<WeightRole>,
        token: String,
    },

    /// A stage panicked; later weight stages were skipped.
    StageFailed { stage: Stage, message: String },

    /// All three weights are set but `gross != tare + net`.
    InconsistentWeights { gross: u32, tare: u32, net: u32 },
}

impl ExtractionIssue {
    /// The error this issue masks, if any.
    pub fn to_error(&self) -> Option<ExtractionError> {
        match self {
            ExtractionIssue::UnparseableWeight { role, token } => Some(ExtractionError::Parse {
                field: role.map_or("candidate", |r| r.name()).to_string(),
                value: token.clone(),
            }),
            ExtractionIssue::StageFailed { stage, message } => Some(ExtractionError::StageAborted {
                stage: stage.to_string(),
                message: message.clone(),
            }),
            ExtractionIssue::InconsistentWeights { .. } => None,
        }
    }
}

impl fmt::Display for ExtractionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.to_error()) {
            (_, Some(err)) => write!(f, "{}", err),
            (ExtractionIssue::InconsistentWeights { gross, tare, net }, None) => {
                write!(f, "gross {} != tare {} + net {}", gross, tare, net)
            }
            _ => Ok(()),
        }
    }
}

/// Result of ticket extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted ticket data.
    pub record: WeighingRecord,
    /// Recoverable issues, in the order they were noticed.
    pub issues: Vec<ExtractionIssue>,
    /// Text the weight rules ran on.
    #[serde(skip)]
    pub normalized_text: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// True when all three weights were found.
    pub fn is_complete(&self) -> bool {
        self.record.weights().is_complete()
    }

    /// Issues rendered as messages.
    pub fn warnings(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Trait for ticket parsing.
pub trait TicketParser {
    /// Parse a ticket from raw OCR text. Never fails; the worst case is an
    /// empty record.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Load a ticket file and parse it.
    fn parse_file(&self, path: &Path) -> crate::Result<ExtractionResult> {
        let text = load_ocr_text(path)?;
        Ok(self.parse(&text))
    }
}

/// Run `f`, turning a panic into a `StageFailed` issue.
fn guarded<T>(stage: Stage, issues: &mut Vec<ExtractionIssue>, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!("Stage {} aborted: {}", stage, message);
            issues.push(ExtractionIssue::StageFailed { stage, message });
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Rule-based weighing ticket parser.
#[derive(Debug, Clone)]
pub struct WeighingParser {
    /// Accepted weight range.
    bounds: RangeInclusive<u32>,
    /// Whether to report triples violating gross = tare + net.
    check_consistency: bool,
}

impl WeighingParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            bounds: PLAUSIBLE_WEIGHT_KG,
            check_consistency: true,
        }
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_weight_bounds(config.min_weight_kg, config.max_weight_kg)
            .with_consistency_check(config.check_consistency)
    }

    /// Set the plausible weight range.
    pub fn with_weight_bounds(mut self, min_kg: u32, max_kg: u32) -> Self {
        self.bounds = min_kg..=max_kg;
        self
    }

    /// Set consistency reporting.
    pub fn with_consistency_check(mut self, check: bool) -> Self {
        self.check_consistency = check;
        self
    }

    fn match_labeled(&self, text: &str) -> (Weights, Vec<ExtractionIssue>) {
        let mut weights = Weights::default();
        let mut issues = Vec::new();

        for role in WeightRole::ALL {
            let extractor = LabeledWeightExtractor::new(role).with_bounds(self.bounds.clone());
            let Some(token) = extractor.find_token(text) else {
                continue;
            };

            let raw = token.value.clone();
            match extractor.to_weight(token) {
                Some(found) => {
                    debug!("Labeled {}: {}", role, found.value);
                    weights = weights.with(role, found.value);
                }
                None if parse_kg(&raw).is_none() => {
                    issues.push(ExtractionIssue::UnparseableWeight {
                        role: Some(role),
                        token: raw,
                    });
                }
                None => {}
            }
        }

        (weights, issues)
    }

    /// Scanned candidates minus labeled gross/tare, deduplicated and sorted.
    /// A labeled net stays in: the triple search needs it.
    fn scan_candidates(&self, text: &str, labeled: Weights) -> (Vec<u32>, Vec<ExtractionIssue>) {
        let scan = CandidateScanner::new().with_bounds(self.bounds.clone()).scan(text);

        let issues = scan
            .rejected
            .iter()
            .filter(|r| r.reason == RejectReason::Unparseable)
            .map(|r| ExtractionIssue::UnparseableWeight {
                role: None,
                token: r.token.clone(),
            })
            .collect();

        let pool = candidate_pool(
            scan.values()
                .into_iter()
                .filter(|v| Some(*v) != labeled.gross && Some(*v) != labeled.tare),
        );
        debug!(
            "Scanned {} candidates ({} rejected), pool {:?}",
            scan.candidates.len(),
            scan.rejected.len(),
            pool
        );

        (pool, issues)
    }

    /// Run the weight stages over normalized text.
    ///
    /// Each stage is guarded; a failing stage keeps what earlier stages
    /// found and skips the rest.
    pub fn extract_weights(&self, normalized: &str) -> (Weights, Vec<ExtractionIssue>) {
        let mut issues = Vec::new();
        let weights = self.run_weight_stages(normalized, &mut issues);
        (weights, issues)
    }

    fn run_weight_stages(&self, normalized: &str, issues: &mut Vec<ExtractionIssue>) -> Weights {
        let Some((mut weights, found)) = guarded(Stage::Labeled, issues, || self.match_labeled(normalized))
        else {
            return Weights::default();
        };
        issues.extend(found);

        if !weights.is_complete() {
            debug!("Missing after labeled pass: {:?}", weights.missing());
            let labeled = weights;
            let Some((pool, found)) =
                guarded(Stage::Scan, issues, || self.scan_candidates(normalized, labeled))
            else {
                return weights;
            };
            issues.extend(found);

            if !pool.is_empty() {
                match guarded(Stage::Resolve, issues, || resolve_triple(weights, &pool)) {
                    Some(resolved) => weights = resolved,
                    None => return weights,
                }
                match guarded(Stage::Fill, issues, || fill_heuristics(weights, &pool)) {
                    Some(filled) => weights = filled,
                    None => return weights,
                }
            }
        }

        guarded(Stage::Complete, issues, || complete_arithmetic(weights)).unwrap_or(weights)
    }
}

impl Default for WeighingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketParser for WeighingParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut issues = Vec::new();

        info!("Parsing weighing ticket from {} characters of text", text.chars().count());

        // Date and vehicle read the raw text: normalization removes clock tokens.
        let mut record = WeighingRecord::new();
        record.vehicle_number = guarded(Stage::Vehicle, &mut issues, || extract_vehicle_number(text))
            .flatten()
            .map(|m| m.value);
        record.weighing_date = guarded(Stage::Date, &mut issues, || extract_weighing_date(text))
            .flatten()
            .map(|m| m.value);

        let normalized = guarded(Stage::Normalize, &mut issues, || normalize(text)).unwrap_or_default();
        let weights = self.run_weight_stages(&normalized, &mut issues);
        let record = record.with_weights(weights);

        if self.check_consistency && weights.is_consistent() == Some(false) {
            if let (Some(gross), Some(tare), Some(net)) = (weights.gross, weights.tare, weights.net) {
                warn!("Inconsistent weights: gross {} != tare {} + net {}", gross, tare, net);
                issues.push(ExtractionIssue::InconsistentWeights { gross, tare, net });
            }
        }

        debug!(
            "Extracted ticket: gross={:?} tare={:?} net={:?}, {} issues",
            record.gross_weight_kg,
            record.tare_weight_kg,
            record.net_weight_kg,
            issues.len()
        );

        ExtractionResult {
            record,
            issues,
            normalized_text: normalized,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
