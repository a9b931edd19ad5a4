//! Weighing ticket field extraction module.

mod parser;
pub mod normalize;
pub mod rules;

pub use normalize::normalize;
pub use parser::{ExtractionIssue, ExtractionResult, Stage, TicketParser, WeighingParser};
