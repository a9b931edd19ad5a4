//! Data models for weighing tickets and configuration.

pub mod config;
pub mod ticket;

pub use config::{ExtractionConfig, OutputConfig, OutputFormat, WeighslipConfig};
pub use ticket::{WeighingRecord, WeightRole, Weights};
