//! Core library for weighing ticket OCR processing.
//!
//! This crate provides:
//! - Ticket input loading (plain OCR text or JSON payloads)
//! - Text normalization for noisy OCR output
//! - Weighing ticket field extraction (date, vehicle number, gross/tare/net)
//! - Weight reconciliation from unlabeled candidates
//! - Ticket data models and configuration

pub mod error;
pub mod input;
pub mod models;
pub mod ticket;

pub use error::{ExtractionError, InputError, Result, WeighslipError};
pub use input::load_ocr_text;
pub use models::{WeighingRecord, WeighslipConfig, WeightRole, Weights};
pub use ticket::{ExtractionIssue, ExtractionResult, Stage, TicketParser, WeighingParser};
