//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeighslipError};

/// Main configuration for weighslip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeighslipConfig {
    /// Weight extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Weight extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Smallest plausible weight in kilograms.
    pub min_weight_kg: u32,

    /// Largest plausible weight in kilograms.
    pub max_weight_kg: u32,

    /// Report tickets whose weights violate gross = tare + net.
    pub check_consistency: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_weight_kg: 1,
            max_weight_kg: 300_000,
            check_consistency: true,
        }
    }
}

/// Output format for extracted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON document.
    #[default]
    Json,
    /// CSV with a header row.
    Csv,
    /// Plain text summary.
    Text,
}

impl OutputFormat {
    /// File extension used when writing this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent JSON output.
    pub pretty: bool,

    /// Default output format.
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            format: OutputFormat::Json,
        }
    }
}

impl WeighslipConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| WeighslipError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| WeighslipError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;
        if extraction.min_weight_kg > extraction.max_weight_kg {
            return Err(WeighslipError::Config(format!(
                "min_weight_kg ({}) exceeds max_weight_kg ({})",
                extraction.min_weight_kg, extraction.max_weight_kg
            )));
        }
        Ok(())
    }
}
