//! Process command - extract data from a single ticket file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use weighslip_core::models::{OutputFormat as RecordFormat, WeighingRecord};
use weighslip_core::ticket::{ExtractionResult, TicketParser, WeighingParser};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (OCR text or JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Show extraction issues and timing
    #[arg(long)]
    show_issues: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl From<OutputFormat> for RecordFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => RecordFormat::Json,
            OutputFormat::Csv => RecordFormat::Csv,
            OutputFormat::Text => RecordFormat::Text,
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Extracting ticket data...");

    let parser = WeighingParser::from_config(&config.extraction);
    let result = parser.parse_file(&args.input)?;

    pb.finish_and_clear();

    if args.show_issues {
        report_issues(&result);
    }

    let format = args.format.map(RecordFormat::from).unwrap_or(config.output.format);
    let output = format_record(&result.record, format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn report_issues(result: &ExtractionResult) {
    if result.issues.is_empty() {
        eprintln!("{} No extraction issues", style("ℹ").blue());
    } else {
        eprintln!("{}", style("Extraction issues:").yellow());
        for warning in result.warnings() {
            eprintln!("  - {}", warning);
        }
    }
    eprintln!(
        "{} Processing time: {}ms",
        style("ℹ").blue(),
        result.processing_time_ms
    );
}

/// Render a record in the requested format.
pub fn format_record(
    record: &WeighingRecord,
    format: RecordFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        RecordFormat::Json if pretty => Ok(serde_json::to_string_pretty(record)?),
        RecordFormat::Json => Ok(serde_json::to_string(record)?),
        RecordFormat::Csv => format_csv(record),
        RecordFormat::Text => Ok(format_text(record)),
    }
}

fn weight_cell(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn format_csv(record: &WeighingRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "weighing_date",
        "vehicle_number",
        "gross_weight_kg",
        "tare_weight_kg",
        "net_weight_kg",
    ])?;

    wtr.write_record([
        record.weighing_date.as_deref().unwrap_or(""),
        record.vehicle_number.as_deref().unwrap_or(""),
        &weight_cell(record.gross_weight_kg),
        &weight_cell(record.tare_weight_kg),
        &weight_cell(record.net_weight_kg),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &WeighingRecord) -> String {
    let weight = |value: Option<u32>| value.map_or_else(|| "-".to_string(), |v| format!("{} kg", v));

    // Tickets without a time print the date alone
    let date = match (record.weighing_datetime(), record.weighing_date.as_deref()) {
        (Some(dt), Some(raw)) if raw.contains(':') => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        (Some(dt), _) => dt.format("%Y-%m-%d").to_string(),
        (None, raw) => raw.unwrap_or("-").to_string(),
    };

    let mut output = String::new();

    output.push_str(&format!("Date:    {}\n", date));
    output.push_str(&format!(
        "Vehicle: {}\n",
        record.vehicle_number.as_deref().unwrap_or("-")
    ));
    output.push('\n');

    output.push_str("Weights:\n");
    output.push_str(&format!("  Gross: {}\n", weight(record.gross_weight_kg)));
    output.push_str(&format!("  Tare:  {}\n", weight(record.tare_weight_kg)));
    output.push_str(&format!("  Net:   {}\n", weight(record.net_weight_kg)));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> WeighingRecord {
        WeighingRecord {
            weighing_date: Some("2026-02-02 05:37".to_string()),
            vehicle_number: Some("80구8713".to_string()),
            gross_weight_kg: Some(12480),
            tare_weight_kg: None,
            net_weight_kg: Some(5010),
        }
    }

    #[test]
    fn test_format_csv() {
        let csv = format_record(&record(), RecordFormat::Csv, true).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("weighing_date,vehicle_number,gross_weight_kg,tare_weight_kg,net_weight_kg")
        );
        assert_eq!(lines.next(), Some("2026-02-02 05:37,80구8713,12480,,5010"));
    }

    #[test]
    fn test_format_text() {
        let text = format_record(&record(), RecordFormat::Text, true).unwrap();
        assert!(text.contains("Date:    2026-02-02 05:37:00"));
        assert!(text.contains("Gross: 12480 kg"));
        assert!(text.contains("Tare:  -"));
    }

    #[test]
    fn test_format_compact_json() {
        let json = format_record(&WeighingRecord::new(), RecordFormat::Json, false).unwrap();
        assert_eq!(
            json,
            r#"{"weighingDate":null,"vehicleNumber":null,"grossWeightKg":null,"tareWeightKg":null,"netWeightKg":null}"#
        );
    }
}
