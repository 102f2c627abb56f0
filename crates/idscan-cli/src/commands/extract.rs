//! Extract command - pull card fields from a single text file or image.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use idscan_core::extract::{DocumentParser, ExtractionResult, FieldParser};
use idscan_core::models::config::IdScanConfig;
use idscan_core::models::record::ExtractedRecord;
use idscan_core::ocr::OcrProvider;

use super::load_config;
use crate::vision::VisionProvider;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file with recognized text ("-" for stdin), or an image with --ocr
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Treat the input as an image and run it through the OCR provider
    #[arg(long)]
    ocr: bool,

    /// Print extraction warnings to stderr
    #[arg(long)]
    show_warnings: bool,
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

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = if args.ocr {
        recognize_image(&args.input, &config).await?
    } else {
        read_text(&args.input)?
    };

    info!("Extracting fields from {}", args.input.display());

    let parser = DocumentParser::from_config(&config.extraction)?;
    let result = parser.parse(&text);

    if args.show_warnings {
        print_warnings(&result);
    }

    let output = format_record(&result.record, args.format)?;

    if let Some(output_path) = &args.output {
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

fn read_text(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

async fn recognize_image(input: &Path, config: &IdScanConfig) -> anyhow::Result<String> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let data = fs::read(input)?;
    let format = image::guess_format(&data)
        .map_err(|_| anyhow::anyhow!("Not a supported image: {}", input.display()))?;
    debug!("Input image format: {:?}", format);

    let provider = VisionProvider::from_config(&config.ocr)?;
    let result = provider.recognize(&data).await?;

    if result.is_empty() {
        eprintln!("{} No text detected in image", style("⚠").yellow());
    }

    Ok(result.text)
}

pub fn print_warnings(result: &ExtractionResult) {
    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }
}

/// CSV header matching `csv_row`.
pub const CSV_HEADER: [&str; 6] = [
    "identificationNumber",
    "givenName",
    "lastName",
    "dateOfBirth",
    "dateOfIssue",
    "dateOfExpiry",
];

/// Record fields in `CSV_HEADER` order, absent fields as empty strings.
pub fn csv_row(record: &ExtractedRecord) -> [String; 6] {
    [
        &record.identification_number,
        &record.given_name,
        &record.last_name,
        &record.date_of_birth,
        &record.date_of_issue,
        &record.date_of_expiry,
    ]
    .map(|value| value.clone().unwrap_or_default())
}

pub fn format_record(record: &ExtractedRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ExtractedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractedRecord) -> String {
    let field = |value: &Option<String>| {
        value
            .clone()
            .unwrap_or_else(|| style("(not recognized)").dim().to_string())
    };

    let mut output = String::new();
    output.push_str(&format!("Identification number: {}\n", field(&record.identification_number)));
    output.push_str(&format!("Name:                  {}\n", field(&record.given_name)));
    output.push_str(&format!("Last name:             {}\n", field(&record.last_name)));
    output.push_str(&format!("Date of birth:         {}\n", field(&record.date_of_birth)));
    output.push_str(&format!("Date of issue:         {}\n", field(&record.date_of_issue)));
    output.push_str(&format!("Date of expiry:        {}", field(&record.date_of_expiry)));
    output
}
