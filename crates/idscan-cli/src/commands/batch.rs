//! Batch processing command for multiple text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use idscan_core::extract::{DocumentParser, FieldParser};
use idscan_core::models::record::ExtractedRecord;

use super::extract::{csv_row, format_record, OutputFormat, CSV_HEADER};
use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching text files
    #[arg(required = true)]
    input: String,

    /// Output directory (one file per input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV in the output directory
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ExtractedRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = DocumentParser::from_config(&config.extraction)?;
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = process_single_file(&path, &parser, &args);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(record) => {
                debug!("Processed {} in {}ms", path.display(), processing_time_ms);
                results.push(ProcessResult {
                    path,
                    record: Some(record),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                if !args.continue_on_error {
                    pb.abandon();
                    return Err(e.context(format!("processing {}", path.display())));
                }
                results.push(ProcessResult {
                    path,
                    record: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let dir = args.output_dir.as_deref().unwrap_or_else(|| Path::new("."));
        let summary_path = dir.join("summary.csv");
        write_summary(&results, &summary_path)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let complete = results
        .iter()
        .filter(|r| r.record.as_ref().is_some_and(|rec| rec.missing_fields().is_empty()))
        .count();

    eprintln!(
        "{} Processed {} files ({} with all fields, {} failed) in {:.1}s",
        style("✓").green(),
        results.len(),
        complete,
        failed,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn process_single_file(
    path: &Path,
    parser: &DocumentParser,
    args: &BatchArgs,
) -> anyhow::Result<ExtractedRecord> {
    let text = fs::read_to_string(path)?;
    let record = parser.parse(&text).record;
    let output = format_record(&record, args.format)?;

    match &args.output_dir {
        Some(dir) => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            let extension = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };
            fs::write(dir.join(format!("{}.{}", stem, extension)), output)?;
        }
        None => println!("{}", output),
    }

    Ok(record)
}

fn write_summary(results: &[ProcessResult], path: &Path) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["file"];
    header.extend(CSV_HEADER);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let mut row = vec![result.path.display().to_string()];
        match &result.record {
            Some(record) => row.extend(csv_row(record)),
            None => row.extend(std::iter::repeat_n(String::new(), CSV_HEADER.len())),
        }
        row.push(result.processing_time_ms.to_string());
        row.push(result.error.clone().unwrap_or_default());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
