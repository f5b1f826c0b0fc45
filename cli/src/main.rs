//! scancheck CLI - barcode identifier validation for scanned PDFs

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use scancheck::decode::{MultiFormatDecoder, QrDecoder};
use scancheck::rasterize::PdfiumRasterizer;
use scancheck::report::{default_report_path, STATE_FILE};
use scancheck::validate::{DEFAULT_DPI, DEFAULT_MAIN_PAGE_COUNT, DEFAULT_SUPPL_SET_SIZE};
use scancheck::{
    find_documents, run_batch, BarcodeDecoder, BatchEvent, ReportStore, ValidationConfig,
    ValidationReport, Validator,
};

#[derive(Parser)]
#[command(name = "scancheck")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Validate barcode identifiers on scanned PDF documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every PDF in a folder and append verdicts to a CSV report
    Run {
        /// Folder containing the scanned PDFs
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Report file (default: <folder name>.csv)
        #[arg(short, long, value_name = "FILE")]
        report: Option<PathBuf>,

        #[command(flatten)]
        options: ValidationArgs,
    },

    /// Validate a single PDF without writing a report
    Check {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        options: ValidationArgs,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum DecoderKind {
    /// 1-D and 2-D symbologies (Code 128, Code 39, EAN, QR, Data Matrix, ...)
    Multi,
    /// QR codes only
    Qr,
}

#[derive(Args)]
struct ValidationArgs {
    /// Pages in the main section
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAIN_PAGE_COUNT)]
    main_pages: u32,

    /// Pages per supplemental group
    #[arg(long, value_name = "N", default_value_t = DEFAULT_SUPPL_SET_SIZE)]
    set_size: u32,

    /// Rasterization resolution
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: f32,

    /// Pages decoded concurrently (default: number of CPUs)
    #[arg(short, long, env = "SCANCHECK_WORKERS")]
    workers: Option<usize>,

    /// Decode one page at a time
    #[arg(long)]
    sequential: bool,

    /// Barcode decoding backend
    #[arg(long, value_enum, default_value_t = DecoderKind::Multi)]
    decoder: DecoderKind,
}

impl ValidationArgs {
    fn to_config(&self) -> ValidationConfig {
        let mut config = ValidationConfig::new()
            .with_main_page_count(self.main_pages)
            .with_suppl_set_size(self.set_size)
            .with_dpi(self.dpi);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if self.sequential {
            config = config.sequential();
        }
        config
    }

    fn decoder(&self) -> Box<dyn BarcodeDecoder> {
        match self.decoder {
            DecoderKind::Multi => Box::new(MultiFormatDecoder::new()),
            DecoderKind::Qr => Box::new(QrDecoder::new()),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            folder,
            report,
            options,
        } => cmd_run(&folder, report, &options),
        Commands::Check {
            input,
            json,
            options,
        } => cmd_check(&input, json, &options),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_run(
    folder: &Path,
    report: Option<PathBuf>,
    options: &ValidationArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = find_documents(folder)?;

    // The report and state file exist even for an empty folder
    let report_path = report.unwrap_or_else(|| default_report_path(folder));
    let mut store = ReportStore::open_recorded(&report_path, STATE_FILE)?;
    log::debug!("Using report {}", report_path.display());

    if documents.is_empty() {
        println!("{} {}", "No PDF files found in".yellow(), folder.display());
        println!("{} {}", "Report:".bold(), report_path.display());
        return Ok(());
    }

    let validator = Validator::new(
        PdfiumRasterizer::new()?,
        options.decoder(),
        options.to_config(),
    )?;

    println!(
        "{} {} documents ({} already in {})",
        "Validating".cyan().bold(),
        documents.len(),
        documents
            .iter()
            .filter(|p| {
                p.file_name()
                    .map(|n| store.contains(&n.to_string_lossy()))
                    .unwrap_or(false)
            })
            .count(),
        report_path.display()
    );

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let summary = run_batch(&validator, &mut store, &documents, |event| match event {
        BatchEvent::Skipped { filename } => {
            pb.println(format!("  {} {}", "skip".dimmed(), filename));
            pb.inc(1);
        }
        BatchEvent::Started { filename } => {
            pb.set_message(filename.to_string());
        }
        BatchEvent::Completed { serial, report } => {
            pb.println(format!("  {:>4} {}", serial, status_line(report)));
            pb.inc(1);
        }
        BatchEvent::Failed { filename, error } => {
            pb.println(format!("  {} {}: {}", "fail".red().bold(), filename, error));
            pb.inc(1);
        }
    });

    pb.finish_and_clear();

    println!("\n{}", "Summary".green().bold());
    println!("  {} processed: {}", "├─".dimmed(), summary.processed);
    println!("  {} match:     {}", "├─".dimmed(), summary.matched.to_string().green());
    println!("  {} mismatch:  {}", "├─".dimmed(), summary.mismatched.to_string().red());
    println!("  {} skipped:   {}", "├─".dimmed(), summary.skipped);
    println!("  {} failed:    {}", "└─".dimmed(), summary.failed);
    println!("\n{} {}", "Report:".bold(), report_path.display());

    Ok(())
}

fn cmd_check(
    input: &Path,
    json: bool,
    options: &ValidationArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let validator = Validator::new(
        PdfiumRasterizer::new()?,
        options.decoder(),
        options.to_config(),
    )?;
    let report = validator.validate_file(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Document Verdict".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "MD5".bold(), report.content_digest);
    println!("{}: {}", "Pages".bold(), report.total_pages);
    println!("{}: {}", "Expected".bold(), report.expected_identifier);
    println!("{}: {}", "Decoded".bold(), report.decoded_identifier);
    for (i, pair) in report.supplemental.iter().enumerate() {
        println!(
            "{}: {} ({})",
            format!("Set {}", i + 1).bold(),
            pair.expected,
            pair.decoded
        );
    }
    println!();
    println!("{}", status_line(&report));

    Ok(())
}

fn status_line(report: &ValidationReport) -> String {
    if report.is_match() {
        format!("{} {}", "match".green().bold(), report.filename)
    } else {
        format!(
            "{} {}: {}",
            "mismatch".red().bold(),
            report.filename,
            report.issue_detail
        )
    }
}

fn cmd_version() {
    println!("{} {}", "scancheck".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Barcode identifier validation for scanned PDFs");
    println!();
    println!("License: MIT");
}
