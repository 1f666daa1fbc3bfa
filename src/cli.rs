//! Command-line surface and end-of-run reporting.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{self, PipelineConfig, PipelineStats};
use crate::report::{aggregate_by_vendor, CsvReportSink, ReportFormat, ReportSink};

/// Extract Russian invoice PDFs from an .eml mail archive and report
/// per-document details and per-vendor totals.
#[derive(Parser)]
#[command(name = "invomail")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder containing .eml message files
    pub mail_dir: PathBuf,

    /// Folder extracted PDF attachments are staged into
    #[arg(long, default_value = "extracted_pdfs")]
    pub staging_dir: PathBuf,

    /// Folder the report CSVs are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Peek at argv for the verbose flag before clap runs, so logging can be
/// initialized first.
pub fn is_verbose() -> bool {
    std::env::args().any(|a| a == "-v" || a == "--verbose")
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = PipelineConfig {
        mail_dir: cli.mail_dir.clone(),
        staging_dir: cli.staging_dir.clone(),
    };

    let message_files = pipeline::list_message_files(&config.mail_dir)?;
    println!(
        "\n{} Processing {} messages from {}",
        style("→").cyan(),
        message_files.len(),
        config.mail_dir.display()
    );

    let pb = create_progress_bar(message_files.len() as u64);
    let outcome = pipeline::run_messages(&config, &message_files, || pb.inc(1))?;
    pb.finish_and_clear();

    if outcome.records.is_empty() {
        println!(
            "{} No qualifying Russian invoice PDFs found.",
            style("!").yellow()
        );
        print_stats(&outcome.stats);
        return Ok(());
    }

    let summary = aggregate_by_vendor(&outcome.records);
    let sink = CsvReportSink::new(&cli.output_dir, ReportFormat::default());
    let paths = sink.write_report(&outcome.records, &summary)?;

    println!("\n{} Extraction complete:", style("✓").green());
    print_stats(&outcome.stats);
    println!(
        "  Qualifying records: {}",
        style(outcome.records.len()).green()
    );
    println!("  Detail report:      {}", paths.detail.display());
    println!("  Summary report:     {}", paths.summary.display());
    println!("  Staged PDFs:        {}", cli.staging_dir.display());

    Ok(())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_stats(stats: &PipelineStats) {
    println!("  Messages scanned:   {}", style(stats.messages).dim());
    println!("  PDF attachments:    {}", stats.attachments);
    if stats.excluded > 0 {
        println!("  Not Russian:        {}", style(stats.excluded).yellow());
    }
    if stats.message_errors > 0 {
        println!("  Message errors:     {}", style(stats.message_errors).red());
    }
}
