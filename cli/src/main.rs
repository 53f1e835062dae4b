//! vulnmerge CLI - merge spreadsheet-XML scan exports
//!
//! Extracts every ZIP archive in the working directory, collects the rows of
//! all XML Spreadsheet exports and writes them to one report.

use clap::{Parser, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};
use vulnmerge::render::XlsxOptions;
use vulnmerge::{OutputFormat, PipelineOptions, RunReport};

/// Merge vulnerability scan exports into one report
#[derive(Parser)]
#[command(
    name = "vulnmerge",
    author = "iyulab",
    version,
    about = "Merge spreadsheet-XML scan exports into one report",
    long_about = "vulnmerge - merge vulnerability scan exports.\n\n\
                  Extracts ZIP archives found in the working directory, reads every\n\
                  XML Spreadsheet export below it and writes all rows to a single report."
)]
struct Cli {
    /// Working directory (default: directory of the executable)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Report file, relative to the working directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, default_value = "xlsx")]
    format: Format,

    /// Keep archives after a successful run
    #[arg(long)]
    keep_archives: bool,

    /// Maximum column width in the Excel report
    #[arg(long, default_value = "50")]
    max_width: usize,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Print the run report as JSON
    #[arg(long)]
    summary_json: bool,
}

/// Report format
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Excel workbook
    Xlsx,
    /// JSON document
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xlsx => OutputFormat::Xlsx,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let pb = create_spinner("Merging exports...");
    init_logging(cli.quiet, &pb);

    let result = run(cli, &pb);
    pb.finish_and_clear();
    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool, pb: &ProgressBar) {
    let default = if quiet { "warn" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let pb = pb.clone();
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(move || SpinnerWriter(pb.clone()))
        .init();
}

/// Writes log lines to stderr with the spinner hidden, so they never
/// interleave with its ticks.
struct SpinnerWriter(ProgressBar);

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.0.suspend(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

fn run(cli: Cli, pb: &ProgressBar) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let dir = match cli.dir {
        Some(dir) => dir,
        None => executable_dir()?,
    };

    let mut options = PipelineOptions::new(&dir)
        .with_format(cli.format.into())
        .with_remove_archives(!cli.keep_archives)
        .with_xlsx_options(XlsxOptions::new().with_max_column_width(cli.max_width));
    if let Some(output) = cli.output {
        options = options.with_output(output);
    }

    let result = vulnmerge::run(&options);
    pb.finish_and_clear();
    let report = result?;

    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
        println!("{} {:.2?}", "Finished in".dimmed(), started.elapsed());
    }

    Ok(())
}

fn executable_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn print_summary(report: &RunReport) {
    println!("{}", "Merge Summary".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Directory".bold(), report.working_dir.display());

    for archive in &report.archives_extracted {
        println!("{} Extracted {}", "✓".green().bold(), archive.display());
    }
    println!("{}: {}", "XML files".bold(), report.xml_files.len());

    if report.no_input() {
        println!("{} No XML files found to process", "!".yellow().bold());
        return;
    }

    for file in &report.processed {
        println!(
            "  {} {} ({} rows)",
            "✓".green(),
            file_name(&file.path),
            file.rows
        );
    }
    for skipped in &report.skipped {
        println!(
            "  {} {}: {}",
            "✗".red(),
            file_name(&skipped.path),
            skipped.reason
        );
    }

    println!("{}: {}", "Rows".bold(), report.total_rows);
    for archive in &report.archives_removed {
        println!("{} Removed archive {}", "✓".green().bold(), archive.display());
    }
    for failure in &report.cleanup_failures {
        println!(
            "{} Could not remove {}: {}",
            "!".yellow().bold(),
            failure.archive.display(),
            failure.reason
        );
    }

    if let Some(ref output) = report.output {
        println!("{} Report saved: {}", "✓".green().bold(), output.display());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
