//! CLI tool for finding missing fonts in PowerPoint files.

use anyhow::{Context, Result};
use clap::Parser;
use fontaudit_core::report::FAILURE_BANNER;
use fontaudit_core::{
    AuditOptions, DocumentSource, FontMatching, FontOracle, MasterCheck, PresentationSnapshot,
    RenderedReport, Reporter, ScanReport, Scanner, WithOverrides,
};
use fontaudit_pptx::PptxSource;
use fontaudit_sysfonts::{system_oracle, ProbeStrategy};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Report fonts used by a presentation that are not installed on this system.
#[derive(Parser, Debug)]
#[command(name = "font-audit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input presentation(s): .pptx files or .json slide snapshots
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Print the report and rendered lines as JSON
    #[arg(long, conflicts_with = "list")]
    json: bool,

    /// Print only the missing font names, comma separated
    #[arg(short, long)]
    list: bool,

    /// Treat font names differing only in case, spacing, or Unicode form as one font
    #[arg(long)]
    fold_case: bool,

    /// Which slide fonts suppress the master-only tag
    #[arg(long, value_enum, default_value_t = MasterCheckArg::Cumulative)]
    master_check: MasterCheckArg,

    /// Look at text in picture shapes too
    #[arg(long)]
    no_picture_filter: bool,

    /// How installed fonts are detected (resolution or metrics)
    #[arg(long, default_value_t = ProbeStrategy::Resolution)]
    probe: ProbeStrategy,

    /// Font to treat as installed regardless of detection (repeatable)
    #[arg(short = 'a', long = "assume-installed", value_name = "FONT")]
    assume_installed: Vec<String>,

    /// Exit with a failure status if any font is missing or any file fails
    #[arg(long)]
    fail_on_missing: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum MasterCheckArg {
    Cumulative,
    Final,
}

impl From<MasterCheckArg> for MasterCheck {
    fn from(arg: MasterCheckArg) -> Self {
        match arg {
            MasterCheckArg::Cumulative => MasterCheck::Cumulative,
            MasterCheckArg::Final => MasterCheck::Final,
        }
    }
}

/// Machine-readable output for one file.
#[derive(Serialize)]
struct JsonOutput<'a> {
    file: String,
    report: &'a ScanReport,
    rendered: &'a RenderedReport,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let options = AuditOptions::new()
        .with_picture_filter(!args.no_picture_filter)
        .with_matching(if args.fold_case { FontMatching::Folded } else { FontMatching::Exact })
        .with_master_check(args.master_check.into());

    let oracle = WithOverrides::new(
        system_oracle(args.probe),
        args.assume_installed.iter().cloned(),
    );
    let scanner = Scanner::new(oracle).with_options(options);
    let reporter = Reporter::new();

    let mut failed = false;
    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &scanner) {
            Ok(report) => {
                let rendered = reporter.render(&report);
                if report.has_missing_fonts() {
                    failed = true;
                }
                if let Err(e) = print_report(input_path, &args, &report, &rendered) {
                    eprintln!("Error writing report for {}: {:#}", input_path.display(), e);
                    failed = true;
                }
            }
            Err(e) => {
                eprintln!("{}: {}\n\n{:#}", input_path.display(), FAILURE_BANNER, e);
                failed = true;
            }
        }
    }

    if args.fail_on_missing && failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Scan a single presentation file.
fn process_file<O: FontOracle>(input_path: &Path, scanner: &Scanner<O>) -> Result<ScanReport> {
    let is_snapshot = input_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_snapshot {
        let file = File::open(input_path)
            .with_context(|| format!("Failed to open {}", input_path.display()))?;
        let snapshot: PresentationSnapshot = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid slide snapshot {}", input_path.display()))?;
        log::debug!("Scanning snapshot with {} slide(s)", snapshot.slides.len());
        scan(scanner, &snapshot)
    } else {
        let source = PptxSource::open_path(input_path)?;
        log::debug!("Scanning as PPTX");
        scan(scanner, &source)
    }
}

fn scan<O: FontOracle, S: DocumentSource>(scanner: &Scanner<O>, source: &S) -> Result<ScanReport> {
    Ok(scanner.scan(source)?)
}

/// Print one file's report in the requested format.
fn print_report(
    input_path: &Path,
    args: &Args,
    report: &ScanReport,
    rendered: &RenderedReport,
) -> Result<()> {
    if args.json {
        let output = JsonOutput {
            file: input_path.display().to_string(),
            report,
            rendered,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if args.list {
        if !rendered.missing_font_names.is_empty() {
            println!("{}", rendered.copy_all());
        }
    } else {
        if args.input.len() > 1 {
            println!("# {}", input_path.display());
        }
        println!("{}", rendered);
    }
    Ok(())
}
