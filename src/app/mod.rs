//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the report pipeline
//! - prints the text report (with stage markers) or launches the TUI
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ReportArgs};
use crate::domain::{ReportConfig, Stage};
use crate::error::Result;

pub mod pipeline;

/// Entry point for the `pulse` binary.
pub fn run() -> Result<()> {
    // We want `pulse` and `pulse -i sales.csv` to behave like `pulse tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<()> {
    let config = report_config_from_args(&args);

    // The percentages are fixed checkpoints carried over from the original
    // report UI; they mark which stage is running, nothing more.
    let run = pipeline::run_report(&config, |stage: Stage| {
        println!("{}... {}%", stage.label(), stage.percent());
    })?;
    println!("Report generation completed.");
    println!();

    println!("### Report Description");
    println!("{}", run.narrative);
    if let Some(note) = &run.forecast_note {
        println!();
        println!("{}", crate::report::format_forecast_placeholder(note));
    }
    println!();
    println!(
        "{}",
        crate::report::format_run_summary(&run.monthly, &run.metrics, run.forecast.as_ref())
    );

    // Optional exports.
    if let Some(path) = &config.export_monthly {
        crate::io::write_monthly_csv(path, &run.monthly)?;
    }
    if let Some(path) = &config.export_report {
        crate::io::write_report_json(path, &run.to_report_file(&config))?;
    }

    Ok(())
}

pub fn report_config_from_args(args: &ReportArgs) -> ReportConfig {
    ReportConfig {
        input: args.input.clone(),
        sheet: args.sheet.clone(),
        horizon: args.horizon,
        export_monthly: args.export_monthly.clone(),
        export_report: args.export_report.clone(),
    }
}

/// Rewrite argv so `pulse` defaults to `pulse tui`.
///
/// Rules:
/// - `pulse`                   -> `pulse tui`
/// - `pulse -i sales.csv ...`  -> `pulse tui -i sales.csv ...`
/// - `pulse --help/--version`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
