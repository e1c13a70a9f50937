//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the dashboard pipeline
//! - prints reports/plots
//! - writes optional exports

use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;

use crate::cli::{Command, DashArgs, PlotArgs};
use crate::data::{FredGraphClient, SeriesCache};
use crate::domain::{Dashboard, DashboardConfig, DateWindow};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `mdash` and `mdash --offline` to behave like `mdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Gdp(args) => handle_dashboard(Dashboard::Gdp, args),
        Command::Real(args) => handle_dashboard(Dashboard::Real, args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_dashboard(dashboard: Dashboard, args: DashArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(dashboard, &args);
    let client = FredGraphClient::new();
    let mut cache = SeriesCache::new(Duration::from_secs(config.cache_ttl_secs));

    let run = pipeline::run_dashboard(&config, &client, &mut cache)?;

    println!("{}", crate::report::format_run_summary(&run));

    if args.table {
        println!("{}", crate::report::format_table(&run));
    }

    if args.plot && !args.no_plot {
        for panel in &run.panels {
            println!(
                "{}",
                crate::plot::render_ascii_panel(panel, args.width, args.height)
            );
        }
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_table_csv(path, &run)?;
    }
    if let Some(path) = &args.export_dataset {
        crate::io::dataset::write_dataset_json(path, &run)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let dataset = crate::io::dataset::read_dataset_json(&args.dataset)?;

    for warning in &dataset.warnings {
        println!("warning: {warning}");
    }
    for panel in dataset.panels() {
        println!(
            "{}",
            crate::plot::render_ascii_panel(&panel, args.width, args.height)
        );
    }

    Ok(())
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(Dashboard::Gdp, &args);
    crate::tui::run(config)
}

/// Resolve CLI flags plus per-dashboard defaults into a pipeline config.
pub fn dashboard_config_from_args(dashboard: Dashboard, args: &DashArgs) -> DashboardConfig {
    let (default_a, default_b) = dashboard.default_series();

    let window = match (args.start, args.end) {
        (None, None) => None,
        (start, end) => Some(DateWindow {
            start: start.unwrap_or(NaiveDate::MIN),
            end: end.unwrap_or(NaiveDate::MAX),
        }),
    };

    DashboardConfig {
        dashboard,
        series_a: args
            .series_a
            .clone()
            .unwrap_or_else(|| default_a.to_string()),
        series_b: args
            .series_b
            .clone()
            .unwrap_or_else(|| default_b.to_string()),
        join: args.join.unwrap_or_else(|| dashboard.default_join()),
        tolerance_days: args.tolerance_days,
        base_year: args.base_year,
        show_ratio: args.ratio && !args.no_ratio,
        show_index: args.index,
        window,
        offline: args.offline,
        sample_seed: args.seed,
        cache_ttl_secs: args.cache_ttl_secs,
    }
}

/// Rewrite argv so `mdash` defaults to `mdash tui`.
///
/// Rules:
/// - `mdash`                     -> `mdash tui`
/// - `mdash --offline ...`       -> `mdash tui --offline ...`
/// - `mdash --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "gdp" | "real" | "plot" | "tui");
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

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> DashArgs {
        let mut argv = vec!["mdash", "gdp"];
        argv.extend_from_slice(extra);
        let cli = crate::cli::Cli::parse_from(argv);
        match cli.command {
            Command::Gdp(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn bare_invocation_rewrites_to_tui() {
        let argv = rewrite_args(vec!["mdash".to_string()]);
        assert_eq!(argv, vec!["mdash", "tui"]);
    }

    #[test]
    fn leading_flag_rewrites_to_tui() {
        let argv = rewrite_args(vec!["mdash".to_string(), "--offline".to_string()]);
        assert_eq!(argv, vec!["mdash", "tui", "--offline"]);
    }

    #[test]
    fn explicit_subcommand_is_untouched() {
        let argv = rewrite_args(vec!["mdash".to_string(), "real".to_string()]);
        assert_eq!(argv, vec!["mdash", "real"]);
    }

    #[test]
    fn defaults_resolve_per_dashboard() {
        let config = dashboard_config_from_args(Dashboard::Real, &args(&[]));
        assert_eq!(config.series_a, "WTISPLC");
        assert_eq!(config.series_b, "CPIAUCSL");
        assert_eq!(config.join, crate::domain::JoinMode::Nearest);
    }

    #[test]
    fn half_open_window_fills_the_missing_bound() {
        let config = dashboard_config_from_args(Dashboard::Gdp, &args(&["--start", "2000-01-01"]));
        let window = config.window.unwrap();
        assert_eq!(
            window.start,
            chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
        assert_eq!(window.end, chrono::NaiveDate::MAX);
    }
}
