//! Command-line parsing for the macro dashboards.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::JoinMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mdash", version, about = "Macro time-series dashboards (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Nominal vs real GDP with the implicit deflator.
    Gdp(DashArgs),
    /// A commodity price deflated by a price index.
    Real(DashArgs),
    /// Re-render a previously exported dataset JSON (no network).
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `mdash gdp` / `mdash real`,
    /// but renders results in a terminal UI using Ratatui.
    Tui(DashArgs),
}

/// Common options for a dashboard run.
#[derive(Debug, Parser, Clone)]
pub struct DashArgs {
    /// Numerator series id (default per dashboard: GDP / WTISPLC).
    #[arg(short = 'a', long = "series-a")]
    pub series_a: Option<String>,

    /// Denominator series id (default per dashboard: GDPC1 / CPIAUCSL).
    #[arg(short = 'b', long = "series-b")]
    pub series_b: Option<String>,

    /// Join policy (default per dashboard: exact for GDP, nearest for real).
    #[arg(long, value_enum)]
    pub join: Option<JoinMode>,

    /// Maximum date distance (days) accepted by the nearest join.
    #[arg(long, default_value_t = 31)]
    pub tolerance_days: i64,

    /// Base year for the Base=100 index columns.
    #[arg(long, default_value_t = 2012)]
    pub base_year: i32,

    /// Window start (YYYY-MM-DD); omit for the full joined range.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Window end (YYYY-MM-DD); omit for the full joined range.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Show the ratio panel (deflator / real price; enabled by default).
    #[arg(long, default_value_t = true)]
    pub ratio: bool,

    /// Hide the ratio panel.
    #[arg(long)]
    pub no_ratio: bool,

    /// Also show the indexed (Base=100) panel.
    #[arg(long)]
    pub index: bool,

    /// Use deterministic sample data instead of the network.
    #[arg(long)]
    pub offline: bool,

    /// Seed for offline sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Session cache TTL in seconds.
    #[arg(long, default_value_t = 900)]
    pub cache_ttl_secs: u64,

    /// Print the windowed data table.
    #[arg(long)]
    pub table: bool,

    /// Render ASCII charts in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the windowed table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the run (rows + metadata) to a dataset JSON.
    #[arg(long = "export-dataset")]
    pub export_dataset: Option<PathBuf>,
}

/// Options for re-plotting a saved dataset.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Dataset JSON file produced by `--export-dataset`.
    #[arg(long, value_name = "JSON")]
    pub dataset: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
