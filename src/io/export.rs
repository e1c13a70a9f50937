//! Export the windowed table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per aligned date, derived columns blank where missing.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::error::AppError;

/// Write the windowed rows to a CSV file.
pub fn write_table_csv(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::invalid(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(
        file,
        "date,{a},{b},ratio,{a}_index,{b}_index,ratio_index",
        a = run.config.series_a,
        b = run.config.series_b,
    )
    .map_err(|e| AppError::invalid(format!("Failed to write export CSV header: {e}")))?;

    for row in &run.view {
        writeln!(
            file,
            "{},{:.6},{:.6},{},{},{},{}",
            row.date,
            row.a,
            row.b,
            fmt_cell(row.ratio),
            fmt_cell(row.a_index),
            fmt_cell(row.b_index),
            fmt_cell(row.ratio_index),
        )
        .map_err(|e| AppError::invalid(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

fn fmt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}
