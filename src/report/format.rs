//! Run summary and data table formatting.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use chrono::NaiveDate;

use crate::app::pipeline::RunOutput;
use crate::domain::SeriesSummary;

/// Format the run summary: series spans, join stats, base-year status,
/// window, and warnings.
pub fn format_run_summary(run: &RunOutput) -> String {
    let labels = run.config.dashboard.labels();
    let mut out = String::new();

    out.push_str(&format!(
        "=== mdash - {} dashboard ===\n",
        run.config.dashboard.display_name()
    ));
    out.push_str(&series_line(labels.a_role, &run.series_a));
    out.push_str(&series_line(labels.b_role, &run.series_b));

    match run.config.join {
        crate::domain::JoinMode::Exact => {
            out.push_str(&format!("Join: exact | rows={}\n", run.table.len()));
        }
        crate::domain::JoinMode::Nearest => {
            out.push_str(&format!(
                "Join: nearest (tolerance {}d) | rows={}\n",
                run.config.tolerance_days,
                run.table.len()
            ));
        }
    }

    match &run.config.window {
        Some(w) => out.push_str(&format!(
            "Window: {} .. {} | rows shown={}\n",
            w.start,
            w.end,
            run.view.len()
        )),
        None => out.push_str(&format!("Window: full range | rows shown={}\n", run.view.len())),
    }

    if run.config.show_index {
        out.push_str(&format!(
            "Base year {}: {}={} | {}={} | {}={}\n",
            run.config.base_year,
            labels.a_role,
            fmt_base(run.bases.a),
            labels.b_role,
            fmt_base(run.bases.b),
            labels.ratio_name,
            fmt_base(run.bases.ratio),
        ));
    }

    for warning in &run.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }

    out
}

/// Format the windowed table: date, both levels, and the derived columns.
/// Missing values render as `-`.
pub fn format_table(run: &RunOutput) -> String {
    let labels = run.config.dashboard.labels();
    let mut out = String::new();

    out.push_str(&format!(
        "{:<12} {:>14} {:>14} {:>10} {:>10} {:>10} {:>10}\n",
        "date",
        run.config.series_a,
        run.config.series_b,
        labels.ratio_name.to_ascii_lowercase(),
        "idx(a)",
        "idx(b)",
        "idx(ratio)",
    ));

    for row in &run.view {
        out.push_str(&format!(
            "{:<12} {:>14.2} {:>14.2} {:>10} {:>10} {:>10} {:>10}\n",
            row.date,
            row.a,
            row.b,
            fmt_opt(row.ratio),
            fmt_opt(row.a_index),
            fmt_opt(row.b_index),
            fmt_opt(row.ratio_index),
        ));
    }

    if run.view.is_empty() {
        out.push_str("(no rows in window)\n");
    }

    out
}

fn series_line(role: &str, summary: &SeriesSummary) -> String {
    format!(
        "{role} ({}): n={} | {} .. {}\n",
        summary.id,
        summary.n_obs,
        fmt_date(summary.first),
        fmt_date(summary.last),
    )
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn fmt_base(base: Option<f64>) -> String {
    match base {
        Some(v) => format!("{v:.2}"),
        None => "undefined".to_string(),
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_dashboard;
    use crate::data::{FredGraphClient, SeriesCache};
    use crate::domain::{Dashboard, DashboardConfig};
    use std::time::Duration;

    fn offline_run(mutate: impl FnOnce(&mut DashboardConfig)) -> RunOutput {
        let mut config = DashboardConfig::for_dashboard(Dashboard::Gdp);
        config.offline = true;
        mutate(&mut config);

        let client = FredGraphClient::with_base_url("http://unused.invalid");
        let mut cache = SeriesCache::new(Duration::from_secs(0));
        run_dashboard(&config, &client, &mut cache).unwrap()
    }

    #[test]
    fn summary_names_both_series() {
        let run = offline_run(|_| {});
        let text = format_run_summary(&run);

        assert!(text.contains("Nominal GDP (GDP)"));
        assert!(text.contains("Real GDP (GDPC1)"));
        assert!(text.contains("Join: exact"));
    }

    #[test]
    fn summary_reports_undefined_bases() {
        let run = offline_run(|c| {
            c.show_index = true;
            c.base_year = 1899;
        });
        let text = format_run_summary(&run);

        assert!(text.contains("Base year 1899"));
        assert!(text.contains("undefined"));
        assert!(text.contains("warning:"));
    }

    #[test]
    fn table_marks_missing_values() {
        let run = offline_run(|c| {
            c.show_index = true;
            c.base_year = 1899;
        });
        let text = format_table(&run);

        // Index columns are undefined for 1899, so every row shows `-`.
        let data_line = text.lines().nth(1).unwrap();
        assert!(data_line.ends_with('-'));
    }
}
