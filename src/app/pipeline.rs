//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> align -> derive -> window -> panels
//!
//! The pipeline takes every parameter as an explicit argument (config, HTTP
//! client, cache) and returns a `RunOutput` describing renderable artifacts,
//! so it is testable without a UI harness and independent of what triggered
//! the run. The CLI and the TUI focus on presentation (printing vs widgets).

use crate::compute::{align, derive, filter_window};
use crate::data::{FredGraphClient, SeriesCache, sample};
use crate::domain::{
    AlignedRow, DashboardConfig, IndexBases, JoinMode, Panel, PanelSeries, SeriesSummary,
    SeriesTable,
};
use crate::error::AppError;

/// All computed outputs of a single dashboard run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub config: DashboardConfig,
    pub series_a: SeriesSummary,
    pub series_b: SeriesSummary,
    /// Full derived table over the joined range.
    pub table: Vec<AlignedRow>,
    /// The window-filtered slice presenters actually draw.
    pub view: Vec<AlignedRow>,
    pub bases: IndexBases,
    pub warnings: Vec<String>,
    pub panels: Vec<Panel>,
}

/// Execute the full pipeline for one dashboard configuration.
pub fn run_dashboard(
    config: &DashboardConfig,
    client: &FredGraphClient,
    cache: &mut SeriesCache,
) -> Result<RunOutput, AppError> {
    validate_config(config)?;

    let (a, b) = fetch_pair(config, client, cache)?;
    let mut warnings = Vec::new();

    let joined = align(&a, &b, config.join, config.tolerance_days);
    if joined.is_empty() {
        warnings.push(format!(
            "Series {} and {} share no observation dates under the {:?} join.",
            a.id, b.id, config.join
        ));
    }

    let derived = derive(&joined, config.base_year);
    if config.show_index && !joined.is_empty() {
        push_index_warnings(&mut warnings, config, &derived.bases);
    }

    let view = match &config.window {
        Some(window) => {
            let view = filter_window(&derived.rows, window);
            if view.is_empty() && !derived.rows.is_empty() {
                warnings.push(format!(
                    "Date window {} .. {} selects no rows.",
                    window.start, window.end
                ));
            }
            view
        }
        None => derived.rows.clone(),
    };

    let panels = build_panels(config, &view, &derived.bases);

    Ok(RunOutput {
        config: config.clone(),
        series_a: a.summary(),
        series_b: b.summary(),
        table: derived.rows,
        view,
        bases: derived.bases,
        warnings,
        panels,
    })
}

fn validate_config(config: &DashboardConfig) -> Result<(), AppError> {
    if config.series_a.trim().is_empty() || config.series_b.trim().is_empty() {
        return Err(AppError::invalid("Series ids must not be empty."));
    }
    if config.join == JoinMode::Nearest && config.tolerance_days < 0 {
        return Err(AppError::invalid(
            "Nearest-join tolerance must be >= 0 days.",
        ));
    }
    Ok(())
}

/// Fetch both input series, consulting the cache first.
///
/// Offline mode substitutes the deterministic sample generator; everything
/// downstream is identical.
pub fn fetch_pair(
    config: &DashboardConfig,
    client: &FredGraphClient,
    cache: &mut SeriesCache,
) -> Result<(SeriesTable, SeriesTable), AppError> {
    if config.offline {
        return Ok(sample::generate_pair(
            config.dashboard,
            &config.series_a,
            &config.series_b,
            config.sample_seed,
        ));
    }

    let a = fetch_cached(client, cache, &config.series_a)?;
    let b = fetch_cached(client, cache, &config.series_b)?;
    Ok((a, b))
}

fn fetch_cached(
    client: &FredGraphClient,
    cache: &mut SeriesCache,
    id: &str,
) -> Result<SeriesTable, AppError> {
    if let Some(table) = cache.get(id) {
        return Ok(table);
    }
    let table = client.fetch_series(id)?;
    cache.insert(table.clone());
    Ok(table)
}

fn push_index_warnings(warnings: &mut Vec<String>, config: &DashboardConfig, bases: &IndexBases) {
    let labels = config.dashboard.labels();

    if bases.all_missing() {
        warnings.push(format!(
            "Could not compute index for base year {} (no data in that year). Try another base year.",
            config.base_year
        ));
        return;
    }

    let columns = [
        (bases.a, labels.a_role),
        (bases.b, labels.b_role),
        (bases.ratio, labels.ratio_name),
    ];
    for (base, name) in columns {
        if base.is_none() {
            warnings.push(format!(
                "No {name} index for base year {}: base value is missing or zero.",
                config.base_year
            ));
        }
    }
}

/// Translate the windowed view into backend-independent chart panels.
///
/// Panel rules:
/// - levels panel is always present
/// - ratio panel when toggled
/// - index panel when toggled and at least one base is defined; undefined
///   columns are suppressed rather than drawn with garbage values
pub fn build_panels(config: &DashboardConfig, view: &[AlignedRow], bases: &IndexBases) -> Vec<Panel> {
    let labels = config.dashboard.labels();
    let mut panels = Vec::new();

    panels.push(Panel {
        title: labels.levels_title.to_string(),
        y_label: labels.y_label_levels.to_string(),
        series: vec![
            PanelSeries {
                name: format!("{} ({})", labels.a_role, config.series_a),
                points: view.iter().map(|r| (r.date, r.a)).collect(),
            },
            PanelSeries {
                name: format!("{} ({})", labels.b_role, config.series_b),
                points: view.iter().map(|r| (r.date, r.b)).collect(),
            },
        ],
    });

    if config.show_ratio {
        panels.push(Panel {
            title: labels.ratio_title.to_string(),
            y_label: labels.y_label_ratio.to_string(),
            series: vec![PanelSeries {
                name: format!("{} = {}", labels.ratio_name, labels.ratio_formula),
                points: view
                    .iter()
                    .filter_map(|r| r.ratio.map(|v| (r.date, v)))
                    .collect(),
            }],
        });
    }

    if config.show_index && bases.any_defined() {
        let mut series = Vec::new();
        if bases.a.is_some() {
            series.push(PanelSeries {
                name: format!("{} index (Base {}=100)", labels.a_role, config.base_year),
                points: view
                    .iter()
                    .filter_map(|r| r.a_index.map(|v| (r.date, v)))
                    .collect(),
            });
        }
        if bases.b.is_some() {
            series.push(PanelSeries {
                name: format!("{} index (Base {}=100)", labels.b_role, config.base_year),
                points: view
                    .iter()
                    .filter_map(|r| r.b_index.map(|v| (r.date, v)))
                    .collect(),
            });
        }
        // The ratio index only joins the panel when the ratio panel itself is
        // enabled, mirroring the hosted dashboard's toggle coupling.
        if config.show_ratio && bases.ratio.is_some() {
            series.push(PanelSeries {
                name: format!("{} index (Base {}=100)", labels.ratio_name, config.base_year),
                points: view
                    .iter()
                    .filter_map(|r| r.ratio_index.map(|v| (r.date, v)))
                    .collect(),
            });
        }

        panels.push(Panel {
            title: labels.index_title.to_string(),
            y_label: "index (Base=100)".to_string(),
            series,
        });
    }

    panels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dashboard, DateWindow};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn offline_config(dashboard: Dashboard) -> DashboardConfig {
        let mut config = DashboardConfig::for_dashboard(dashboard);
        config.offline = true;
        config
    }

    fn run(config: &DashboardConfig) -> RunOutput {
        let client = FredGraphClient::with_base_url("http://unused.invalid");
        let mut cache = SeriesCache::new(Duration::from_secs(0));
        run_dashboard(config, &client, &mut cache).unwrap()
    }

    #[test]
    fn gdp_offline_run_produces_levels_and_ratio_panels() {
        let run = run(&offline_config(Dashboard::Gdp));

        assert!(!run.table.is_empty());
        assert_eq!(run.panels.len(), 2);
        assert_eq!(run.panels[0].series.len(), 2);
        // Quarterly GDP calendars line up exactly, so nothing is dropped.
        assert_eq!(run.table.len(), run.series_a.n_obs);
        assert!(run.table.iter().all(|r| r.ratio.is_some()));
    }

    #[test]
    fn real_offline_run_joins_offset_calendars() {
        let run = run(&offline_config(Dashboard::Real));

        // Price and index dates never coincide; nearest-join pairs them all.
        assert_eq!(run.table.len(), run.series_a.n_obs);
        assert!(run.warnings.is_empty());
    }

    #[test]
    fn undefined_base_year_warns_and_suppresses_index_panel() {
        let mut config = offline_config(Dashboard::Gdp);
        config.show_index = true;
        config.base_year = 1899;

        let run = run(&config);

        assert!(run.bases.all_missing());
        assert!(run.warnings.iter().any(|w| w.contains("base year 1899")));
        assert!(!run.panels.iter().any(|p| p.title.contains("Indexed")));
    }

    #[test]
    fn defined_base_year_adds_index_panel() {
        let mut config = offline_config(Dashboard::Gdp);
        config.show_index = true;
        config.base_year = 2012;

        let run = run(&config);

        assert!(run.bases.any_defined());
        let index_panel = run
            .panels
            .iter()
            .find(|p| p.title.contains("Indexed"))
            .unwrap();
        // Nominal, real, and deflator indices are all defined.
        assert_eq!(index_panel.series.len(), 3);
    }

    #[test]
    fn inverted_window_is_an_empty_view_not_an_error() {
        let mut config = offline_config(Dashboard::Gdp);
        config.window = Some(DateWindow {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        });

        let run = run(&config);

        assert!(run.view.is_empty());
        assert!(!run.table.is_empty());
        assert!(run.warnings.iter().any(|w| w.contains("selects no rows")));
    }

    #[test]
    fn empty_series_ids_are_rejected() {
        let mut config = offline_config(Dashboard::Gdp);
        config.series_a = "  ".to_string();

        let client = FredGraphClient::with_base_url("http://unused.invalid");
        let mut cache = SeriesCache::new(Duration::from_secs(0));
        let err = run_dashboard(&config, &client, &mut cache).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
