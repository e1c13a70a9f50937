//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during a dashboard run
//! - exported to CSV/JSON
//! - reloaded later for re-plotting without network access

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single `(date, value)` observation from one series.
///
/// Missing or unparseable source values never reach this type; they are
/// dropped during fetch normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// One fetched series: id plus observations sorted ascending by date.
///
/// Invariant: dates are unique and strictly ascending (enforced by
/// [`SeriesTable::from_raw`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesTable {
    pub id: String,
    pub obs: Vec<Observation>,
}

impl SeriesTable {
    /// Build a normalized table from raw `(date, value)` rows.
    ///
    /// Rows are sorted ascending; duplicate dates collapse to the last value
    /// seen in input order.
    pub fn from_raw(id: impl Into<String>, rows: Vec<(NaiveDate, f64)>) -> Self {
        let mut rows = rows;
        rows.sort_by_key(|(d, _)| *d);

        let mut obs: Vec<Observation> = Vec::with_capacity(rows.len());
        for (date, value) in rows {
            match obs.last_mut() {
                Some(last) if last.date == date => last.value = value,
                _ => obs.push(Observation { date, value }),
            }
        }

        Self { id: id.into(), obs }
    }

    pub fn len(&self) -> usize {
        self.obs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obs.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.obs.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.obs.last().map(|o| o.date)
    }

    /// The sub-series whose dates fall inside `window` (inclusive).
    pub fn restrict(&self, window: &DateWindow) -> SeriesTable {
        SeriesTable {
            id: self.id.clone(),
            obs: self
                .obs
                .iter()
                .copied()
                .filter(|o| window.contains(o.date))
                .collect(),
        }
    }

    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            id: self.id.clone(),
            n_obs: self.obs.len(),
            first: self.first_date(),
            last: self.last_date(),
        }
    }
}

/// Summary facts about one fetched series (for reports and TUI headers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub id: String,
    pub n_obs: usize,
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
}

/// How the two input series are joined on date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// Inner join on identical dates.
    Exact,
    /// For each left row, the closest right date within a tolerance window.
    Nearest,
}

/// Inclusive date window chosen by the user.
///
/// `start > end` is legal and selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A date-matched pair of observations, before any derived arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedRow {
    pub date: NaiveDate,
    pub a: f64,
    pub b: f64,
}

/// One row of the derived table.
///
/// `a` and `b` are always present (the join excludes unmatched rows).
/// `None` in a derived column marks a value that could not be computed for
/// this row — a zero denominator, or an undefined base year. Missingness is
/// data, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub a: f64,
    pub b: f64,
    pub ratio: Option<f64>,
    pub a_index: Option<f64>,
    pub b_index: Option<f64>,
    pub ratio_index: Option<f64>,
}

/// Base values resolved for the chosen base year, one per indexed column.
///
/// `None` means the whole index column is undefined (no base-year rows, or a
/// zero/non-finite base value) and the presenter must suppress that series.
/// The three columns are guarded independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexBases {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub ratio: Option<f64>,
}

impl IndexBases {
    pub fn any_defined(&self) -> bool {
        self.a.is_some() || self.b.is_some() || self.ratio.is_some()
    }

    pub fn all_missing(&self) -> bool {
        !self.any_defined()
    }
}

/// Output of the derive stage: derived rows plus the resolved index bases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedTable {
    pub rows: Vec<AlignedRow>,
    pub bases: IndexBases,
}

/// Which dashboard is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dashboard {
    /// Nominal vs real GDP with the implicit deflator.
    Gdp,
    /// Commodity price deflated by a price index.
    Real,
}

impl Dashboard {
    pub fn display_name(self) -> &'static str {
        match self {
            Dashboard::Gdp => "GDP",
            Dashboard::Real => "real price",
        }
    }

    /// Default FRED series ids `(numerator, denominator)`.
    pub fn default_series(self) -> (&'static str, &'static str) {
        match self {
            Dashboard::Gdp => ("GDP", "GDPC1"),
            Dashboard::Real => ("WTISPLC", "CPIAUCSL"),
        }
    }

    /// GDP series share FRED's quarterly calendar, so exact matching holds.
    /// Commodity and CPI prints land on different days of the month, so the
    /// real-price dashboard joins by nearest date.
    pub fn default_join(self) -> JoinMode {
        match self {
            Dashboard::Gdp => JoinMode::Exact,
            Dashboard::Real => JoinMode::Nearest,
        }
    }

    pub fn labels(self) -> DashboardLabels {
        match self {
            Dashboard::Gdp => DashboardLabels {
                a_role: "Nominal GDP",
                b_role: "Real GDP",
                ratio_name: "Implicit deflator",
                ratio_formula: "(Nominal / Real) x 100",
                levels_title: "GDP levels",
                ratio_title: "Inflation component (GDP deflator)",
                index_title: "Indexed view (Base=100)",
                y_label_levels: "level",
                y_label_ratio: "deflator",
            },
            Dashboard::Real => DashboardLabels {
                a_role: "Commodity price",
                b_role: "Price index",
                ratio_name: "Real price",
                ratio_formula: "(Price / Index) x 100",
                levels_title: "Price vs price index",
                ratio_title: "Inflation-adjusted price",
                index_title: "Indexed view (Base=100)",
                y_label_levels: "level",
                y_label_ratio: "real price",
            },
        }
    }

    pub fn next(self) -> Dashboard {
        match self {
            Dashboard::Gdp => Dashboard::Real,
            Dashboard::Real => Dashboard::Gdp,
        }
    }

    pub fn prev(self) -> Dashboard {
        // Two variants, so prev == next.
        self.next()
    }
}

/// Human labels for a dashboard's chart panels and derived columns.
#[derive(Debug, Clone, Copy)]
pub struct DashboardLabels {
    pub a_role: &'static str,
    pub b_role: &'static str,
    pub ratio_name: &'static str,
    pub ratio_formula: &'static str,
    pub levels_title: &'static str,
    pub ratio_title: &'static str,
    pub index_title: &'static str,
    pub y_label_levels: &'static str,
    pub y_label_ratio: &'static str,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus per-dashboard defaults) or edited
/// interactively in the TUI. The pipeline takes it as an explicit argument so
/// runs are reproducible and testable without a UI harness.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub dashboard: Dashboard,
    /// Numerator series id (nominal GDP / commodity price).
    pub series_a: String,
    /// Denominator series id (real GDP / price index).
    pub series_b: String,
    pub join: JoinMode,
    /// Maximum date distance (days) accepted by `JoinMode::Nearest`.
    pub tolerance_days: i64,
    pub base_year: i32,
    pub show_ratio: bool,
    pub show_index: bool,
    /// `None` means the full joined range.
    pub window: Option<DateWindow>,
    /// Use the deterministic sample generator instead of the network.
    pub offline: bool,
    pub sample_seed: u64,
    pub cache_ttl_secs: u64,
}

impl DashboardConfig {
    /// Defaults matching the hosted dashboards.
    pub fn for_dashboard(dashboard: Dashboard) -> Self {
        let (a, b) = dashboard.default_series();
        Self {
            dashboard,
            series_a: a.to_string(),
            series_b: b.to_string(),
            join: dashboard.default_join(),
            tolerance_days: 31,
            base_year: 2012,
            show_ratio: true,
            show_index: false,
            window: None,
            offline: false,
            sample_seed: 42,
            cache_ttl_secs: 900,
        }
    }
}

/// A renderable line-chart description, independent of any backend.
///
/// The pipeline emits these; the report/ASCII/TUI presenters only draw them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub y_label: String,
    pub series: Vec<PanelSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn from_raw_sorts_and_dedupes() {
        let table = SeriesTable::from_raw(
            "X",
            vec![(d(2021, 1, 1), 2.0), (d(2020, 1, 1), 1.0), (d(2021, 1, 1), 3.0)],
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.obs[0].date, d(2020, 1, 1));
        assert_eq!(table.obs[1].date, d(2021, 1, 1));
        // Last value wins on duplicate dates.
        assert_eq!(table.obs[1].value, 3.0);
    }

    #[test]
    fn inverted_window_contains_nothing() {
        let w = DateWindow {
            start: d(2021, 1, 1),
            end: d(2020, 1, 1),
        };
        assert!(!w.contains(d(2020, 6, 1)));
        assert!(!w.contains(d(2021, 1, 1)));
    }

    #[test]
    fn restrict_is_inclusive() {
        let table = SeriesTable::from_raw(
            "X",
            vec![
                (d(2020, 1, 1), 1.0),
                (d(2020, 6, 1), 2.0),
                (d(2021, 1, 1), 3.0),
            ],
        );
        let w = DateWindow {
            start: d(2020, 1, 1),
            end: d(2020, 6, 1),
        };
        let sub = table.restrict(&w);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.last_date(), Some(d(2020, 6, 1)));
    }
}
