//! Deterministic offline sample series.
//!
//! `--offline` substitutes these for network fetches so the dashboards can be
//! demoed and tested without reaching FRED. The pipeline after the fetch
//! stage is identical.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use crate::domain::{Dashboard, SeriesTable};

/// Generate a `(numerator, denominator)` pair shaped like the dashboard's
/// real inputs: quarterly GDP-like levels, or a monthly commodity price plus
/// a monthly price index stamped mid-month (so nearest-join has work to do).
///
/// Output is fully determined by `(dashboard, ids, seed)`.
pub fn generate_pair(
    dashboard: Dashboard,
    series_a: &str,
    series_b: &str,
    seed: u64,
) -> (SeriesTable, SeriesTable) {
    let mut rng = StdRng::seed_from_u64(mix_seed(dashboard, series_a, series_b, seed));

    match dashboard {
        Dashboard::Gdp => {
            let dates = quarterly_dates(1990, 2024);
            // Nominal grows faster than real; the gap is the deflator.
            let nominal = growth_series(&mut rng, &dates, 5_000.0, 0.012, 0.005);
            let real = growth_series(&mut rng, &dates, 9_000.0, 0.0055, 0.004);
            (
                SeriesTable::from_raw(series_a, dates.iter().copied().zip(nominal).collect()),
                SeriesTable::from_raw(series_b, dates.iter().copied().zip(real).collect()),
            )
        }
        Dashboard::Real => {
            let price_dates = monthly_dates(1990, 2024, 1);
            let index_dates = monthly_dates(1990, 2024, 15);
            // Commodity prices are noisy; the price index is a smooth climb.
            let price = growth_series(&mut rng, &price_dates, 20.0, 0.003, 0.06);
            let index = growth_series(&mut rng, &index_dates, 130.0, 0.0021, 0.001);
            (
                SeriesTable::from_raw(series_a, price_dates.iter().copied().zip(price).collect()),
                SeriesTable::from_raw(series_b, index_dates.iter().copied().zip(index).collect()),
            )
        }
    }
}

fn mix_seed(dashboard: Dashboard, series_a: &str, series_b: &str, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    dashboard.display_name().hash(&mut hasher);
    series_a.hash(&mut hasher);
    series_b.hash(&mut hasher);
    seed.hash(&mut hasher);
    hasher.finish()
}

fn quarterly_dates(from_year: i32, to_year: i32) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    for year in from_year..=to_year {
        for month in [1, 4, 7, 10] {
            if let Some(d) = NaiveDate::from_ymd_opt(year, month, 1) {
                out.push(d);
            }
        }
    }
    out
}

fn monthly_dates(from_year: i32, to_year: i32, day: u32) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    for year in from_year..=to_year {
        for month in 1..=12 {
            if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
                out.push(d);
            }
        }
    }
    out
}

/// Multiplicative growth path: `level *= exp(drift + sigma * z)` per step,
/// floored away from zero so derived ratios stay well-defined.
fn growth_series(rng: &mut StdRng, dates: &[NaiveDate], start: f64, drift: f64, sigma: f64) -> Vec<f64> {
    let mut level = start;
    let mut out = Vec::with_capacity(dates.len());
    for _ in dates {
        out.push(level);
        let z: f64 = rng.sample(StandardNormal);
        level = (level * (drift + sigma * z).exp()).max(1e-6);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_series() {
        let (a1, b1) = generate_pair(Dashboard::Gdp, "GDP", "GDPC1", 7);
        let (a2, b2) = generate_pair(Dashboard::Gdp, "GDP", "GDPC1", 7);

        assert_eq!(a1.obs, a2.obs);
        assert_eq!(b1.obs, b2.obs);
    }

    #[test]
    fn different_seed_different_values() {
        let (a1, _) = generate_pair(Dashboard::Gdp, "GDP", "GDPC1", 1);
        let (a2, _) = generate_pair(Dashboard::Gdp, "GDP", "GDPC1", 2);

        assert_ne!(a1.obs, a2.obs);
    }

    #[test]
    fn gdp_pair_shares_the_quarterly_calendar() {
        let (a, b) = generate_pair(Dashboard::Gdp, "GDP", "GDPC1", 42);

        assert_eq!(a.len(), b.len());
        for (x, y) in a.obs.iter().zip(b.obs.iter()) {
            assert_eq!(x.date, y.date);
            assert!(x.value > 0.0 && y.value > 0.0);
        }
    }

    #[test]
    fn real_pair_is_offset_within_a_month() {
        let (price, index) = generate_pair(Dashboard::Real, "WTISPLC", "CPIAUCSL", 42);

        // Same number of months, but no shared dates: exact join would be
        // empty, nearest join pairs them all.
        assert_eq!(price.len(), index.len());
        let gap = (index.obs[0].date - price.obs[0].date).num_days();
        assert_eq!(gap, 14);
    }
}
