//! Derived columns: ratio and base-year indices.
//!
//! All arithmetic here propagates missingness as `Option<f64>` instead of
//! raising: a zero denominator blanks that row's ratio, an undefined base
//! year blanks an entire index column. Callers read `IndexBases` to learn
//! which index columns are defined.

use chrono::Datelike;

use crate::domain::{AlignedRow, DerivedTable, IndexBases, JoinedRow};

/// Augment joined rows with `ratio = (a / b) × 100` and per-column
/// `Base=100` indices anchored to the mean over `base_year`.
pub fn derive(rows: &[JoinedRow], base_year: i32) -> DerivedTable {
    let ratios: Vec<Option<f64>> = rows.iter().map(|r| ratio(r.a, r.b)).collect();

    let bases = IndexBases {
        a: base_value(rows.iter().map(|r| (r.date.year(), Some(r.a))), base_year),
        b: base_value(rows.iter().map(|r| (r.date.year(), Some(r.b))), base_year),
        ratio: base_value(
            rows.iter().zip(&ratios).map(|(r, v)| (r.date.year(), *v)),
            base_year,
        ),
    };

    let out = rows
        .iter()
        .zip(&ratios)
        .map(|(r, ratio)| AlignedRow {
            date: r.date,
            a: r.a,
            b: r.b,
            ratio: *ratio,
            a_index: index(Some(r.a), bases.a),
            b_index: index(Some(r.b), bases.b),
            ratio_index: index(*ratio, bases.ratio),
        })
        .collect();

    DerivedTable { rows: out, bases }
}

/// `(a / b) × 100`, or `None` when the denominator is zero or the quotient is
/// not finite.
fn ratio(a: f64, b: f64) -> Option<f64> {
    if b == 0.0 {
        return None;
    }
    let r = (a / b) * 100.0;
    if r.is_finite() { Some(r) } else { None }
}

/// Mean of the present values whose year equals `base_year`.
///
/// `None` when the base year has no rows, no present values, or the mean is
/// zero/non-finite — in which case the whole index column is undefined.
fn base_value<I>(values: I, base_year: i32) -> Option<f64>
where
    I: Iterator<Item = (i32, Option<f64>)>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for (year, value) in values {
        if year != base_year {
            continue;
        }
        if let Some(v) = value {
            sum += v;
            n += 1;
        }
    }

    if n == 0 {
        return None;
    }
    let mean = sum / n as f64;
    if !mean.is_finite() || mean == 0.0 {
        return None;
    }
    Some(mean)
}

fn index(value: Option<f64>, base: Option<f64>) -> Option<f64> {
    let (v, b) = (value?, base?);
    let idx = (v / b) * 100.0;
    if idx.is_finite() { Some(idx) } else { None }
}
