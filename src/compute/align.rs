//! Join two series on date.
//!
//! Both inputs are sorted ascending with unique dates (the `SeriesTable`
//! invariant), so the exact join is a two-pointer merge and the nearest join
//! is a binary search per left row. Output ordering follows the left series.

use crate::domain::{JoinMode, JoinedRow, SeriesTable};

/// Pair observations of `a` and `b` by date.
///
/// - `Exact`: inner join on identical dates.
/// - `Nearest`: for each row of `a`, the closest `b` date within
///   `tolerance_days`; ties at equal distance resolve to the earlier `b`
///   date. Rows with no candidate are excluded.
pub fn align(a: &SeriesTable, b: &SeriesTable, mode: JoinMode, tolerance_days: i64) -> Vec<JoinedRow> {
    match mode {
        JoinMode::Exact => align_exact(a, b),
        JoinMode::Nearest => align_nearest(a, b, tolerance_days),
    }
}

fn align_exact(a: &SeriesTable, b: &SeriesTable) -> Vec<JoinedRow> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.obs.len() && j < b.obs.len() {
        let (oa, ob) = (&a.obs[i], &b.obs[j]);
        if oa.date == ob.date {
            out.push(JoinedRow {
                date: oa.date,
                a: oa.value,
                b: ob.value,
            });
            i += 1;
            j += 1;
        } else if oa.date < ob.date {
            i += 1;
        } else {
            j += 1;
        }
    }

    out
}

fn align_nearest(a: &SeriesTable, b: &SeriesTable, tolerance_days: i64) -> Vec<JoinedRow> {
    if b.is_empty() || tolerance_days < 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(a.obs.len());
    for oa in &a.obs {
        // First b-observation with date >= oa.date; its predecessor is the
        // only other nearest candidate.
        let split = b.obs.partition_point(|ob| ob.date < oa.date);

        let after = b.obs.get(split);
        let before = split.checked_sub(1).and_then(|k| b.obs.get(k));

        let best = match (before, after) {
            (Some(p), Some(n)) => {
                let dp = (oa.date - p.date).num_days();
                let dn = (n.date - oa.date).num_days();
                // Earlier date wins the tie.
                if dp <= dn { p } else { n }
            }
            (Some(p), None) => p,
            (None, Some(n)) => n,
            (None, None) => continue,
        };

        if (oa.date - best.date).num_days().abs() <= tolerance_days {
            out.push(JoinedRow {
                date: oa.date,
                a: oa.value,
                b: best.value,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateWindow;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(id: &str, rows: &[(NaiveDate, f64)]) -> SeriesTable {
        SeriesTable::from_raw(id, rows.to_vec())
    }

    #[test]
    fn exact_join_keeps_only_shared_dates() {
        let a = series(
            "A",
            &[(d(2020, 1, 1), 100.0), (d(2020, 4, 1), 110.0), (d(2020, 7, 1), 120.0)],
        );
        let b = series("B", &[(d(2020, 4, 1), 50.0), (d(2020, 7, 1), 55.0), (d(2020, 10, 1), 60.0)]);

        let rows = align(&a, &b, JoinMode::Exact, 0);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, d(2020, 4, 1));
        assert!((rows[0].a - 110.0).abs() < 1e-12);
        assert!((rows[0].b - 50.0).abs() < 1e-12);
        assert_eq!(rows[1].date, d(2020, 7, 1));
    }

    #[test]
    fn nearest_join_respects_tolerance() {
        let a = series("A", &[(d(2020, 1, 1), 1.0), (d(2020, 6, 1), 2.0)]);
        let b = series("B", &[(d(2020, 1, 15), 10.0), (d(2020, 9, 1), 20.0)]);

        let rows = align(&a, &b, JoinMode::Nearest, 31);

        // 2020-01-01 matches 2020-01-15 (14 days); 2020-06-01 has nothing
        // within 31 days and is excluded.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, d(2020, 1, 1));
        assert!((rows[0].b - 10.0).abs() < 1e-12);
    }

    #[test]
    fn nearest_tie_resolves_to_earlier_date() {
        let a = series("A", &[(d(2020, 1, 10), 1.0)]);
        let b = series("B", &[(d(2020, 1, 5), 100.0), (d(2020, 1, 15), 200.0)]);

        let rows = align(&a, &b, JoinMode::Nearest, 31);

        assert_eq!(rows.len(), 1);
        assert!((rows[0].b - 100.0).abs() < 1e-12);
    }

    #[test]
    fn output_is_ascending_by_left_date() {
        let a = series(
            "A",
            &[(d(2020, 1, 1), 1.0), (d(2020, 2, 1), 2.0), (d(2020, 3, 1), 3.0)],
        );
        let b = series(
            "B",
            &[(d(2020, 1, 3), 1.0), (d(2020, 2, 3), 2.0), (d(2020, 3, 3), 3.0)],
        );

        let rows = align(&a, &b, JoinMode::Nearest, 31);
        assert_eq!(rows.len(), 3);
        for pair in rows.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn exact_join_commutes_with_window_filter() {
        let a = series(
            "A",
            &[
                (d(2019, 1, 1), 1.0),
                (d(2020, 1, 1), 2.0),
                (d(2021, 1, 1), 3.0),
                (d(2022, 1, 1), 4.0),
            ],
        );
        let b = series(
            "B",
            &[
                (d(2020, 1, 1), 20.0),
                (d(2021, 1, 1), 30.0),
                (d(2022, 1, 1), 40.0),
                (d(2023, 1, 1), 50.0),
            ],
        );
        let w = DateWindow {
            start: d(2020, 1, 1),
            end: d(2021, 12, 31),
        };

        let join_then_filter: Vec<JoinedRow> = align(&a, &b, JoinMode::Exact, 0)
            .into_iter()
            .filter(|r| w.contains(r.date))
            .collect();
        let filter_then_join = align(&a.restrict(&w), &b.restrict(&w), JoinMode::Exact, 0);

        assert_eq!(join_then_filter, filter_then_join);
    }
}
