//! Inclusive date-window filter over the derived table.

use crate::domain::{AlignedRow, DateWindow};

/// Rows whose date lies within `[window.start, window.end]`.
///
/// An inverted window (`start > end`) or a window beyond the data selects
/// nothing; the empty result is legal and renders as an empty chart.
pub fn filter_window(rows: &[AlignedRow], window: &DateWindow) -> Vec<AlignedRow> {
    rows.iter().copied().filter(|r| window.contains(r.date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(date: NaiveDate) -> AlignedRow {
        AlignedRow {
            date,
            a: 1.0,
            b: 1.0,
            ratio: Some(100.0),
            a_index: None,
            b_index: None,
            ratio_index: None,
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let rows = vec![row(d(2020, 1, 1)), row(d(2020, 6, 1)), row(d(2020, 12, 31))];
        let w = DateWindow {
            start: d(2020, 1, 1),
            end: d(2020, 12, 31),
        };

        assert_eq!(filter_window(&rows, &w).len(), 3);
    }

    #[test]
    fn inverted_window_is_empty_not_an_error() {
        let rows = vec![row(d(2020, 1, 1)), row(d(2020, 6, 1))];
        let w = DateWindow {
            start: d(2021, 1, 1),
            end: d(2020, 1, 1),
        };

        assert!(filter_window(&rows, &w).is_empty());
    }

    #[test]
    fn disjoint_window_is_empty() {
        let rows = vec![row(d(2020, 1, 1))];
        let w = DateWindow {
            start: d(1990, 1, 1),
            end: d(1991, 1, 1),
        };

        assert!(filter_window(&rows, &w).is_empty());
    }
}
