//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each panel series gets its own glyph, listed in a legend above the grid.

use chrono::NaiveDate;

use crate::domain::Panel;

const GLYPHS: [char; 4] = ['o', '*', '+', 'x'];
const Y_LABEL_WIDTH: usize = 10;

/// Render one panel as a fixed-size character grid with a legend, y-range
/// labels on the left, and the date range along the bottom.
pub fn render_ascii_panel(panel: &Panel, width: usize, height: usize) -> String {
    let width = width.max(20);
    let height = height.max(5);

    let mut out = String::new();
    out.push_str(&format!("--- {} ({}) ---\n", panel.title, panel.y_label));
    for (i, series) in panel.series.iter().enumerate() {
        let glyph = GLYPHS[i % GLYPHS.len()];
        out.push_str(&format!("  {glyph} = {}\n", series.name));
    }

    let Some((x_range, y_range)) = ranges(panel) else {
        out.push_str("(no data)\n");
        return out;
    };
    let (y_min, y_max) = pad_range(y_range.0, y_range.1, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for (i, series) in panel.series.iter().enumerate() {
        let glyph = GLYPHS[i % GLYPHS.len()];
        for &(date, value) in &series.points {
            let col = scale_x(date, x_range, width);
            let row = scale_y(value, y_min, y_max, height);
            grid[row][col] = glyph;
        }
    }

    for (r, line) in grid.iter().enumerate() {
        let label = if r == 0 {
            format!("{y_max:>width$.2} ", width = Y_LABEL_WIDTH - 1)
        } else if r == height - 1 {
            format!("{y_min:>width$.2} ", width = Y_LABEL_WIDTH - 1)
        } else {
            " ".repeat(Y_LABEL_WIDTH)
        };
        out.push_str(&label);
        out.push_str(&line.iter().collect::<String>());
        out.push('\n');
    }

    let left = x_range.0.to_string();
    let right = x_range.1.to_string();
    let gap = width.saturating_sub(left.len() + right.len());
    out.push_str(&" ".repeat(Y_LABEL_WIDTH));
    out.push_str(&left);
    out.push_str(&" ".repeat(gap));
    out.push_str(&right);
    out.push('\n');

    out
}

fn ranges(panel: &Panel) -> Option<((NaiveDate, NaiveDate), (f64, f64))> {
    let mut x_min: Option<NaiveDate> = None;
    let mut x_max: Option<NaiveDate> = None;
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for series in &panel.series {
        for &(date, value) in &series.points {
            x_min = Some(x_min.map_or(date, |d| d.min(date)));
            x_max = Some(x_max.map_or(date, |d| d.max(date)));
            y_min = y_min.min(value);
            y_max = y_max.max(value);
        }
    }

    let (x_min, x_max) = (x_min?, x_max?);
    if !y_min.is_finite() || !y_max.is_finite() {
        return None;
    }
    Some(((x_min, x_max), (y_min, y_max)))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-12);
    (min - pad, max + pad)
}

fn scale_x(date: NaiveDate, range: (NaiveDate, NaiveDate), width: usize) -> usize {
    let span = (range.1 - range.0).num_days().max(1) as f64;
    let offset = (date - range.0).num_days() as f64;
    let col = (offset / span * (width - 1) as f64).round() as usize;
    col.min(width - 1)
}

fn scale_y(value: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let span = y_max - y_min;
    let u = if span.abs() < 1e-12 {
        0.5
    } else {
        (value - y_min) / span
    };
    // Row 0 is the top of the grid.
    let row = ((1.0 - u) * (height - 1) as f64).round() as isize;
    row.clamp(0, height as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PanelSeries;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn panel(points: Vec<(NaiveDate, f64)>) -> Panel {
        Panel {
            title: "test".to_string(),
            y_label: "y".to_string(),
            series: vec![PanelSeries {
                name: "series".to_string(),
                points,
            }],
        }
    }

    #[test]
    fn empty_panel_renders_placeholder() {
        let text = render_ascii_panel(&panel(vec![]), 40, 10);
        assert!(text.contains("(no data)"));
    }

    #[test]
    fn output_is_deterministic() {
        let p = panel(vec![
            (d(2020, 1, 1), 1.0),
            (d(2020, 6, 1), 2.0),
            (d(2021, 1, 1), 3.0),
        ]);
        assert_eq!(render_ascii_panel(&p, 40, 10), render_ascii_panel(&p, 40, 10));
    }

    #[test]
    fn extremes_land_on_grid_edges() {
        let p = panel(vec![(d(2020, 1, 1), 1.0), (d(2021, 1, 1), 2.0)]);
        let text = render_ascii_panel(&p, 40, 10);

        // Skip the title and legend lines; of the grid rows, exactly the top
        // (max) and bottom (min) rows carry a glyph.
        let glyph_rows = text
            .lines()
            .skip(2)
            .filter(|l| l.contains('o'))
            .count();
        assert_eq!(glyph_rows, 2);
        assert!(text.contains("2020-01-01"));
        assert!(text.contains("2021-01-01"));
    }
}
