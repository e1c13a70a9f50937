//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing the dashboard, series ids,
//! base year, and date window, then renders the levels/ratio/index line
//! charts for the current configuration.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{RunOutput, run_dashboard};
use crate::data::{FredGraphClient, SeriesCache};
use crate::domain::{DashboardConfig, DateWindow, Panel};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{LineSpec, TimeSeriesChart};

/// Terminal colors assigned to panel series, in order.
const SERIES_COLORS: [(RGBColor, &str); 4] = [
    (RGBColor(0, 255, 255), "cyan"),
    (RGBColor(0, 255, 0), "green"),
    (RGBColor(255, 0, 255), "magenta"),
    (RGBColor(255, 255, 0), "yellow"),
];

const FIELD_COUNT: usize = 8;

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditTarget {
    SeriesA,
    SeriesB,
    WindowStart,
    WindowEnd,
}

struct App {
    config: DashboardConfig,
    client: FredGraphClient,
    cache: SeriesCache,
    run: Option<RunOutput>,
    status: String,
    selected_field: usize,
    editing: Option<EditTarget>,
    input: String,
    // Window bounds kept separately so either side can stay open-ended.
    window_start: Option<NaiveDate>,
    window_end: Option<NaiveDate>,
}

impl App {
    fn new(config: DashboardConfig) -> Self {
        let cache = SeriesCache::new(Duration::from_secs(config.cache_ttl_secs));
        let window_start = config
            .window
            .map(|w| w.start)
            .filter(|&d| d != NaiveDate::MIN);
        let window_end = config.window.map(|w| w.end).filter(|&d| d != NaiveDate::MAX);

        let mut app = Self {
            client: FredGraphClient::new(),
            cache,
            config,
            run: None,
            status: "Fetching series...".to_string(),
            selected_field: 0,
            editing: None,
            input: String::new(),
            window_start,
            window_end,
        };
        app.refresh();
        app
    }

    /// Re-run the pipeline with the current configuration. Errors land in
    /// the status line; the previous run stays on screen.
    fn refresh(&mut self) {
        match run_dashboard(&self.config, &self.client, &mut self.cache) {
            Ok(run) => {
                self.status = match run.warnings.first() {
                    Some(w) => w.clone(),
                    None => format!("{} rows ({} shown)", run.table.len(), run.view.len()),
                };
                self.run = Some(run);
            }
            Err(err) => {
                self.status = format!("Error: {err}");
            }
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => self.begin_edit(),
            KeyCode::Char('r') => {
                let (a, b) = (self.config.series_a.clone(), self.config.series_b.clone());
                self.cache.invalidate(&a);
                self.cache.invalidate(&b);
                self.refresh();
            }
            KeyCode::Char('d') => self.write_dataset(),
            _ => {}
        }

        false
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        let Some(target) = self.editing else { return };

        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = None;
                self.apply_edit(target);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                let ok = match target {
                    EditTarget::SeriesA | EditTarget::SeriesB => c.is_ascii_alphanumeric(),
                    EditTarget::WindowStart | EditTarget::WindowEnd => {
                        c.is_ascii_digit() || c == '-'
                    }
                };
                if ok {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn begin_edit(&mut self) {
        let target = match self.selected_field {
            1 => EditTarget::SeriesA,
            2 => EditTarget::SeriesB,
            4 => EditTarget::WindowStart,
            5 => EditTarget::WindowEnd,
            _ => return,
        };

        self.input = match target {
            EditTarget::SeriesA => self.config.series_a.clone(),
            EditTarget::SeriesB => self.config.series_b.clone(),
            EditTarget::WindowStart => self
                .window_start
                .map(|d| d.to_string())
                .unwrap_or_default(),
            EditTarget::WindowEnd => self.window_end.map(|d| d.to_string()).unwrap_or_default(),
        };
        self.editing = Some(target);
        self.status = match target {
            EditTarget::SeriesA | EditTarget::SeriesB => {
                "Editing series id. Enter to apply, Esc to cancel.".to_string()
            }
            EditTarget::WindowStart | EditTarget::WindowEnd => {
                "Editing date (YYYY-MM-DD, empty clears). Enter to apply, Esc to cancel.".to_string()
            }
        };
    }

    fn apply_edit(&mut self, target: EditTarget) {
        let trimmed = self.input.trim().to_string();

        match target {
            EditTarget::SeriesA | EditTarget::SeriesB => {
                if trimmed.is_empty() {
                    self.status = "Series id must not be empty.".to_string();
                    return;
                }
                if target == EditTarget::SeriesA {
                    self.config.series_a = trimmed;
                } else {
                    self.config.series_b = trimmed;
                }
                self.refresh();
            }
            EditTarget::WindowStart | EditTarget::WindowEnd => {
                let parsed = if trimmed.is_empty() {
                    None
                } else {
                    match NaiveDate::parse_from_str(&trimmed, "%Y-%m-%d") {
                        Ok(d) => Some(d),
                        Err(e) => {
                            self.status = format!("Invalid date '{trimmed}': {e}");
                            return;
                        }
                    }
                };
                if target == EditTarget::WindowStart {
                    self.window_start = parsed;
                } else {
                    self.window_end = parsed;
                }
                self.rebuild_window();
                self.refresh();
            }
        }
    }

    fn rebuild_window(&mut self) {
        self.config.window = match (self.window_start, self.window_end) {
            (None, None) => None,
            (start, end) => Some(DateWindow {
                start: start.unwrap_or(NaiveDate::MIN),
                end: end.unwrap_or(NaiveDate::MAX),
            }),
        };
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                let next = if delta >= 0 {
                    self.config.dashboard.next()
                } else {
                    self.config.dashboard.prev()
                };
                // Switching dashboards resets series ids and join policy to
                // that dashboard's defaults, keeping session-level settings.
                let mut fresh = DashboardConfig::for_dashboard(next);
                fresh.base_year = self.config.base_year;
                fresh.show_ratio = self.config.show_ratio;
                fresh.show_index = self.config.show_index;
                fresh.window = self.config.window;
                fresh.offline = self.config.offline;
                fresh.sample_seed = self.config.sample_seed;
                fresh.cache_ttl_secs = self.config.cache_ttl_secs;
                self.config = fresh;
                self.refresh();
            }
            3 => {
                self.config.base_year += delta;
                self.refresh();
            }
            6 => {
                self.config.show_ratio = !self.config.show_ratio;
                self.refresh();
            }
            7 => {
                self.config.show_index = !self.config.show_index;
                self.refresh();
            }
            _ => {}
        }
    }

    fn write_dataset(&mut self) {
        let Some(run) = &self.run else {
            self.status = "No run available.".to_string();
            return;
        };

        let path = PathBuf::from(format!(
            "mdash-{}-{}.json",
            self.config.series_a.to_ascii_lowercase(),
            self.config.series_b.to_ascii_lowercase(),
        ));
        match crate::io::dataset::write_dataset_json(&path, run) {
            Ok(()) => self.status = format!("Wrote dataset: {}", path.display()),
            Err(err) => self.status = format!("Dataset write failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("mdash", Style::default().fg(Color::Cyan)),
            Span::raw(" — macro series dashboards"),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "dashboard: {} | a: {} | b: {} | join: {:?} | base year: {}",
                self.config.dashboard.display_name(),
                self.config.series_a,
                self.config.series_b,
                self.config.join,
                self.config.base_year,
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(run) = &self.run {
            let mut facts = format!(
                "rows={} shown={} | {} .. {}",
                run.table.len(),
                run.view.len(),
                fmt_date(run.series_a.first),
                fmt_date(run.series_a.last),
            );
            if self.config.show_index {
                facts.push_str(&format!(
                    " | bases: a={} b={} ratio={}",
                    fmt_base(run.bases.a),
                    fmt_base(run.bases.b),
                    fmt_base(run.bases.ratio),
                ));
            }
            lines.push(Line::from(Span::styled(
                facts,
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(10)])
            .split(area);

        self.draw_charts(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        };

        if run.panels.is_empty() {
            let msg = Paragraph::new("No panels enabled.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        }

        let constraints: Vec<Constraint> = run
            .panels
            .iter()
            .map(|_| Constraint::Ratio(1, run.panels.len() as u32))
            .collect();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (panel, rect) in run.panels.iter().zip(chunks.iter()) {
            self.draw_panel(frame, *rect, panel);
        }
    }

    fn draw_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel) {
        let block = Block::default()
            .title(panel_title(panel))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((series_points, x_bounds, y_bounds)) = chart_series(panel) else {
            let msg = Paragraph::new("No rows in window.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let lines: Vec<LineSpec> = series_points
            .iter()
            .enumerate()
            .map(|(i, points)| LineSpec {
                points,
                color: SERIES_COLORS[i % SERIES_COLORS.len()].0,
            })
            .collect();

        let widget = TimeSeriesChart {
            lines: &lines,
            x_bounds,
            y_bounds,
            x_label: "date",
            y_label: panel.y_label.clone(),
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![
            ListItem::new(format!(
                "Dashboard: {}",
                self.config.dashboard.display_name()
            )),
            ListItem::new(format!("Series A: {}", self.config.series_a)),
            ListItem::new(format!("Series B: {}", self.config.series_b)),
            ListItem::new(format!("Base year: {}", self.config.base_year)),
            ListItem::new(format!("Window start: {}", fmt_date(self.window_start))),
            ListItem::new(format!("Window end: {}", fmt_date(self.window_end))),
            ListItem::new(format!("Ratio panel: {}", on_off(self.config.show_ratio))),
            ListItem::new(format!("Index panel: {}", on_off(self.config.show_index))),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing.is_some() {
            let hint = Paragraph::new(format!("> {}", self.input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit  r refresh  d dataset  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Block title: panel name plus the color legend for its series.
fn panel_title(panel: &Panel) -> String {
    let mut title = panel.title.clone();
    if !panel.series.is_empty() {
        let legend: Vec<String> = panel
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!("{} [{}]", s.name, SERIES_COLORS[i % SERIES_COLORS.len()].1)
            })
            .collect();
        title.push_str(" — ");
        title.push_str(&legend.join("  "));
    }
    title
}

/// Build Plotters-ready series and bounds for one panel.
///
/// Dates map to day numbers on the x axis. Returns `None` when the panel has
/// no points at all (empty window).
fn chart_series(panel: &Panel) -> Option<(Vec<Vec<(f64, f64)>>, [f64; 2], [f64; 2])> {
    let mut series_points = Vec::with_capacity(panel.series.len());
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for series in &panel.series {
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|&(date, value)| (date_to_x(date), value))
            .collect();
        for &(x, y) in &points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        series_points.push(points);
    }

    if !x_min.is_finite() || !x_max.is_finite() || !y_min.is_finite() || !y_max.is_finite() {
        return None;
    }

    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    Some((series_points, [x_min, x_max], y_bounds))
}

fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn fmt_axis_x(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

fn fmt_axis_y(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn fmt_base(base: Option<f64>) -> String {
    match base {
        Some(v) => format!("{v:.1}"),
        None => "undefined".to_string(),
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}
