//! Ratatui-based terminal dashboard.
//!
//! The TUI provides a settings panel for choosing a country, measure, trend
//! transform, date range and forecast horizon, then renders the filtered
//! series with its trend overlay and forecast bands. Every widget change
//! re-runs the shared pipeline; only the forecast stage is memoized on its
//! inputs so cheap view changes don't trigger a refit.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, RunOutput};
use crate::cli::TuiArgs;
use crate::data::{Loaded, STORE};
use crate::domain::{DashConfig, Measure, TrendKind};
use crate::error::AppError;
use crate::fit::adapter::HorizonBounds;
use crate::fit::forecaster::SeasonalTrendForecaster;

mod plotters_chart;

use plotters_chart::DashChart;

const TREND_ORDER: [TrendKind; 3] = [TrendKind::Raw, TrendKind::Average, TrendKind::Growth];

/// Settings fields, top to bottom.
const FIELD_COUNT: usize = 6;
const FIELD_COUNTRY: usize = 0;
const FIELD_MEASURE: usize = 1;
const FIELD_TREND: usize = 2;
const FIELD_START: usize = 3;
const FIELD_END: usize = 4;
const FIELD_HORIZON: usize = 5;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let loaded = STORE.get(&args.data.to_source())?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::internal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(loaded)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::internal(format!("Failed to enter alternate screen: {e}")));
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
enum DateField {
    Start,
    End,
}

/// Inputs the forecast depends on; the stage is only recomputed when these
/// change, so cheap view interactions never trigger a refit.
#[derive(Clone, PartialEq)]
struct ForecastKey {
    location: String,
    measure: Measure,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    horizon_days: u32,
    confidence_bits: u64,
}

struct PickerState {
    filter: String,
    selected: usize,
}

struct App {
    loaded: std::sync::Arc<Loaded>,
    locations: Vec<String>,
    measures: Vec<Measure>,
    config: DashConfig,
    bounds: HorizonBounds,

    selected_field: usize,
    editing_date: Option<DateField>,
    date_input: String,
    picker: Option<PickerState>,
    status: String,

    run: Option<RunOutput>,
    memo: Option<(ForecastKey, pipeline::ForecastStage)>,
}

impl App {
    fn new(loaded: std::sync::Arc<Loaded>) -> Result<Self, AppError> {
        let locations = loaded.dataset.locations();
        let Some(first) = locations.first().cloned() else {
            return Err(AppError::empty_selection("The dataset contains no locations."));
        };
        let measures = loaded.dataset.schema.measures();

        let mut config = crate::app::default_config();
        config.location = first;
        config.trend = TrendKind::Average;

        let mut app = Self {
            loaded,
            locations,
            measures,
            config,
            bounds: HorizonBounds::default(),
            selected_field: 0,
            editing_date: None,
            date_input: String::new(),
            picker: None,
            status: "Loading...".to_string(),
            run: None,
            memo: None,
        };
        app.regenerate()?;
        app.status = format!("Source: {}", app.loaded.source);
        Ok(app)
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
                    .map_err(|e| AppError::internal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::internal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::internal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
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

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.picker.is_some() {
            return self.handle_picker_key(code);
        }
        if self.editing_date.is_some() {
            return self.handle_date_edit(code);
        }

        match code {
            KeyCode::Char('q') => return Ok(true),
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
            KeyCode::Left => self.adjust_field(-1)?,
            KeyCode::Right => self.adjust_field(1)?,
            KeyCode::Enter => match self.selected_field {
                FIELD_COUNTRY => {
                    self.picker = Some(PickerState {
                        filter: String::new(),
                        selected: 0,
                    });
                    self.status = "Type to filter, Enter to select, Esc to cancel.".to_string();
                }
                FIELD_START => {
                    self.editing_date = Some(DateField::Start);
                    self.date_input.clear();
                    self.status =
                        "Editing start (YYYY-MM-DD, empty resets). Enter applies, Esc cancels."
                            .to_string();
                }
                FIELD_END => {
                    self.editing_date = Some(DateField::End);
                    self.date_input.clear();
                    self.status =
                        "Editing end (YYYY-MM-DD, empty resets). Enter applies, Esc cancels."
                            .to_string();
                }
                _ => {}
            },
            KeyCode::Char('r') => {
                self.memo = None;
                self.regenerate()?;
                self.status = "Recomputed.".to_string();
            }
            KeyCode::Char('d') => {
                match crate::debug::write_debug_bundle(&self.loaded, &self.config, self.run.as_ref())
                {
                    Ok(path) => {
                        self.status = format!("Wrote debug bundle: {}", path.display());
                    }
                    Err(err) => {
                        self.status = format!("Debug write failed: {err}");
                    }
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn handle_picker_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        let Some(picker) = self.picker.as_mut() else {
            return Ok(false);
        };

        match code {
            KeyCode::Esc => {
                self.picker = None;
                self.status = "Country selection canceled.".to_string();
            }
            KeyCode::Up => {
                picker.selected = picker.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                picker.selected = picker.selected.saturating_add(1);
            }
            KeyCode::Backspace => {
                picker.filter.pop();
                picker.selected = 0;
            }
            KeyCode::Char(c) => {
                picker.filter.push(c);
                picker.selected = 0;
            }
            KeyCode::Enter => {
                let matches = filtered_locations(&self.locations, &picker.filter);
                if let Some(choice) = matches.get(picker.selected.min(matches.len().saturating_sub(1)))
                {
                    self.config.location = (*choice).clone();
                    self.picker = None;
                    self.regenerate()?;
                    self.status = format!("country: {}", self.config.location);
                } else {
                    self.status = "No location matches the filter.".to_string();
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_date_edit(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Esc => {
                self.editing_date = None;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let field = self.editing_date.take();
                if let Some(field) = field {
                    self.apply_date_input(field)?;
                }
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn apply_date_input(&mut self, field: DateField) -> Result<(), AppError> {
        let trimmed = self.date_input.trim();
        let parsed = if trimmed.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                Ok(dt) => Some(dt),
                Err(e) => {
                    self.status = format!("Invalid date '{trimmed}': {e}");
                    return Ok(());
                }
            }
        };

        match field {
            DateField::Start => self.config.range_start = parsed,
            DateField::End => self.config.range_end = parsed,
        }
        self.regenerate()?;
        self.status = match parsed {
            Some(d) => format!("range {} -> {d}", field_name(field)),
            None => format!("range {} reset to dataset bound", field_name(field)),
        };
        Ok(())
    }

    fn adjust_field(&mut self, delta: i32) -> Result<(), AppError> {
        match self.selected_field {
            FIELD_COUNTRY => {
                let idx = self
                    .locations
                    .iter()
                    .position(|l| *l == self.config.location)
                    .unwrap_or(0);
                let next = cycle(idx, self.locations.len(), delta);
                self.config.location = self.locations[next].clone();
                self.regenerate()?;
                self.status = format!("country: {}", self.config.location);
            }
            FIELD_MEASURE => {
                let idx = self
                    .measures
                    .iter()
                    .position(|m| *m == self.config.measure)
                    .unwrap_or(0);
                let next = cycle(idx, self.measures.len(), delta);
                self.config.measure = self.measures[next];
                self.regenerate()?;
                self.status = format!("measure: {}", self.config.measure.display_name());
            }
            FIELD_TREND => {
                let idx = TREND_ORDER
                    .iter()
                    .position(|t| *t == self.config.trend)
                    .unwrap_or(0);
                let next = cycle(idx, TREND_ORDER.len(), delta);
                self.config.trend = TREND_ORDER[next];
                self.regenerate()?;
                self.status = format!("trend: {}", self.config.trend.display_name());
            }
            FIELD_START | FIELD_END => {
                self.shift_range_endpoint(delta)?;
            }
            FIELD_HORIZON => {
                let step = 7i64 * delta as i64;
                let shifted = (self.config.horizon_days as i64 + step).max(0) as u32;
                self.config.horizon_days = self.bounds.clamp(shifted);
                self.regenerate()?;
                self.status = format!("horizon: {}d", self.config.horizon_days);
            }
            _ => {}
        }
        Ok(())
    }

    fn shift_range_endpoint(&mut self, delta: i32) -> Result<(), AppError> {
        let Some(span) = self.loaded.dataset.span() else {
            return Ok(());
        };
        let step = chrono::Duration::days(7 * delta as i64);

        if self.selected_field == FIELD_START {
            let current = self.config.range_start.unwrap_or_else(|| span.start());
            let next = (current + step).clamp(span.start(), span.end());
            self.config.range_start = Some(next);
            self.status = format!("range start: {next}");
        } else {
            let current = self.config.range_end.unwrap_or_else(|| span.end());
            let next = (current + step).clamp(span.start(), span.end());
            self.config.range_end = Some(next);
            self.status = format!("range end: {next}");
        }
        self.regenerate()
    }

    fn forecast_key(&self) -> ForecastKey {
        ForecastKey {
            location: self.config.location.clone(),
            measure: self.config.measure,
            start: self.config.range_start,
            end: self.config.range_end,
            horizon_days: self.config.horizon_days,
            confidence_bits: self.config.confidence_level.to_bits(),
        }
    }

    fn regenerate(&mut self) -> Result<(), AppError> {
        let view = pipeline::run_view(&self.loaded.dataset, &self.config)?;

        let key = self.forecast_key();
        let stage = match &self.memo {
            Some((cached_key, stage)) if *cached_key == key => stage.clone(),
            _ => {
                let forecaster = SeasonalTrendForecaster {
                    model_spec: self.config.model_spec,
                    confidence_level: self.config.confidence_level,
                };
                let stage = pipeline::run_forecast_stage(
                    &self.loaded.dataset,
                    &self.config,
                    &forecaster,
                    &self.bounds,
                )?;
                self.memo = Some((key, stage.clone()));
                stage
            }
        };

        self.run = Some(RunOutput {
            view,
            forecast: stage,
        });
        Ok(())
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
            Span::styled("epi", Style::default().fg(Color::Cyan)),
            Span::raw(" — epidemiological trends & forecasting"),
        ]));

        let range_label = self
            .run
            .as_ref()
            .and_then(|r| r.view.range.as_ref())
            .map(|r| r.to_string())
            .unwrap_or_else(|| "(no data)".to_string());

        lines.push(Line::from(Span::styled(
            format!(
                "country: {} | measure: {} | trend: {} | range: {range_label}",
                self.config.location,
                self.config.measure.display_name(),
                self.config.trend.display_name(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let forecast_label = match self.run.as_ref() {
            Some(run) => match (&run.forecast.forecast, &run.forecast.note) {
                (Some(fc), _) => format!(
                    "forecast: {} +{}d ({:.0}% band) | history n={}",
                    fc.model,
                    fc.horizon_days,
                    fc.confidence_level * 100.0,
                    fc.history_len
                ),
                (None, Some(note)) => format!("forecast: {note}"),
                (None, None) => "forecast: -".to_string(),
            },
            None => "forecast: -".to_string(),
        };
        lines.push(Line::from(Span::styled(
            forecast_label,
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(10)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);

        if self.picker.is_some() {
            self.draw_picker(frame, chunks[0]);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!(
            "{} — {}",
            self.config.location,
            self.config.measure.display_name()
        );
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let Some(series) = chart_series(run, self.config.trend) else {
            let msg = Paragraph::new("No data for this selection.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let widget = DashChart {
            history: &series.history,
            trend: &series.trend,
            predicted: &series.predicted,
            lower: &series.lower,
            upper: &series.upper,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_base: series.x_base,
            y_label: self.config.measure.display_name().to_string(),
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let start_label = self
            .config
            .range_start
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(data start)".to_string());
        let end_label = self
            .config
            .range_end
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(data end)".to_string());

        let items = vec![
            ListItem::new(format!("Country: {}", self.config.location)),
            ListItem::new(format!(
                "Measure: {}",
                self.config.measure.display_name()
            )),
            ListItem::new(format!("Trend: {}", self.config.trend.display_name())),
            ListItem::new(format!("Range start: {start_label}")),
            ListItem::new(format!("Range end: {end_label}")),
            ListItem::new(format!(
                "Horizon: {}d (allowed {}..={}d)",
                self.config.horizon_days, self.bounds.min, self.bounds.max
            )),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_date.is_some() {
            let hint = Paragraph::new(format!("Editing date: {}_", self.date_input))
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

    fn draw_picker(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(picker) = &self.picker else { return };

        let popup = centered_rect(area, 60, 70);
        frame.render_widget(Clear, popup);

        let matches = filtered_locations(&self.locations, &picker.filter);
        let items: Vec<ListItem> = matches
            .iter()
            .map(|loc| ListItem::new(loc.as_str()))
            .collect();

        let title = format!("Select country (filter: '{}')", picker.filter);
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        if !matches.is_empty() {
            state.select(Some(picker.selected.min(matches.len() - 1)));
        }
        frame.render_stateful_widget(list, popup, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter pick/edit  r recompute  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart-ready series: day offsets from `x_base` plus precomputed bounds.
struct ChartSeries {
    history: Vec<(f64, f64)>,
    trend: Vec<(f64, f64)>,
    predicted: Vec<(f64, f64)>,
    lower: Vec<(f64, f64)>,
    upper: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_base: NaiveDate,
}

fn chart_series(run: &RunOutput, trend_kind: TrendKind) -> Option<ChartSeries> {
    let view = &run.view;
    let forecast = run.forecast.forecast.as_ref();

    let first_date = view
        .series
        .points
        .first()
        .map(|p| p.date)
        .or_else(|| forecast.and_then(|f| f.points.first().map(|p| p.date)))?;

    let offset = |d: NaiveDate| (d - first_date).num_days() as f64;

    let history: Vec<(f64, f64)> = view
        .series
        .points
        .iter()
        .filter_map(|p| p.value.map(|v| (offset(p.date), v)))
        .collect();

    // The raw view would just re-draw the history line on top of itself.
    let trend: Vec<(f64, f64)> = if trend_kind == TrendKind::Raw {
        Vec::new()
    } else {
        view.trend
            .points
            .iter()
            .filter_map(|p| p.value.map(|v| (offset(p.date), v)))
            .collect()
    };

    let mut predicted = Vec::new();
    let mut lower = Vec::new();
    let mut upper = Vec::new();
    if let Some(fc) = forecast {
        for p in &fc.points {
            let x = offset(p.date);
            predicted.push((x, p.predicted));
            lower.push((x, p.lower));
            upper.push((x, p.upper));
        }
    }

    if history.is_empty() && predicted.is_empty() {
        return None;
    }

    let mut x_max = 1.0_f64;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (x, y) in history
        .iter()
        .chain(trend.iter())
        .chain(predicted.iter())
        .chain(lower.iter())
        .chain(upper.iter())
    {
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    if !(y_min.is_finite() && y_max.is_finite()) {
        return None;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    let pad = (y_max - y_min) * 0.05;

    Some(ChartSeries {
        history,
        trend,
        predicted,
        lower,
        upper,
        x_bounds: [0.0, x_max],
        y_bounds: [y_min - pad, y_max + pad],
        x_base: first_date,
    })
}

fn filtered_locations<'a>(locations: &'a [String], filter: &str) -> Vec<&'a String> {
    let needle = filter.to_lowercase();
    locations
        .iter()
        .filter(|l| l.to_lowercase().contains(&needle))
        .collect()
}

fn cycle(idx: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (((idx as i64 + delta as i64) % len + len) % len) as usize
}

fn field_name(field: DateField) -> &'static str {
    match field {
        DateField::Start => "start",
        DateField::End => "end",
    }
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_both_directions() {
        assert_eq!(cycle(0, 3, 1), 1);
        assert_eq!(cycle(2, 3, 1), 0);
        assert_eq!(cycle(0, 3, -1), 2);
        assert_eq!(cycle(0, 0, 1), 0);
    }

    #[test]
    fn filtered_locations_match_case_insensitively() {
        let locs: Vec<String> = ["Brazil", "France", "South Africa"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(filtered_locations(&locs, "fr").len(), 1);
        assert_eq!(filtered_locations(&locs, "A").len(), 3);
        assert_eq!(filtered_locations(&locs, "zz").len(), 0);
    }
}
