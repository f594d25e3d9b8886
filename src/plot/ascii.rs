//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed history points: `o`
//! - predicted series: `-` line
//! - confidence band edges: `.` lines

use chrono::NaiveDate;

use crate::domain::{ForecastInput, ForecastSeries};

/// Render a forecast with its history overlay.
pub fn render_forecast_plot(
    input: &ForecastInput,
    series: &ForecastSeries,
    width: usize,
    height: usize,
) -> String {
    render_plot(&input.points, series, width, height)
}

/// Render a saved forecast only (no history overlay).
pub fn render_forecast_plot_from_file(series: &ForecastSeries, width: usize, height: usize) -> String {
    render_plot(&[], series, width, height)
}

fn render_plot(
    history: &[(NaiveDate, f64)],
    series: &ForecastSeries,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((d_min, d_max)) = date_range(history, series) else {
        return "Plot: (no data)\n".to_string();
    };
    let t_max = (d_max - d_min).num_days().max(1) as f64;

    let (y_min, y_max) = value_range(history, series).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw predicted first, then band edges (lines only fill blank cells, so
    // the band never obscures the point estimate), then history points.
    draw_series(
        &mut grid,
        series.points.iter().map(|p| (p.date, p.predicted)),
        d_min,
        t_max,
        y_min,
        y_max,
        '-',
    );
    draw_series(
        &mut grid,
        series.points.iter().map(|p| (p.date, p.lower)),
        d_min,
        t_max,
        y_min,
        y_max,
        '.',
    );
    draw_series(
        &mut grid,
        series.points.iter().map(|p| (p.date, p.upper)),
        d_min,
        t_max,
        y_min,
        y_max,
        '.',
    );

    for &(date, value) in history {
        let x = map_x((date - d_min).num_days() as f64, t_max, width);
        let y = map_y(value, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!("Plot: {d_min}..{d_max} | y=[{y_min:.2}, {y_max:.2}]\n"));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn date_range(
    history: &[(NaiveDate, f64)],
    series: &ForecastSeries,
) -> Option<(NaiveDate, NaiveDate)> {
    let dates = history
        .iter()
        .map(|(d, _)| *d)
        .chain(series.points.iter().map(|p| p.date));
    let min = dates.clone().min()?;
    let max = dates.max()?;
    if max > min { Some((min, max)) } else { None }
}

fn value_range(history: &[(NaiveDate, f64)], series: &ForecastSeries) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, v) in history {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }
    for p in &series.points {
        min_y = min_y.min(p.lower);
        max_y = max_y.max(p.upper);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = (t / t_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series<I>(
    grid: &mut [Vec<char>],
    points: I,
    d_min: NaiveDate,
    t_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) where
    I: Iterator<Item = (NaiveDate, f64)>,
{
    let height = grid.len();
    let width = grid[0].len();

    let mut prev: Option<(usize, usize)> = None;
    for (date, value) in points {
        let x = map_x((date - d_min).num_days() as f64, t_max, width);
        let y = map_y(value, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, ch);
        } else if grid[y][x] == ' ' {
            grid[y][x] = ch;
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, Measure};

    #[test]
    fn plot_golden_snapshot_small() {
        let d0 = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let d1 = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
        let history = vec![(d0, 0.0), (d1, 10.0)];

        // Zero-width band so only the predicted line and points render.
        let series = ForecastSeries {
            location: "A".to_string(),
            measure: Measure::NewCases,
            model: "Trend".to_string(),
            confidence_level: 0.95,
            horizon_days: 0,
            history_len: 2,
            points: vec![
                ForecastPoint { date: d0, predicted: 0.0, lower: 0.0, upper: 0.0 },
                ForecastPoint { date: d1, predicted: 10.0, lower: 10.0, upper: 10.0 },
            ],
        };

        let input = ForecastInput {
            location: "A".to_string(),
            measure: Measure::NewCases,
            points: history,
        };

        let txt = render_forecast_plot(&input, &series, 10, 5);
        let expected = concat!(
            "Plot: 2021-01-01..2021-01-02 | y=[-0.50, 10.50]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_without_data_degrades_gracefully() {
        let series = ForecastSeries {
            location: "A".to_string(),
            measure: Measure::NewCases,
            model: "Flat".to_string(),
            confidence_level: 0.95,
            horizon_days: 0,
            history_len: 0,
            points: Vec::new(),
        };
        let txt = render_forecast_plot_from_file(&series, 20, 8);
        assert_eq!(txt, "Plot: (no data)\n");
    }
}
