//! Plotters-powered dashboard chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. X values are day offsets from `x_base`, which the
/// widget turns back into dates for tick labels.
pub struct DashChart<'a> {
    /// Observed history points.
    pub history: &'a [(f64, f64)],
    /// Trend-transformed series (empty when the raw view is selected).
    pub trend: &'a [(f64, f64)],
    /// Forecast point estimates (fitted region + horizon).
    pub predicted: &'a [(f64, f64)],
    /// Confidence band edges.
    pub lower: &'a [(f64, f64)],
    pub upper: &'a [(f64, f64)],
    /// X bounds (day offsets from `x_base`).
    pub x_bounds: [f64; 2],
    /// Y bounds (measure units).
    pub y_bounds: [f64; 2],
    /// Date at day offset zero.
    pub x_base: NaiveDate,
    pub y_label: String,
}

impl<'a> Widget for DashChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let x_base = self.x_base;

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(&self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_axis_date(x_base, *v))
                .y_label_formatter(&|v| fmt_axis_value(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Series styling: keep the palette high-contrast for terminal readability.
            let history_color = WHITE;
            let trend_color = RGBColor(255, 255, 0); // yellow
            let predicted_color = RGBColor(0, 255, 255); // cyan
            let band_color = RGBColor(0, 128, 128); // dim teal

            // 1) Confidence band edges first, so lines can overlay.
            chart.draw_series(LineSeries::new(self.lower.iter().copied(), &band_color))?;
            chart.draw_series(LineSeries::new(self.upper.iter().copied(), &band_color))?;

            // 2) Forecast point estimates.
            chart.draw_series(LineSeries::new(
                self.predicted.iter().copied(),
                &predicted_color,
            ))?;

            // 3) Trend overlay.
            chart.draw_series(LineSeries::new(self.trend.iter().copied(), &trend_color))?;

            // 4) Observed points.
            //
            // We intentionally avoid `Circle` markers here. The underlying
            // `plotters-ratatui-backend` currently maps circle radii incorrectly
            // (pixel radius -> normalized canvas units), producing huge circles.
            // A `Pixel` gives a clean dot that reliably overrides line cells.
            chart.draw_series(
                self.history
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), history_color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn fmt_axis_date(base: NaiveDate, offset: f64) -> String {
    let date = base + Duration::days(offset.round() as i64);
    date.format("%m-%d").to_string()
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v.abs() >= 1_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}
