//! Plotters-powered series chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer line rasterization at terminal resolution
//! - easy to extend later (multiple series, annotations, PNG/SVG export)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`.

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
/// The widget is intentionally data-driven: segments and bounds are computed
/// outside the render call (`crate::view::chart`). This keeps `render()`
/// focused on drawing and makes the gap handling testable without a terminal.
pub struct SeriesChart<'a> {
    /// Gap-free line segments of the selected series. Each segment is drawn
    /// as its own polyline; nothing is drawn between segments, so missing
    /// observations show as gaps rather than interpolated values.
    pub segments: &'a [Vec<(f64, f64)>],
    /// Every present observation. Drawn as dots so an isolated observation
    /// (a one-point segment) is still visible.
    pub points: &'a [(f64, f64)],
    /// X bounds (days since CE, see `view::chart::date_to_x`).
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl Widget for SeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 6 {
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

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Tick labels are drawn by the caller around the chart area (cell
            // coordinates are more reliable than font rendering here), so the
            // mesh stays disabled to reduce visual clutter.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(0)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan

            for segment in self.segments {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &line_color))?;
            }

            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), line_color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
