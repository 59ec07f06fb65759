//! Plotters-powered Sevilla map widget for Ratatui.
//!
//! Draws the reference listings, the accepted area outline, the cursor and
//! the current selection. Rendering goes through `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::geo::GeoBounds;

/// Render-only map description. Everything is computed before `render()`.
pub struct SevillaMap<'a> {
    /// Visible area; cells map linearly onto it.
    pub view: GeoBounds,
    /// Area a selection must fall in, drawn as an outline.
    pub bounds: GeoBounds,
    /// `(lat, lon)` of every reference listing.
    pub listings: &'a [(f64, f64)],
    pub cursor: (f64, f64),
    /// Last selection and whether it was accepted.
    pub selected: Option<((f64, f64), bool)>,
}

impl<'a> Widget for SevillaMap<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < 5 {
            buf.set_string(
                area.x,
                area.y,
                "Map too small.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let view = self.view;
        if view.lat_span() <= 0.0 || view.lon_span() <= 0.0 {
            return;
        }

        // x is longitude, y is latitude. No margin or label areas, so the
        // drawing lines up with `map::cell_to_coords`.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(0)
                .build_cartesian_2d(view.min_lon..view.max_lon, view.min_lat..view.max_lat)?;

            let listing_color = RGBColor(128, 128, 128);
            let outline_color = RGBColor(0, 255, 255); // cyan
            let cursor_color = WHITE;
            let accepted_color = RGBColor(0, 255, 0); // green
            let rejected_color = RGBColor(255, 0, 0); // red

            chart.draw_series(
                self.listings
                    .iter()
                    .map(|&(lat, lon)| Pixel::new((lon, lat), listing_color)),
            )?;

            let b = self.bounds;
            chart.draw_series(LineSeries::new(
                [
                    (b.min_lon, b.min_lat),
                    (b.max_lon, b.min_lat),
                    (b.max_lon, b.max_lat),
                    (b.min_lon, b.max_lat),
                    (b.min_lon, b.min_lat),
                ],
                &outline_color,
            ))?;

            // Pixels rather than Circle markers: the backend scales circle
            // radii wrongly.
            let (clat, clon) = self.cursor;
            chart.draw_series(std::iter::once(Pixel::new((clon, clat), cursor_color)))?;

            if let Some(((lat, lon), accepted)) = self.selected {
                let color = if accepted { accepted_color } else { rejected_color };
                chart.draw_series(std::iter::once(Pixel::new((lon, lat), color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
