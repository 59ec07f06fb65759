//! Map panel state: view box, cursor and the last geo selection.
//!
//! Screen cells map linearly onto the view box; row 0 is the north edge.

use ratatui::layout::Rect;

use crate::geo::{GeoBounds, GeoSelection, SEVILLA_BOUNDS, SEVILLA_CENTRE, validate_selection};

/// Degrees the view extends past the accepted box on each side.
pub const VIEW_PADDING: f64 = 0.03;

const CURSOR_STEP_CELLS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct MapState {
    bounds: GeoBounds,
    view: GeoBounds,
    cursor: (f64, f64),
    selection: Option<GeoSelection>,
    area: Rect,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(SEVILLA_BOUNDS)
    }
}

impl MapState {
    pub fn new(bounds: GeoBounds) -> Self {
        Self {
            bounds,
            view: bounds.padded(VIEW_PADDING),
            cursor: SEVILLA_CENTRE,
            selection: None,
            area: Rect::default(),
        }
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn view(&self) -> &GeoBounds {
        &self.view
    }

    /// `(lat, lon)` of the cursor.
    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn selection(&self) -> Option<&GeoSelection> {
        self.selection.as_ref()
    }

    /// Remember where the map was last drawn so clicks can be translated.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Move the cursor by whole cells, staying inside the view.
    pub fn move_cursor(&mut self, d_rows: i32, d_cols: i32) {
        let (lat_per_row, lon_per_col) = self.cell_size();
        let lat = self.cursor.0 - f64::from(d_rows) * CURSOR_STEP_CELLS * lat_per_row;
        let lon = self.cursor.1 + f64::from(d_cols) * CURSOR_STEP_CELLS * lon_per_col;
        self.cursor = self.view.clamp(lat, lon);
    }

    /// Validate a point and keep the outcome as the current selection.
    pub fn select(&mut self, lat: f64, lon: f64) -> &GeoSelection {
        let selection = validate_selection(&self.bounds, lat, lon);
        match selection {
            GeoSelection::Accepted { lat, lon } => {
                log::debug!("map selection accepted at {lat:.5}, {lon:.5}");
            }
            GeoSelection::Rejected => {
                log::debug!("map selection rejected at {lat:.5}, {lon:.5}");
            }
        }
        self.selection.insert(selection)
    }

    pub fn select_at_cursor(&mut self) -> &GeoSelection {
        let (lat, lon) = self.cursor;
        self.select(lat, lon)
    }

    /// Select the point under a mouse click, if it fell on the map.
    ///
    /// The cursor follows the click.
    pub fn click(&mut self, column: u16, row: u16) -> Option<&GeoSelection> {
        let (lat, lon) = cell_to_coords(&self.view, self.area, column, row)?;
        self.cursor = (lat, lon);
        Some(self.select(lat, lon))
    }

    fn cell_size(&self) -> (f64, f64) {
        let rows = f64::from(self.area.height.max(1));
        let cols = f64::from(self.area.width.max(1));
        (self.view.lat_span() / rows, self.view.lon_span() / cols)
    }
}

/// Centre of the screen cell `(column, row)` in map coordinates.
///
/// `None` when the cell is outside `area`.
pub fn cell_to_coords(view: &GeoBounds, area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    if column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }
    let u = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
    let v = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
    let lon = view.min_lon + u * view.lon_span();
    let lat = view.max_lat - v * view.lat_span();
    Some((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn() -> MapState {
        let mut map = MapState::default();
        map.set_area(Rect::new(10, 5, 40, 20));
        map
    }

    #[test]
    fn cells_map_north_up() {
        let map = drawn();
        let (top_lat, left_lon) = cell_to_coords(map.view(), map.area(), 10, 5).unwrap();
        let (bottom_lat, right_lon) = cell_to_coords(map.view(), map.area(), 49, 24).unwrap();
        assert!(top_lat > bottom_lat);
        assert!(left_lon < right_lon);
        assert!(map.view().contains(top_lat, left_lon));
        assert!(map.view().contains(bottom_lat, right_lon));
    }

    #[test]
    fn cells_outside_the_panel_are_ignored() {
        let map = drawn();
        assert!(cell_to_coords(map.view(), map.area(), 9, 10).is_none());
        assert!(cell_to_coords(map.view(), map.area(), 20, 25).is_none());
        assert!(cell_to_coords(map.view(), Rect::default(), 0, 0).is_none());
    }

    #[test]
    fn centre_selection_is_accepted() {
        let mut map = drawn();
        let sel = *map.select_at_cursor();
        assert_eq!(sel.coordinates(), Some(SEVILLA_CENTRE));
        assert_eq!(map.selection(), Some(&sel));
    }

    #[test]
    fn point_north_of_the_city_is_rejected_and_clears_coordinates() {
        let mut map = drawn();
        map.select(37.39, -5.99);
        let sel = map.select(37.50, -5.99);
        assert_eq!(*sel, GeoSelection::Rejected);
        assert_eq!(sel.coordinates(), None);
    }

    #[test]
    fn clicking_the_padded_edge_is_rejected() {
        let mut map = drawn();
        // Top-left cell lies in the padding strip, outside the accepted box.
        let sel = map.click(10, 5).copied().unwrap();
        assert!(!sel.is_accepted());
        // Middle of the panel is inside.
        let sel = map.click(30, 15).copied().unwrap();
        assert!(sel.is_accepted());
        assert!(map.click(0, 0).is_none());
    }

    #[test]
    fn cursor_moves_by_cells_and_stays_in_view() {
        let mut map = drawn();
        let (lat0, lon0) = map.cursor();
        map.move_cursor(-1, 1);
        let (lat1, lon1) = map.cursor();
        assert!(lat1 > lat0);
        assert!(lon1 > lon0);
        for _ in 0..500 {
            map.move_cursor(1, -1);
        }
        let (lat, lon) = map.cursor();
        assert!(map.view().contains(lat, lon));
        assert_eq!(lat, map.view().min_lat);
        assert_eq!(lon, map.view().min_lon);
    }
}
