//! Geographic input validation for map selections.

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Region a map selection must fall in.
pub const SEVILLA_BOUNDS: GeoBounds = GeoBounds {
    min_lat: 37.33,
    max_lat: 37.43,
    min_lon: -6.06,
    max_lon: -5.92,
};

/// Sevilla city centre; where the map opens.
pub const SEVILLA_CENTRE: (f64, f64) = (37.39, -5.99);

impl GeoBounds {
    /// NaN never compares as contained.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    /// Grow the rectangle by `pad` degrees on every side.
    pub fn padded(&self, pad: f64) -> GeoBounds {
        GeoBounds {
            min_lat: self.min_lat - pad,
            max_lat: self.max_lat + pad,
            min_lon: self.min_lon - pad,
            max_lon: self.max_lon + pad,
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Clamp a point onto the rectangle.
    pub fn clamp(&self, lat: f64, lon: f64) -> (f64, f64) {
        (
            lat.clamp(self.min_lat, self.max_lat),
            lon.clamp(self.min_lon, self.max_lon),
        )
    }
}

/// Outcome of validating a map selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoSelection {
    Accepted { lat: f64, lon: f64 },
    /// Both coordinates are cleared; there is no partial acceptance.
    Rejected,
}

impl GeoSelection {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match *self {
            GeoSelection::Accepted { lat, lon } => Some((lat, lon)),
            GeoSelection::Rejected => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, GeoSelection::Accepted { .. })
    }

    /// Success or error indicator shown to the user.
    pub fn message(&self) -> String {
        match *self {
            GeoSelection::Accepted { lat, lon } => {
                format!("Location selected: Latitude {lat:.5}, Longitude {lon:.5}")
            }
            GeoSelection::Rejected => {
                "Selected location is outside Sevilla. Please choose inside the city area.".to_string()
            }
        }
    }
}

/// Accept `(lat, lon)` only when both fall inside `bounds`.
pub fn validate_selection(bounds: &GeoBounds, lat: f64, lon: f64) -> GeoSelection {
    if bounds.contains(lat, lon) {
        GeoSelection::Accepted { lat, lon }
    } else {
        GeoSelection::Rejected
    }
}
