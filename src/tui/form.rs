//! Form state for the interactive screen.
//!
//! Pure state + input handling, no drawing, so the editing rules can be
//! tested without a terminal.

use crate::domain::{
    AVAILABILITY_365_RANGE, HOST_LISTINGS_MIN, ListingQuery, MINIMUM_NIGHTS_RANGE,
};
use crate::io::Catalogue;

const REVIEWS_PER_MONTH_STEP: f64 = 0.1;
const COORD_STEP: f64 = 0.001;

/// Form rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Neighbourhood,
    RoomType,
    MinimumNights,
    Availability365,
    Latitude,
    Longitude,
    NumberOfReviews,
    ReviewsPerMonth,
    NumberOfReviewsLtm,
    HostListings,
    Predict,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Neighbourhood,
        Field::RoomType,
        Field::MinimumNights,
        Field::Availability365,
        Field::Latitude,
        Field::Longitude,
        Field::NumberOfReviews,
        Field::ReviewsPerMonth,
        Field::NumberOfReviewsLtm,
        Field::HostListings,
        Field::Predict,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Neighbourhood => "Neighbourhood",
            Field::RoomType => "Room type",
            Field::MinimumNights => "Minimum nights",
            Field::Availability365 => "Available days / year",
            Field::Latitude => "Latitude",
            Field::Longitude => "Longitude",
            Field::NumberOfReviews => "Total reviews",
            Field::ReviewsPerMonth => "Reviews / month",
            Field::NumberOfReviewsLtm => "Reviews, last 12 months",
            Field::HostListings => "Host listings",
            Field::Predict => "[ Predict Price Category ]",
        }
    }

    /// Fields whose value can be typed in.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Field::Neighbourhood | Field::RoomType | Field::Predict)
    }
}

/// Current values of every input plus selection/edit state.
#[derive(Debug, Clone)]
pub struct FormState {
    neighbourhoods: Vec<String>,
    room_types: Vec<String>,
    neighbourhood_idx: usize,
    room_type_idx: usize,
    minimum_nights: u32,
    availability_365: u32,
    number_of_reviews: u32,
    reviews_per_month: f64,
    number_of_reviews_ltm: u32,
    host_listings: u32,
    latitude: f64,
    longitude: f64,
    selected: usize,
    editing: Option<String>,
}

impl FormState {
    /// Build a form over the catalogue, pre-filled from `defaults`.
    ///
    /// Enum selectors start on the entry matching `defaults` (or the first).
    pub fn new(catalogue: &Catalogue, defaults: &ListingQuery) -> Self {
        let position = |values: &[String], wanted: &str| {
            values.iter().position(|v| v == wanted).unwrap_or(0)
        };
        Self {
            neighbourhood_idx: position(&catalogue.neighbourhoods, &defaults.neighbourhood),
            room_type_idx: position(&catalogue.room_types, &defaults.room_type),
            neighbourhoods: catalogue.neighbourhoods.clone(),
            room_types: catalogue.room_types.clone(),
            minimum_nights: defaults.minimum_nights,
            availability_365: defaults.availability_365,
            number_of_reviews: defaults.number_of_reviews,
            reviews_per_month: defaults.reviews_per_month,
            number_of_reviews_ltm: defaults.number_of_reviews_ltm,
            host_listings: defaults.calculated_host_listings_count,
            latitude: defaults.latitude,
            longitude: defaults.longitude,
            selected: 0,
            editing: None,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_field(&self) -> Field {
        Field::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < Field::ALL.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Step the selected field by `delta` units, clamped to its bounds.
    ///
    /// Enum selectors wrap around. Returns whether the value changed.
    pub fn adjust(&mut self, delta: i32) -> bool {
        let before = self.snapshot();
        match self.selected_field() {
            Field::Neighbourhood => {
                self.neighbourhood_idx = cycle(self.neighbourhood_idx, self.neighbourhoods.len(), delta);
            }
            Field::RoomType => {
                self.room_type_idx = cycle(self.room_type_idx, self.room_types.len(), delta);
            }
            Field::MinimumNights => {
                let (lo, hi) = MINIMUM_NIGHTS_RANGE;
                self.minimum_nights = step_u32(self.minimum_nights, delta, lo, hi);
            }
            Field::Availability365 => {
                let (lo, hi) = AVAILABILITY_365_RANGE;
                self.availability_365 = step_u32(self.availability_365, delta, lo, hi);
            }
            Field::NumberOfReviews => {
                self.number_of_reviews = step_u32(self.number_of_reviews, delta, 0, u32::MAX);
            }
            Field::NumberOfReviewsLtm => {
                self.number_of_reviews_ltm =
                    step_u32(self.number_of_reviews_ltm, delta, 0, u32::MAX);
            }
            Field::HostListings => {
                self.host_listings = step_u32(self.host_listings, delta, HOST_LISTINGS_MIN, u32::MAX);
            }
            Field::ReviewsPerMonth => {
                let next = tidy(self.reviews_per_month + REVIEWS_PER_MONTH_STEP * f64::from(delta));
                self.reviews_per_month = next.max(0.0);
            }
            Field::Latitude => {
                self.latitude = tidy(self.latitude + COORD_STEP * f64::from(delta));
            }
            Field::Longitude => {
                self.longitude = tidy(self.longitude + COORD_STEP * f64::from(delta));
            }
            Field::Predict => {}
        }
        self.snapshot() != before
    }

    /// Start typing into the selected numeric field.
    ///
    /// `fresh` starts from an empty buffer instead of the current value.
    pub fn begin_edit(&mut self, fresh: bool) -> bool {
        let field = self.selected_field();
        if !field.is_numeric() {
            return false;
        }
        self.editing = Some(if fresh {
            String::new()
        } else {
            self.display_value(field)
        });
        true
    }

    pub fn edit_push(&mut self, c: char) {
        if let Some(buf) = &mut self.editing {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                buf.push(c);
            }
        }
    }

    pub fn edit_pop(&mut self) {
        if let Some(buf) = &mut self.editing {
            buf.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Parse the edit buffer into the selected field.
    ///
    /// On error the previous value is kept and the edit ends. Returns whether
    /// the value changed.
    pub fn commit_edit(&mut self) -> Result<bool, String> {
        let Some(raw) = self.editing.take() else {
            return Ok(false);
        };
        let raw = raw.trim();
        let field = self.selected_field();
        let before = self.snapshot();

        match field {
            Field::MinimumNights => {
                let (lo, hi) = MINIMUM_NIGHTS_RANGE;
                self.minimum_nights = parse_u32_in(field, raw, lo, hi)?;
            }
            Field::Availability365 => {
                let (lo, hi) = AVAILABILITY_365_RANGE;
                self.availability_365 = parse_u32_in(field, raw, lo, hi)?;
            }
            Field::NumberOfReviews => {
                self.number_of_reviews = parse_u32_in(field, raw, 0, u32::MAX)?;
            }
            Field::NumberOfReviewsLtm => {
                self.number_of_reviews_ltm = parse_u32_in(field, raw, 0, u32::MAX)?;
            }
            Field::HostListings => {
                self.host_listings = parse_u32_in(field, raw, HOST_LISTINGS_MIN, u32::MAX)?;
            }
            Field::ReviewsPerMonth => {
                let v = parse_finite(field, raw)?;
                if v < 0.0 {
                    return Err(format!("{} must be >= 0.0.", field.label()));
                }
                self.reviews_per_month = v;
            }
            Field::Latitude => self.latitude = parse_finite(field, raw)?,
            Field::Longitude => self.longitude = parse_finite(field, raw)?,
            Field::Neighbourhood | Field::RoomType | Field::Predict => {}
        }

        Ok(self.snapshot() != before)
    }

    /// Value as shown in the form.
    pub fn display_value(&self, field: Field) -> String {
        match field {
            Field::Neighbourhood => self.neighbourhood().to_string(),
            Field::RoomType => self.room_type().to_string(),
            Field::MinimumNights => self.minimum_nights.to_string(),
            Field::Availability365 => self.availability_365.to_string(),
            Field::NumberOfReviews => self.number_of_reviews.to_string(),
            Field::ReviewsPerMonth => format!("{:.2}", self.reviews_per_month),
            Field::NumberOfReviewsLtm => self.number_of_reviews_ltm.to_string(),
            Field::HostListings => self.host_listings.to_string(),
            Field::Latitude => format!("{:.5}", self.latitude),
            Field::Longitude => format!("{:.5}", self.longitude),
            Field::Predict => String::new(),
        }
    }

    pub fn neighbourhood(&self) -> &str {
        self.neighbourhoods
            .get(self.neighbourhood_idx)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn room_type(&self) -> &str {
        self.room_types
            .get(self.room_type_idx)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The query the current form values describe.
    pub fn to_query(&self) -> ListingQuery {
        ListingQuery {
            room_type: self.room_type().to_string(),
            neighbourhood: self.neighbourhood().to_string(),
            minimum_nights: self.minimum_nights,
            availability_365: self.availability_365,
            number_of_reviews: self.number_of_reviews,
            reviews_per_month: self.reviews_per_month,
            number_of_reviews_ltm: self.number_of_reviews_ltm,
            calculated_host_listings_count: self.host_listings,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    fn snapshot(&self) -> ListingQuery {
        self.to_query()
    }
}

fn cycle(idx: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (idx as i64 + i64::from(delta)).rem_euclid(len) as usize
}

fn step_u32(v: u32, delta: i32, lo: u32, hi: u32) -> u32 {
    let next = i64::from(v) + i64::from(delta);
    next.clamp(i64::from(lo), i64::from(hi)) as u32
}

/// Drop float noise from repeated stepping (1.2 + 0.1 -> 1.3, not 1.3000000000000003).
fn tidy(v: f64) -> f64 {
    (v * 1e9).round() / 1e9
}

fn parse_u32_in(field: Field, raw: &str, lo: u32, hi: u32) -> Result<u32, String> {
    let v: u32 = raw
        .parse()
        .map_err(|_| format!("{}: '{raw}' is not a whole number.", field.label()))?;
    if v < lo || v > hi {
        return Err(if hi == u32::MAX {
            format!("{} must be >= {lo}.", field.label())
        } else {
            format!("{} must be between {lo} and {hi}.", field.label())
        });
    }
    Ok(v)
}

fn parse_finite(field: Field, raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("{}: '{raw}' is not a number.", field.label())),
    }
}
