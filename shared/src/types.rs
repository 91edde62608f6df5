//! Common types used across the platform

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{validate_latitude, validate_longitude};

/// Coordinate validation failure
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(Decimal),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(Decimal),

    #[error("Coordinates must be finite numbers")]
    NotANumber,
}

impl CoordinateError {
    /// Name of the offending request field
    pub fn field(&self) -> &'static str {
        match self {
            CoordinateError::LatitudeOutOfRange(_) => "latitude",
            CoordinateError::LongitudeOutOfRange(_) => "longitude",
            CoordinateError::NotANumber => "coordinates",
        }
    }
}

/// A validated geographic point.
///
/// Only obtainable through [`Location::new`] or [`Location::from_degrees`], so
/// every `Location` in the system lies within the WGS84 bounds.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Location {
    latitude: Decimal,
    longitude: Decimal,
}

impl Location {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Result<Self, CoordinateError> {
        validate_latitude(latitude).map_err(|_| CoordinateError::LatitudeOutOfRange(latitude))?;
        validate_longitude(longitude)
            .map_err(|_| CoordinateError::LongitudeOutOfRange(longitude))?;

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a location from floating point degrees (browser and map input)
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        let latitude = Decimal::try_from(latitude).map_err(|_| CoordinateError::NotANumber)?;
        let longitude = Decimal::try_from(longitude).map_err(|_| CoordinateError::NotANumber)?;
        Self::new(latitude, longitude)
    }

    pub fn latitude(&self) -> Decimal {
        self.latitude
    }

    pub fn longitude(&self) -> Decimal {
        self.longitude
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4}, {:.4}",
            self.latitude.round_dp(4),
            self.longitude.round_dp(4)
        )
    }
}

/// Inclusive date range for provider queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Window covering `days` days back from `end`, saturating at the
    /// earliest representable date
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        Self::checked_trailing(end, days).unwrap_or(Self {
            start: NaiveDate::MIN,
            end,
        })
    }

    /// Window covering `days` days back from `end`, or `None` when its start
    /// would precede the earliest representable date
    pub fn checked_trailing(end: NaiveDate, days: u32) -> Option<Self> {
        end.checked_sub_signed(Duration::days(i64::from(days)))
            .map(|start| Self::new(start, end))
    }

    /// One-day window ending on `day` (previous day to `day`)
    pub fn single_day(day: NaiveDate) -> Self {
        Self::trailing(day, 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    #[test]
    fn test_location_accepts_bounds() {
        assert!(Location::new(dec("90"), dec("180")).is_ok());
        assert!(Location::new(dec("-90"), dec("-180")).is_ok());
        assert!(Location::new(Decimal::ZERO, Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_location_rejects_out_of_range() {
        assert_eq!(
            Location::new(dec("100"), Decimal::ZERO),
            Err(CoordinateError::LatitudeOutOfRange(dec("100")))
        );
        assert_eq!(
            Location::new(Decimal::ZERO, dec("-180.5")),
            Err(CoordinateError::LongitudeOutOfRange(dec("-180.5")))
        );
    }

    #[test]
    fn test_location_from_degrees_rejects_nan() {
        assert_eq!(
            Location::from_degrees(f64::NAN, 0.0),
            Err(CoordinateError::NotANumber)
        );
        assert_eq!(
            Location::from_degrees(0.0, f64::INFINITY),
            Err(CoordinateError::NotANumber)
        );
    }

    #[test]
    fn test_location_display() {
        let location = Location::new(dec("-1.286389"), dec("36.817223")).unwrap();
        assert_eq!(location.to_string(), "-1.2864, 36.8172");
    }

    #[test]
    fn test_single_day_window() {
        let window = DateRange::single_day(date("2024-03-10"));
        assert_eq!(window.start, date("2024-03-09"));
        assert_eq!(window.end, date("2024-03-10"));
        assert!(window.contains(date("2024-03-10")));
        assert!(!window.contains(date("2024-03-11")));
    }

    #[test]
    fn test_trailing_near_earliest_date() {
        let earliest = NaiveDate::MIN;
        assert_eq!(DateRange::checked_trailing(earliest, 1), None);
        assert_eq!(
            DateRange::checked_trailing(date("2024-03-10"), 3),
            Some(DateRange::new(date("2024-03-07"), date("2024-03-10")))
        );

        let window = DateRange::trailing(earliest, 10);
        assert_eq!(window.start, earliest);
        assert_eq!(window.end, earliest);
    }

    #[test]
    fn test_range_orders_endpoints() {
        let window = DateRange::new(date("2024-03-10"), date("2024-03-01"));
        assert_eq!(window.start, date("2024-03-01"));
        assert_eq!(window.end, date("2024-03-10"));
    }
}
