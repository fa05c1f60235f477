//! Geographic positions and nearest-first ranking of restaurants.
//!
//! Distances use the haversine great-circle formula over a spherical Earth
//! of radius [`EARTH_RADIUS_KM`]. Ranking is a pure function of its inputs:
//! it never touches persistence and never mutates the candidates.

use super::{Restaurant, ReviewDomainError};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a validated point.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::CoordinateOutOfRange`] when either value
    /// is not finite or lies outside `[-90, 90]` / `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ReviewDomainError> {
        Ok(Self {
            latitude: check_axis("latitude", latitude, MAX_LATITUDE)?,
            longitude: check_axis("longitude", longitude, MAX_LONGITUDE)?,
        })
    }

    /// Parses a point from raw query values.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::MissingCoordinate`] when a value is
    /// absent or blank, [`ReviewDomainError::NonNumericCoordinate`] when it
    /// does not parse, and [`ReviewDomainError::CoordinateOutOfRange`] as
    /// for [`GeoPoint::new`].
    pub fn parse(
        latitude: Option<&str>,
        longitude: Option<&str>,
    ) -> Result<Self, ReviewDomainError> {
        let lat = parse_axis("latitude", latitude)?;
        let lng = parse_axis("longitude", longitude)?;
        Self::new(lat, lng)
    }

    /// Returns the latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }

    /// Returns the great-circle distance to `other` in kilometres.
    #[must_use]
    pub fn distance_km(self, other: Self) -> f64 {
        haversine_km(self, other)
    }
}

fn check_axis(axis: &'static str, value: f64, bound: f64) -> Result<f64, ReviewDomainError> {
    if value.is_finite() && value.abs() <= bound {
        Ok(value)
    } else {
        Err(ReviewDomainError::CoordinateOutOfRange { axis, value })
    }
}

fn parse_axis(axis: &'static str, raw: Option<&str>) -> Result<f64, ReviewDomainError> {
    let trimmed = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ReviewDomainError::MissingCoordinate(axis))?;
    trimmed
        .parse::<f64>()
        .map_err(|_| ReviewDomainError::NonNumericCoordinate {
            axis,
            raw: trimmed.to_owned(),
        })
}

/// Great-circle distance between two points in kilometres.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is defined over floating-point trigonometry"
)]
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let half_dlat = (to.latitude - from.latitude).to_radians() / 2.0;
    let half_dlng = (to.longitude - from.longitude).to_radians() / 2.0;

    let raw = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlng.sin().powi(2);
    // Rounding can push the term a hair past 1 for antipodal points.
    let a = raw.clamp(0.0, 1.0);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// A restaurant paired with its distance from a reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRestaurant {
    restaurant: Restaurant,
    distance_km: f64,
}

impl RankedRestaurant {
    /// Returns the ranked restaurant.
    #[must_use]
    pub const fn restaurant(&self) -> &Restaurant {
        &self.restaurant
    }

    /// Returns the distance from the reference point in kilometres.
    #[must_use]
    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Consumes the entry and returns the restaurant.
    #[must_use]
    pub fn into_restaurant(self) -> Restaurant {
        self.restaurant
    }
}

/// Orders `candidates` nearest-first from `origin`.
///
/// The sort is stable, so restaurants at equal distance keep their input
/// order.
#[must_use]
pub fn rank_by_distance(
    origin: GeoPoint,
    candidates: impl IntoIterator<Item = Restaurant>,
) -> Vec<RankedRestaurant> {
    let mut ranked: Vec<RankedRestaurant> = candidates
        .into_iter()
        .map(|restaurant| RankedRestaurant {
            distance_km: haversine_km(origin, restaurant.location()),
            restaurant,
        })
        .collect();
    ranked.sort_by(|left, right| left.distance_km.total_cmp(&right.distance_km));
    ranked
}
