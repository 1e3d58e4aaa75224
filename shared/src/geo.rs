//! Geographic primitives and the straight-line distance estimator.
//!
//! Distances are great-circle estimates on a sphere of mean Earth radius.
//! Ellipsoidal correction is ignored, which is fine for urban delivery ranges.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DISTANCE_DECIMALS: i32 = 2;

/// Padding applied around a two-point region so both markers stay on screen.
pub const REGION_PADDING_FACTOR: f64 = 1.5;
pub const SINGLE_POINT_DELTA: f64 = 0.01;
pub const MIN_REGION_DELTA: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when the point is finite and inside the lat/lng ranges.
    ///
    /// The distance estimator does not call this; callers that accept
    /// coordinates from outside the core (device fixes) do.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `[lng, lat]` position as GeoJSON expects it.
    #[must_use]
    pub fn to_position(self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

/// Great-circle distance in kilometres, rounded to two decimals.
///
/// Pure and symmetric. Identical points give exactly `0.0`. Out-of-range input
/// is not rejected and yields a mathematically defined but meaningless value.
#[must_use]
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    round_to(haversine_km(a, b), DISTANCE_DECIMALS)
}

/// Unrounded haversine distance in kilometres.
#[must_use]
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    // rounding can push antipodal inputs a hair past 1.0
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[must_use]
pub fn format_distance_km(km: f64) -> String {
    if !km.is_finite() || km < 0.0 {
        return "Unknown".to_string();
    }
    format!("{km:.2} km")
}

/// Numeric `"lat, lng"` label used when reverse geocoding gives nothing.
#[must_use]
pub fn coordinate_label(point: GeoPoint, precision: usize) -> String {
    format!(
        "{:.prec$}, {:.prec$}",
        point.latitude,
        point.longitude,
        prec = precision
    )
}

/// Visible map window, in the centre + span form map SDKs animate to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub center: GeoPoint,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    #[must_use]
    pub const fn around(center: GeoPoint) -> Self {
        Self {
            center,
            latitude_delta: SINGLE_POINT_DELTA,
            longitude_delta: SINGLE_POINT_DELTA,
        }
    }

    /// Smallest padded region holding both points.
    #[must_use]
    pub fn fitting(a: GeoPoint, b: GeoPoint) -> Self {
        let center = GeoPoint::new(
            (a.latitude + b.latitude) / 2.0,
            (a.longitude + b.longitude) / 2.0,
        );
        let latitude_delta =
            ((a.latitude - b.latitude).abs() * REGION_PADDING_FACTOR).max(MIN_REGION_DELTA);
        let longitude_delta =
            ((a.longitude - b.longitude).abs() * REGION_PADDING_FACTOR).max(MIN_REGION_DELTA);
        Self {
            center,
            latitude_delta,
            longitude_delta,
        }
    }

    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        (point.latitude - self.center.latitude).abs() <= self.latitude_delta / 2.0
            && (point.longitude - self.center.longitude).abs() <= self.longitude_delta / 2.0
    }
}

impl Default for MapRegion {
    fn default() -> Self {
        Self::around(crate::config::DEFAULT_REGION_CENTER)
    }
}
