//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Surface distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_m(self, other)
    }
}

/// Great-circle distance between two coordinates in meters (haversine).
///
/// NaN in either coordinate propagates to the result.
pub fn haversine_m(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Format coordinates for display: "10.7990° N, 106.6800° E".
pub fn format_coords(coord: &Coordinate) -> String {
    let lat_dir = if coord.lat >= 0.0 { "N" } else { "S" };
    let lng_dir = if coord.lng >= 0.0 { "E" } else { "W" };
    format!(
        "{:.4}\u{00B0} {}, {:.4}\u{00B0} {}",
        coord.lat.abs(),
        lat_dir,
        coord.lng.abs(),
        lng_dir
    )
}
