//! Great-circle distance between geographic coordinates.
//!
//! Used by the planner to rank expansion candidates by how close they are to
//! the destination. The formula is the atan2 form of the spherical law of
//! cosines, which stays well conditioned for both tiny and antipodal
//! separations.

/// Mean Earth radius in meters (WGS 84).
pub const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// Error from distance calculation on raw inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    /// One of the inputs is NaN or infinite.
    #[error("invalid argument: {name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}

/// Distance in whole meters between two points given in degrees.
///
/// Only numeric finiteness is checked here; callers that need geographic
/// range checks should build [`Coordinates`](crate::domain::Coordinates)
/// first.
///
/// ```
/// use border_route::geo::distance;
///
/// // One degree of longitude along the equator
/// assert_eq!(distance(0.0, 0.0, 0.0, 1.0).unwrap(), 111_195);
/// assert!(distance(f64::NAN, 0.0, 0.0, 0.0).is_err());
/// ```
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<u64, GeoError> {
    for (name, value) in [("lat1", lat1), ("lon1", lon1), ("lat2", lat2), ("lon2", lon2)] {
        if !value.is_finite() {
            return Err(GeoError::NonFinite { name, value });
        }
    }
    Ok(great_circle_meters(lat1, lon1, lat2, lon2))
}

/// Unchecked variant of [`distance`] for already-validated inputs.
pub(crate) fn great_circle_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> u64 {
    let meters = angular_distance(lat1, lon1, lat2, lon2) * EARTH_RADIUS_M;
    meters.round() as u64
}

/// Central angle between two points, in radians.
fn angular_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (sin_lat1, cos_lat1) = lat1.to_radians().sin_cos();
    let (sin_lat2, cos_lat2) = lat2.to_radians().sin_cos();
    let (sin_delta, cos_delta) = (lon2 - lon1).to_radians().sin_cos();

    let y = ((cos_lat2 * sin_delta).powi(2)
        + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_delta).powi(2))
    .sqrt();
    let x = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_delta;

    y.atan2(x)
}
