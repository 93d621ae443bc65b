//! Geodesic helpers for pointing calculations.
//!
//! Distance and bearing use the haversine formula. `offset_position` is a
//! small-displacement planar advance used by dead reckoning; it is not
//! great-circle-correct, which is adequate for the few hundred meters a
//! vehicle can cover within the tracking timeout.

use libm::{atan2, cos, sin, sqrt};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance in meters between two positions given in degrees.
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlon = sin(delta_lon / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1_rad) * cos(lat2_rad) * sin_dlon * sin_dlon;
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));

    EARTH_RADIUS_M * c
}

/// Initial bearing in degrees (0-360, true north) from the first position
/// to the second.
pub fn calculate_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = sin(delta_lon) * cos(lat2_rad);
    let x = cos(lat1_rad) * sin(lat2_rad) - sin(lat1_rad) * cos(lat2_rad) * cos(delta_lon);
    let bearing = atan2(y, x).to_degrees();

    (bearing + 360.0) % 360.0
}

/// Advance a position along a bearing by a distance in meters.
///
/// Planar approximation: latitude advances by the north component,
/// longitude by the east component scaled by the local meridian
/// convergence.
pub fn offset_position(lat_deg: f64, lon_deg: f64, bearing_deg: f64, distance_m: f64) -> (f64, f64) {
    let bearing_rad = bearing_deg.to_radians();
    let dlat = cos(bearing_rad) * distance_m / EARTH_RADIUS_M;
    let dlon = sin(bearing_rad) * distance_m / (EARTH_RADIUS_M * cos(lat_deg.to_radians()));

    (lat_deg + dlat.to_degrees(), lon_deg + dlon.to_degrees())
}

/// Normalize an angle to the -180 to +180 range.
pub fn wrap_180(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a < -180.0 {
        a += 360.0;
    }
    a
}

/// Normalize an angle to the 0 to 360 range.
pub fn wrap_360(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a < 0.0 {
        a += 360.0;
    }
    a
}
