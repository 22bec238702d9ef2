//! Geodesy helpers for routines that aim or fly relative to a position.

use libm::{atan2, cos, sin, sqrt};

use crate::traits::GeoPoint;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Great-circle distance and initial bearing between two positions
///
/// # Returns
///
/// Tuple of (distance in meters, bearing in degrees 0-360)
pub fn distance_bearing(from: &GeoPoint, to: &GeoPoint) -> (f32, f32) {
    let lat1 = from.lat * DEG_TO_RAD;
    let lat2 = to.lat * DEG_TO_RAD;
    let delta_lat = (to.lat - from.lat) * DEG_TO_RAD;
    let delta_lng = (to.lng - from.lng) * DEG_TO_RAD;

    // Haversine distance
    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlng = sin(delta_lng / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1) * cos(lat2) * sin_dlng * sin_dlng;
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));
    let distance = EARTH_RADIUS_M * c;

    // Forward azimuth
    let y = sin(delta_lng) * cos(lat2);
    let x = cos(lat1) * sin(lat2) - sin(lat1) * cos(lat2) * cos(delta_lng);
    let bearing = (atan2(y, x) * RAD_TO_DEG + 360.0) % 360.0;

    (distance as f32, bearing as f32)
}

/// Wrap an angle in degrees to the -180..=180 range
///
/// ```
/// use trail_actions_core::navigation::wrap_180;
/// assert_eq!(wrap_180(270.0), -90.0);
/// assert_eq!(wrap_180(-200.0), 160.0);
/// ```
pub fn wrap_180(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a < -180.0 {
        a += 360.0;
    }
    a
}

/// Position displaced by `north_m` / `east_m` meters (flat-earth approximation).
///
/// Accurate enough for survey grids spanning a few hundred meters.
pub fn offset(origin: &GeoPoint, north_m: f32, east_m: f32) -> GeoPoint {
    let dlat = north_m as f64 / EARTH_RADIUS_M * RAD_TO_DEG;
    let dlng = east_m as f64 / (EARTH_RADIUS_M * cos(origin.lat * DEG_TO_RAD)) * RAD_TO_DEG;
    GeoPoint::new(origin.lat + dlat, origin.lng + dlng, origin.alt)
}

/// Gimbal pan and tilt needed to point at `target` from `from`.
///
/// Pan is relative to the vehicle heading (`yaw_rad`) and wrapped to
/// ±180°. Tilt is the elevation angle, negative when the target is below.
pub fn gimbal_angles(from: &GeoPoint, target: &GeoPoint, yaw_rad: f32) -> (f32, f32) {
    let (distance, bearing) = distance_bearing(from, target);
    let heading_deg = yaw_rad * (RAD_TO_DEG as f32);
    let pan = wrap_180(bearing - heading_deg);
    let alt_diff = target.alt - from.alt;
    let tilt = libm::atan2f(alt_diff, distance) * (RAD_TO_DEG as f32);
    (pan, tilt)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: GeoPoint = GeoPoint::new(35.0, 139.0, 0.0);

    #[test]
    fn distance_one_degree_latitude() {
        let (distance, bearing) = distance_bearing(&ORIGIN, &GeoPoint::new(36.0, 139.0, 0.0));
        assert!((distance - 111_195.0).abs() < 100.0);
        assert!(bearing.abs() < 0.5 || (bearing - 360.0).abs() < 0.5);
    }

    #[test]
    fn bearing_east_and_west() {
        let (_, east) = distance_bearing(&ORIGIN, &GeoPoint::new(35.0, 139.01, 0.0));
        let (_, west) = distance_bearing(&ORIGIN, &GeoPoint::new(35.0, 138.99, 0.0));
        assert!((east - 90.0).abs() < 0.5);
        assert!((west - 270.0).abs() < 0.5);
    }

    #[test]
    fn wrap_180_cases() {
        assert_eq!(wrap_180(270.0), -90.0);
        assert_eq!(wrap_180(-200.0), 160.0);
        assert_eq!(wrap_180(450.0), 90.0);
        assert_eq!(wrap_180(180.0), 180.0);
        assert_eq!(wrap_180(0.0), 0.0);
    }

    #[test]
    fn offset_round_trips_distance() {
        let moved = offset(&ORIGIN, 100.0, 0.0);
        let (distance, bearing) = distance_bearing(&ORIGIN, &moved);
        assert!((distance - 100.0).abs() < 0.5);
        assert!(bearing < 1.0 || bearing > 359.0);

        let moved = offset(&ORIGIN, 0.0, 50.0);
        let (distance, bearing) = distance_bearing(&ORIGIN, &moved);
        assert!((distance - 50.0).abs() < 0.5);
        assert!((bearing - 90.0).abs() < 1.0);
    }

    #[test]
    fn gimbal_angles_relative_to_heading() {
        // Target 100 m east, 100 m below; vehicle facing north
        let from = GeoPoint::new(35.0, 139.0, 100.0);
        let mut target = offset(&from, 0.0, 100.0);
        target.alt = 0.0;

        let (pan, tilt) = gimbal_angles(&from, &target, 0.0);
        assert!((pan - 90.0).abs() < 1.0);
        assert!((tilt + 45.0).abs() < 1.0);

        // Facing east: target dead ahead
        let (pan, _) = gimbal_angles(&from, &target, core::f32::consts::FRAC_PI_2);
        assert!(pan.abs() < 1.0);

        // Facing south-west (225°): target at -135° relative
        let (pan, _) = gimbal_angles(&from, &target, 225.0_f32.to_radians());
        assert!((pan + 135.0).abs() < 1.0);
    }
}
