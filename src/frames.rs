//! Earth-centred frame transforms: ECI <-> ECEF via GMST, ECEF <-> WGS84 geodetic.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use std::f64::consts::TAU;

use crate::constants::{OMEGA_EARTH, R_EARTH_EQUATORIAL, WGS84_FLATTENING};
use crate::epoch::julian_centuries_j2000;

/// Greenwich Mean Sidereal Time (IAU-82), radians in [0, 2pi).
pub fn gmst_rad(epoch: DateTime<Utc>) -> f64 {
    let t = julian_centuries_j2000(epoch);
    // seconds of sidereal time
    let gmst_s = 67_310.548_41
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * t
        + 0.093_104 * t * t
        - 6.2e-6 * t * t * t;
    let deg = (gmst_s % 86_400.0) / 240.0;
    deg.to_radians().rem_euclid(TAU)
}

/// Rotate an ECI state into ECEF. Velocity drops the Earth-rotation term.
pub fn eci_to_ecef(
    pos: &Vector3<f64>,
    vel: &Vector3<f64>,
    gmst: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let (s, c) = gmst.sin_cos();
    let rot = |v: &Vector3<f64>| Vector3::new(c * v.x + s * v.y, -s * v.x + c * v.y, v.z);

    let pos_ecef = rot(pos);
    let omega = Vector3::new(0.0, 0.0, OMEGA_EARTH);
    let vel_ecef = rot(vel) - omega.cross(&pos_ecef);
    (pos_ecef, vel_ecef)
}

/// Inverse of [`eci_to_ecef`].
pub fn ecef_to_eci(
    pos: &Vector3<f64>,
    vel: &Vector3<f64>,
    gmst: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let (s, c) = gmst.sin_cos();
    let rot = |v: &Vector3<f64>| Vector3::new(c * v.x - s * v.y, s * v.x + c * v.y, v.z);

    let omega = Vector3::new(0.0, 0.0, OMEGA_EARTH);
    let inertial_vel = vel + omega.cross(pos);
    (rot(pos), rot(&inertial_vel))
}

/// WGS84 geodetic coordinates `(lat_deg, lon_deg, alt_m)` of an ECEF position.
///
/// Fixed-point iteration on latitude; converges well below 1 cm at every
/// latitude including the poles. The zero vector maps to `(0, 0, 0)`.
pub fn ecef_to_geodetic(pos: &Vector3<f64>) -> (f64, f64, f64) {
    if pos.norm() < 1e-9 {
        return (0.0, 0.0, 0.0);
    }

    let a = R_EARTH_EQUATORIAL;
    let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
    let p = (pos.x * pos.x + pos.y * pos.y).sqrt();
    let lon = pos.y.atan2(pos.x);

    let mut lat = pos.z.atan2(p * (1.0 - e2));
    for _ in 0..10 {
        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (pos.z + e2 * n * sin_lat).atan2(p);
        let done = (next - lat).abs() < 1e-13;
        lat = next;
        if done {
            break;
        }
    }

    let (sin_lat, cos_lat) = lat.sin_cos();
    // Stable at the poles, unlike p / cos(lat) - N.
    let alt = p * cos_lat + pos.z * sin_lat - a * (1.0 - e2 * sin_lat * sin_lat).sqrt();

    (lat.to_degrees(), lon.to_degrees(), alt)
}

/// ECEF position of a WGS84 geodetic point.
pub fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Vector3<f64> {
    let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    let n = R_EARTH_EQUATORIAL / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (n + alt_m) * cos_lat * cos_lon,
        (n + alt_m) * cos_lat * sin_lon,
        (n * (1.0 - e2) + alt_m) * sin_lat,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn gmst_at_j2000() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let deg = gmst_rad(j2000).to_degrees();
        assert!((deg - 280.460_618).abs() < 1e-3, "GMST at J2000 should be ~280.46 deg, got {}", deg);
    }

    #[test]
    fn gmst_advances_one_sidereal_turn_per_sidereal_day() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
        let t1 = crate::epoch::add_seconds(t0, 86_164.0905);
        let diff = (gmst_rad(t1) - gmst_rad(t0)).rem_euclid(TAU);
        assert!(diff < 1e-5 || TAU - diff < 1e-5, "residual {:.2e} rad", diff);
    }

    #[test]
    fn eci_ecef_roundtrip() {
        let pos = Vector3::new(4_000_000.0, -3_000_000.0, 4_500_000.0);
        let vel = Vector3::new(1_000.0, 6_000.0, -3_500.0);
        let g = 1.234;
        let (pe, ve) = eci_to_ecef(&pos, &vel, g);
        let (pi, vi) = ecef_to_eci(&pe, &ve, g);
        assert!((pi - pos).norm() < 1e-6);
        assert!((vi - vel).norm() < 1e-9);
    }

    #[test]
    fn rotation_preserves_radius() {
        let pos = Vector3::new(7_000_000.0, 0.0, 0.0);
        let (pe, _) = eci_to_ecef(&pos, &Vector3::zeros(), std::f64::consts::FRAC_PI_2);
        assert!((pe.norm() - pos.norm()).abs() < 1e-6);
        assert!((pe.y + 7_000_000.0).abs() < 1e-6, "x axis should map to -y after +90 deg GMST");
    }

    #[test]
    fn geodetic_roundtrip_including_poles() {
        for &(lat, lon, alt) in &[
            (0.0, 0.0, 0.0),
            (45.0, 10.0, 550_000.0),
            (-33.9, 151.2, 20.0),
            (89.999_999, 30.0, 1_000.0),
            (90.0, 0.0, 500_000.0),
            (-90.0, 0.0, 0.0),
        ] {
            let ecef = geodetic_to_ecef(lat, lon, alt);
            let (lat2, lon2, alt2) = ecef_to_geodetic(&ecef);
            assert!((lat2 - lat).abs() < 1e-9, "lat {} -> {}", lat, lat2);
            assert!((alt2 - alt).abs() < 0.01, "alt {} -> {} (lat {})", alt, alt2, lat);
            if lat.abs() < 89.0 {
                assert!((lon2 - lon).abs() < 1e-9, "lon {} -> {}", lon, lon2);
            }
        }
    }

    #[test]
    fn zero_vector_is_graceful() {
        assert_eq!(ecef_to_geodetic(&Vector3::zeros()), (0.0, 0.0, 0.0));
    }
}
