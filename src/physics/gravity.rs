use nalgebra::Vector3;

use crate::constants::{J2_EARTH, MU_EARTH, R_EARTH_EQUATORIAL};

// ---------------------------------------------------------------------------
// Central-body gravity (ECI)
// ---------------------------------------------------------------------------

/// Point-mass gravity `-mu r / |r|^3`.
pub fn gravity_pointmass_eci(pos: &Vector3<f64>) -> Vector3<f64> {
    let r = pos.norm();
    if r < 1.0 {
        return Vector3::zeros();
    }
    -MU_EARTH / (r * r * r) * pos
}

/// J2 zonal perturbation only (excludes the point-mass term).
pub fn j2_perturbation_eci(pos: &Vector3<f64>) -> Vector3<f64> {
    let r = pos.norm();
    if r < 1.0 {
        return Vector3::zeros();
    }
    let r2 = r * r;
    let z2 = pos.z * pos.z;

    let mu_over_r3 = MU_EARTH / (r2 * r);
    let j2_coeff = 1.5 * J2_EARTH * R_EARTH_EQUATORIAL * R_EARTH_EQUATORIAL / r2;

    let xy_factor = mu_over_r3 * j2_coeff * (1.0 - 5.0 * z2 / r2);
    let z_factor = mu_over_r3 * j2_coeff * (3.0 - 5.0 * z2 / r2);

    Vector3::new(-xy_factor * pos.x, -xy_factor * pos.y, -z_factor * pos.z)
}

/// Point-mass plus J2 gravity in ECI.
pub fn gravity_j2_eci(pos: &Vector3<f64>) -> Vector3<f64> {
    gravity_pointmass_eci(pos) + j2_perturbation_eci(pos)
}
