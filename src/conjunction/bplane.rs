use nalgebra::{Vector2, Vector3};
use serde::Serialize;

use crate::conjunction::screening::CloseApproach;

/// Relative speed below which no encounter plane is defined, m/s.
pub const DEGENERATE_RELATIVE_SPEED: f64 = 1e-3;

/// Encounter-plane geometry at TCA.
///
/// The plane is normal to the relative velocity `xi_hat`. The along-track
/// axis is the primary's velocity projected onto the plane and the
/// cross-track axis completes the right-handed set `cross = xi_hat x along`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BPlane {
    pub xi_hat: Vector3<f64>,
    pub along_axis: Vector3<f64>,
    pub cross_axis: Vector3<f64>,
    pub b_vector: Vector3<f64>, // m, relative position in the plane
    pub along_track_m: f64,
    pub cross_track_m: f64,
    pub relative_speed: f64, // m/s
}

impl BPlane {
    /// Miss vector in (along-track, cross-track) coordinates.
    pub fn miss_vector(&self) -> Vector2<f64> {
        Vector2::new(self.along_track_m, self.cross_track_m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BPlaneGeometry {
    Defined(BPlane),
    Degenerate { relative_speed: f64 },
}

/// Unit vector orthogonal to `normal`, taken from the first candidate with a
/// usable projection, else from the coordinate axis least aligned with it.
fn orthogonal_axis(normal: &Vector3<f64>, candidates: &[Vector3<f64>]) -> Vector3<f64> {
    let project = |v: &Vector3<f64>| v - normal * normal.dot(v);
    for c in candidates {
        let p = project(c);
        if p.norm() > 1e-9 * c.norm().max(1.0) {
            return p.normalize();
        }
    }
    let axis = [Vector3::x(), Vector3::y(), Vector3::z()]
        .into_iter()
        .min_by(|a, b| normal.dot(a).abs().total_cmp(&normal.dot(b).abs()))
        .unwrap_or_else(Vector3::x);
    project(&axis).normalize()
}

pub fn b_plane(approach: &CloseApproach) -> BPlaneGeometry {
    let dv = approach.relative_vel;
    let relative_speed = dv.norm();
    if relative_speed < DEGENERATE_RELATIVE_SPEED {
        log::warn!(
            "{} x {}: relative speed {:.2e} m/s, encounter plane undefined",
            approach.id_a,
            approach.id_b,
            relative_speed
        );
        return BPlaneGeometry::Degenerate { relative_speed };
    }

    let xi_hat = dv / relative_speed;
    let along_axis = orthogonal_axis(&xi_hat, &[approach.state_a.vel, approach.state_a.pos]);
    let cross_axis = xi_hat.cross(&along_axis);

    let dr = approach.relative_pos;
    let b_vector = dr - xi_hat * dr.dot(&xi_hat);

    BPlaneGeometry::Defined(BPlane {
        xi_hat,
        along_axis,
        cross_axis,
        b_vector,
        along_track_m: b_vector.dot(&along_axis),
        cross_track_m: b_vector.dot(&cross_axis),
        relative_speed,
    })
}

/// Axes used when the relative velocity vanishes: the plane normal to the
/// primary's velocity, radial direction first.
pub(crate) fn fallback_axes(approach: &CloseApproach) -> (Vector3<f64>, Vector3<f64>) {
    let v = approach.state_a.vel;
    let normal = if v.norm() > 0.0 { v.normalize() } else { Vector3::z() };
    let axis1 = orthogonal_axis(&normal, &[approach.state_a.pos]);
    (axis1, normal.cross(&axis1))
}
