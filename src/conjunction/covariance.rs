use nalgebra::{Matrix2, Matrix3, SMatrix, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relative floor applied to the smallest eigenvalue of a projected covariance.
pub const EIGENVALUE_RELATIVE_FLOOR: f64 = 1e-10;
/// Absolute floor, m^2 (1 mm standard deviation).
pub const EIGENVALUE_ABSOLUTE_FLOOR: f64 = 1e-6;

const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Position covariance of one object, m^2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PositionCovariance {
    /// 3x3 in ECI.
    Full(Matrix3<f64>),
    /// 2x2 already expressed on the (along-track, cross-track) encounter axes.
    EncounterPlane(Matrix2<f64>),
}

impl PositionCovariance {
    /// Build from row-major values: 9 entries for a full 3x3, 4 for a 2x2
    /// encounter-plane matrix.
    pub fn from_row_slice(values: &[f64]) -> Result<Self> {
        let cov = match values.len() {
            9 => PositionCovariance::Full(Matrix3::from_row_slice(values)),
            4 => PositionCovariance::EncounterPlane(Matrix2::from_row_slice(values)),
            n => {
                return Err(Error::MalformedCovariance(format!(
                    "expected 9 (3x3) or 4 (2x2) values, got {}",
                    n
                )))
            }
        };
        cov.validate()?;
        Ok(cov)
    }

    /// Finite, symmetric, non-negative diagonal.
    pub fn validate(&self) -> Result<()> {
        match self {
            PositionCovariance::Full(m) => check_matrix(m),
            PositionCovariance::EncounterPlane(m) => check_matrix(m),
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            PositionCovariance::Full(m) => PositionCovariance::Full(m * factor),
            PositionCovariance::EncounterPlane(m) => PositionCovariance::EncounterPlane(m * factor),
        }
    }

    /// Covariance on the plane spanned by the unit vectors `axis1`, `axis2`.
    ///
    /// An `EncounterPlane` matrix is assumed to be on those axes already and is
    /// returned unchanged.
    pub fn project(&self, axis1: &Vector3<f64>, axis2: &Vector3<f64>) -> Matrix2<f64> {
        match self {
            PositionCovariance::Full(m) => {
                let (c1, c2) = (m * axis1, m * axis2);
                let off = 0.5 * (axis1.dot(&c2) + axis2.dot(&c1));
                Matrix2::new(axis1.dot(&c1), off, off, axis2.dot(&c2))
            }
            PositionCovariance::EncounterPlane(m) => *m,
        }
    }
}

fn check_matrix<const D: usize>(m: &SMatrix<f64, D, D>) -> Result<()> {
    for i in 0..D {
        let d = m[(i, i)];
        if !d.is_finite() || d < 0.0 {
            return Err(Error::MalformedCovariance(format!("diagonal entry {} is {}", i, d)));
        }
        for j in (i + 1)..D {
            let (a, b) = (m[(i, j)], m[(j, i)]);
            if !a.is_finite() || !b.is_finite() {
                return Err(Error::MalformedCovariance(format!("entry ({}, {}) is not finite", i, j)));
            }
            if (a - b).abs() > SYMMETRY_TOLERANCE * a.abs().max(b.abs()).max(1.0) {
                return Err(Error::MalformedCovariance(format!(
                    "not symmetric: ({}, {}) = {} but ({}, {}) = {}",
                    i, j, a, j, i, b
                )));
            }
        }
    }
    Ok(())
}

/// Symmetrize and lift eigenvalues to `max(λmax·1e-10, 1e-6 m²)`.
pub fn regularize(cov: &Matrix2<f64>) -> Matrix2<f64> {
    let sym = (cov + cov.transpose()) * 0.5;
    let eig = SymmetricEigen::new(sym);
    let lambda_max = eig.eigenvalues.max();
    let floor = (lambda_max * EIGENVALUE_RELATIVE_FLOOR).max(EIGENVALUE_ABSOLUTE_FLOOR);
    if eig.eigenvalues.min() >= floor {
        return sym;
    }
    log::warn!(
        "Regularizing encounter covariance: eigenvalues {:.3e}, {:.3e} floored at {:.3e} m^2",
        eig.eigenvalues[0],
        eig.eigenvalues[1],
        floor
    );
    let lifted = eig.eigenvalues.map(|l| l.max(floor));
    eig.eigenvectors * Matrix2::from_diagonal(&lifted) * eig.eigenvectors.transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_row_slice_picks_dimension() {
        let full = PositionCovariance::from_row_slice(&[4.0, 1.0, 0.0, 1.0, 9.0, 0.0, 0.0, 0.0, 16.0]).unwrap();
        assert!(matches!(full, PositionCovariance::Full(_)));
        let plane = PositionCovariance::from_row_slice(&[100.0, 0.0, 0.0, 25.0]).unwrap();
        assert!(matches!(plane, PositionCovariance::EncounterPlane(_)));
    }

    #[test]
    fn rejects_malformed_input() {
        let wrong_len = PositionCovariance::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(matches!(wrong_len, Err(Error::MalformedCovariance(_))));
        let asym = PositionCovariance::from_row_slice(&[1.0, 0.5, 0.2, 1.0]);
        assert!(matches!(asym, Err(Error::MalformedCovariance(_))));
        let neg = PositionCovariance::from_row_slice(&[-1.0, 0.0, 0.0, 1.0]);
        assert!(matches!(neg, Err(Error::MalformedCovariance(_))));
        let nan = PositionCovariance::from_row_slice(&[1.0, f64::NAN, f64::NAN, 1.0]);
        assert!(nan.is_err());
    }

    #[test]
    fn projection_onto_coordinate_axes() {
        let cov = PositionCovariance::from_row_slice(&[4.0, 1.0, 0.5, 1.0, 9.0, 2.0, 0.5, 2.0, 16.0]).unwrap();
        let p = cov.project(&Vector3::x(), &Vector3::z());
        assert_eq!(p, Matrix2::new(4.0, 0.5, 0.5, 16.0));
    }

    #[test]
    fn projection_onto_rotated_axes() {
        let cov = PositionCovariance::Full(Matrix3::from_diagonal(&Vector3::new(100.0, 1.0, 4.0)));
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let p = cov.project(&Vector3::new(s, s, 0.0), &Vector3::z());
        assert!((p[(0, 0)] - 50.5).abs() < 1e-12, "got {}", p[(0, 0)]);
        assert!((p[(1, 1)] - 4.0).abs() < 1e-12);
        assert!(p[(0, 1)].abs() < 1e-12);
    }

    #[test]
    fn scaling_is_linear() {
        let cov = PositionCovariance::from_row_slice(&[100.0, 10.0, 10.0, 25.0]).unwrap();
        let p = cov.scaled(1.5).project(&Vector3::x(), &Vector3::y());
        assert_eq!(p, Matrix2::new(150.0, 15.0, 15.0, 37.5));
    }

    #[test]
    fn regularize_leaves_healthy_matrix() {
        let m = Matrix2::new(100.0, 20.0, 20.0, 50.0);
        assert_eq!(regularize(&m), m);
    }

    #[test]
    fn regularize_lifts_singular_matrix() {
        let m = Matrix2::new(100.0, 100.0, 100.0, 100.0);
        let r = regularize(&m);
        assert!(r.determinant() > 0.0, "still singular: {}", r);
        assert!((r[(0, 0)] - 100.0).abs() < 1e-3);
        let zero = regularize(&Matrix2::zeros());
        assert!((zero[(0, 0)] - EIGENVALUE_ABSOLUTE_FLOOR).abs() < 1e-15);
    }
}
