use thiserror::Error;

/// Errors raised by the engine.
///
/// Numerical degeneracies (zero angular momentum, singular covariance,
/// near-zero relative velocity) are not errors; they are handled by the
/// fallbacks documented on the functions that meet them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("altitude {altitude_km} km outside valid range [{min_km}, {max_km}] km")]
    AltitudeOutOfRange {
        altitude_km: f64,
        min_km: f64,
        max_km: f64,
    },

    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid orbital elements: {0}")]
    InvalidElements(String),

    #[error("hard-body radius must be positive, got {0} m")]
    InvalidHardBodyRadius(f64),

    #[error("malformed covariance: {0}")]
    MalformedCovariance(String),

    #[error("trajectories are not sampled on a common time grid: {0}")]
    MisalignedTrajectories(String),

    #[error("unknown integrator: {0:?} (expected \"rk4\" or \"dormand-prince\")")]
    UnknownIntegrator(String),

    #[error("unknown screening profile: {0:?}")]
    UnknownProfile(String),

    #[error("invalid configuration document: {0}")]
    InvalidConfig(String),

    #[error("integration failed after {elapsed_s:.3} s: {reason}")]
    IntegrationFailed { elapsed_s: f64, reason: String },
}

impl Error {
    /// True for errors caused by selecting an unsupported configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownIntegrator(_) | Error::UnknownProfile(_) | Error::InvalidConfig(_)
        )
    }

    pub(crate) fn non_positive(name: &'static str, value: f64) -> Self {
        Error::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        }
    }
}

/// Ensure `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::non_positive(name, value))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        assert!(Error::UnknownIntegrator("euler".into()).is_configuration());
        assert!(Error::UnknownProfile("paranoid".into()).is_configuration());
        assert!(Error::InvalidConfig("expected a map".into()).is_configuration());
        assert!(!Error::InvalidHardBodyRadius(0.0).is_configuration());
    }

    #[test]
    fn require_positive_rejects_zero_and_nan() {
        assert!(require_positive("step", 10.0).is_ok());
        assert!(require_positive("step", 0.0).is_err());
        assert!(require_positive("step", -1.0).is_err());
        assert!(require_positive("step", f64::NAN).is_err());
    }

    #[test]
    fn altitude_error_message_names_range() {
        let e = Error::AltitudeOutOfRange { altitude_km: 99.0, min_km: 100.0, max_km: 2000.0 };
        let msg = e.to_string();
        assert!(msg.contains("99"), "message should carry altitude: {}", msg);
        assert!(msg.contains("2000"), "message should carry range: {}", msg);
    }
}
