use serde::Serialize;

use crate::conjunction::screening::ScreeningConfig;
use crate::error::{Error, Result};

/// Pc at or above which the upper band flags an event regardless of range.
pub const PC_FLAG_THRESHOLD: f64 = 1e-4;

const BAND_LOWER_FACTOR: f64 = 0.7;
const BAND_UPPER_FACTOR: f64 = 1.3;

/// Named screening policy: range threshold and covariance inflation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreeningProfile {
    pub profile_id: &'static str,
    pub version: &'static str,
    pub threshold_m: f64,
    pub covariance_scale: f64,
}

impl ScreeningProfile {
    /// `base` with this profile's range threshold.
    pub fn screening_config(&self, base: &ScreeningConfig) -> ScreeningConfig {
        ScreeningConfig { threshold_m: self.threshold_m, ..*base }
    }
}

pub const PROFILES: [ScreeningProfile; 3] = [
    ScreeningProfile { profile_id: "conservative", version: "v1", threshold_m: 25_000.0, covariance_scale: 1.5 },
    ScreeningProfile { profile_id: "nominal", version: "v1", threshold_m: 15_000.0, covariance_scale: 1.0 },
    ScreeningProfile { profile_id: "aggressive", version: "v1", threshold_m: 8_000.0, covariance_scale: 0.75 },
];

pub fn get_screening_profile(name: &str) -> Result<ScreeningProfile> {
    PROFILES
        .iter()
        .find(|p| p.profile_id.eq_ignore_ascii_case(name.trim()))
        .copied()
        .ok_or_else(|| Error::UnknownProfile(name.to_string()))
}

/// Collision probability band, `lower <= nominal <= upper`, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityBand {
    pub lower: f64,
    pub nominal: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfiledScreening {
    pub profile: ScreeningProfile,
    pub miss_distance_m: f64,
    pub base_collision_probability: f64,
    pub flagged: bool,
    pub band: ProbabilityBand,
}

pub fn evaluate_profiled_screening(
    miss_distance_m: f64,
    base_collision_probability: f64,
    profile_name: &str,
) -> Result<ProfiledScreening> {
    let profile = get_screening_profile(profile_name)?;
    if base_collision_probability.is_nan() {
        return Err(Error::InvalidParameter {
            name: "base_collision_probability",
            value: base_collision_probability,
            reason: "must be a number",
        });
    }

    let nominal = (base_collision_probability * profile.covariance_scale).clamp(0.0, 1.0);
    let band = ProbabilityBand {
        lower: (nominal * BAND_LOWER_FACTOR).max(0.0),
        nominal,
        upper: (nominal * BAND_UPPER_FACTOR).min(1.0),
    };
    let flagged = miss_distance_m <= profile.threshold_m || band.upper >= PC_FLAG_THRESHOLD;

    Ok(ProfiledScreening {
        profile,
        miss_distance_m,
        base_collision_probability,
        flagged,
        band,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_versioned() {
        let p = get_screening_profile("conservative").unwrap();
        assert_eq!((p.threshold_m, p.covariance_scale, p.version), (25_000.0, 1.5, "v1"));
        assert_eq!(get_screening_profile("nominal").unwrap().threshold_m, 15_000.0);
        assert_eq!(get_screening_profile("Aggressive").unwrap().covariance_scale, 0.75);
    }

    #[test]
    fn unknown_profile_is_configuration_error() {
        let err = get_screening_profile("paranoid").unwrap_err();
        assert!(err.is_configuration());
        assert!(evaluate_profiled_screening(1.0, 1e-3, "paranoid").is_err());
    }

    #[test]
    fn band_is_ordered_and_clamped() {
        for (pc, name) in [(0.0, "nominal"), (1e-6, "aggressive"), (0.5, "nominal"), (0.9, "conservative"), (3.0, "nominal"), (-0.2, "nominal")] {
            let r = evaluate_profiled_screening(50_000.0, pc, name).unwrap();
            let b = r.band;
            assert!(0.0 <= b.lower && b.lower <= b.nominal && b.nominal <= b.upper && b.upper <= 1.0, "pc {} band {:?}", pc, b);
        }
        let r = evaluate_profiled_screening(50_000.0, 0.9, "conservative").unwrap();
        assert_eq!(r.band.nominal, 1.0);
        assert_eq!(r.band.upper, 1.0);
        assert!((r.band.lower - 0.7).abs() < 1e-12);
    }

    #[test]
    fn flagging_by_range_or_probability() {
        // inside the aggressive threshold, negligible Pc
        assert!(evaluate_profiled_screening(5_000.0, 0.0, "aggressive").unwrap().flagged);
        // outside it, negligible Pc
        assert!(!evaluate_profiled_screening(9_000.0, 1e-9, "aggressive").unwrap().flagged);
        // outside, but the upper band crosses 1e-4
        assert!(evaluate_profiled_screening(90_000.0, 8e-5, "nominal").unwrap().flagged);
        // same Pc deflated by the aggressive scale stays below
        assert!(!evaluate_profiled_screening(90_000.0, 1e-4 / (0.75 * 1.3) * 0.99, "aggressive").unwrap().flagged);
    }

    #[test]
    fn profile_threshold_applies_to_screening() {
        let cfg = get_screening_profile("conservative").unwrap().screening_config(&ScreeningConfig::default());
        assert_eq!(cfg.threshold_m, 25_000.0);
        assert_eq!(cfg.subdivisions, ScreeningConfig::default().subdivisions);
    }
}
