use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Piecewise-exponential thermosphere (Vallado Table 8-4 / CIRA), 100-2000 km
// ---------------------------------------------------------------------------

/// One table row: base altitude (km), base density (kg/m^3), scale height (km).
#[derive(Debug, Clone, Copy)]
pub struct AtmosphereLayer {
    pub base_altitude_km: f64,
    pub base_density: f64,
    pub scale_height_km: f64,
}

const fn layer(base_altitude_km: f64, base_density: f64, scale_height_km: f64) -> AtmosphereLayer {
    AtmosphereLayer { base_altitude_km, base_density, scale_height_km }
}

pub const ATMOSPHERE_TABLE: [AtmosphereLayer; 24] = [
    layer(100.0, 5.297e-07, 5.877),
    layer(150.0, 2.070e-09, 22.523),
    layer(200.0, 2.541e-10, 53.298),
    layer(250.0, 6.967e-11, 68.019),
    layer(300.0, 2.508e-11, 76.680),
    layer(350.0, 1.172e-11, 84.852),
    layer(400.0, 6.097e-12, 89.412),
    layer(450.0, 3.510e-12, 97.498),
    layer(500.0, 2.150e-12, 112.458),
    layer(600.0, 8.620e-13, 133.060),
    layer(700.0, 3.614e-13, 150.580),
    layer(800.0, 1.454e-13, 164.441),
    layer(900.0, 5.811e-14, 175.579),
    layer(1000.0, 2.302e-14, 188.667),
    layer(1100.0, 9.661e-15, 200.000),
    layer(1200.0, 4.297e-15, 210.000),
    layer(1300.0, 2.036e-15, 218.000),
    layer(1400.0, 1.024e-15, 225.000),
    layer(1500.0, 5.448e-16, 231.000),
    layer(1600.0, 3.059e-16, 236.000),
    layer(1700.0, 1.806e-16, 240.000),
    layer(1800.0, 1.115e-16, 243.000),
    layer(1900.0, 7.170e-17, 245.000),
    layer(2000.0, 4.789e-17, 247.000),
];

pub const MIN_ALTITUDE_KM: f64 = 100.0;
pub const MAX_ALTITUDE_KM: f64 = 2000.0;

/// Atmospheric density at `altitude_km`.
///
/// Errors outside [100, 2000] km; callers never get a silently clamped value.
pub fn atmospheric_density(altitude_km: f64) -> Result<f64> {
    if !(MIN_ALTITUDE_KM..=MAX_ALTITUDE_KM).contains(&altitude_km) {
        return Err(Error::AltitudeOutOfRange {
            altitude_km,
            min_km: MIN_ALTITUDE_KM,
            max_km: MAX_ALTITUDE_KM,
        });
    }

    // Last row whose base altitude is <= h.
    let idx = ATMOSPHERE_TABLE
        .partition_point(|l| l.base_altitude_km <= altitude_km)
        .saturating_sub(1);
    let l = &ATMOSPHERE_TABLE[idx];

    Ok(l.base_density * (-(altitude_km - l.base_altitude_km) / l.scale_height_km).exp())
}

/// Density with "no atmosphere" above the table top.
///
/// Below the table floor the object is re-entering and the range error is kept.
pub fn density_or_vacuum(altitude_km: f64) -> Result<f64> {
    if altitude_km > MAX_ALTITUDE_KM {
        Ok(0.0)
    } else {
        atmospheric_density(altitude_km)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
