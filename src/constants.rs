// ---------------------------------------------------------------------------
// Earth
// ---------------------------------------------------------------------------

pub const MU_EARTH: f64 = 3.986_004_418e14; // m^3/s^2
pub const R_EARTH_MEAN: f64 = 6_371_000.0; // mean radius, m (altitude reference)
pub const R_EARTH_EQUATORIAL: f64 = 6_378_137.0; // WGS84 equatorial radius, m
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
pub const J2_EARTH: f64 = 1.082_63e-3;
pub const OMEGA_EARTH: f64 = 7.292_115_9e-5; // sidereal rotation rate, rad/s

/// Mean nodal rate a sun-synchronous plane must follow, rad/s.
pub const SSO_NODAL_RATE: f64 = 1.99e-7;

/// Earth's angular momentum per unit mass (IERS 2010), m^2/s.
pub const EARTH_ANGULAR_MOMENTUM: f64 = 9.8e8;

// ---------------------------------------------------------------------------
// Sun, light, propulsion
// ---------------------------------------------------------------------------

pub const GM_SUN: f64 = 1.327_124_400_18e20; // m^3/s^2
pub const C_LIGHT: f64 = 299_792_458.0; // m/s
pub const AU: f64 = 1.495_978_707e11; // m
pub const G0: f64 = 9.80665; // standard gravity, m/s^2

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;
pub const JD_J2000: f64 = 2_451_545.0;
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;
