use std::error::Error;

use chrono::{DateTime, Utc};
use constellation_sim::constants::R_EARTH_MEAN;
use constellation_sim::lifetime::{compute_orbit_lifetime, LifetimeConfig};
use constellation_sim::orbital::{deorbit_delta_v, sso_inclination};
use constellation_sim::physics::DragConfig;
use constellation_sim::station_keeping::{compute_station_keeping_budget, j2_raan_rate, StationKeepingConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let epoch: DateTime<Utc> = "2026-01-01T00:00:00Z".parse()?;
    let drag = DragConfig::new(2.2, 4.0, 150.0)?; // 150 kg smallsat

    println!("=== Orbit lifetime and station-keeping budget ===\n");
    println!("Ballistic coefficient: {:.1} kg/m^2\n", drag.ballistic_coefficient());

    let lifetime_cfg = LifetimeConfig { max_years: 50.0, ..LifetimeConfig::default() };
    let sk_cfg = StationKeepingConfig { initial_mass_kg: 150.0, ..StationKeepingConfig::default() };

    println!(
        "{:>8}  {:>10}  {:>10}  {:>12}  {:>10}  {:>10}  {:>9}",
        "alt(km)", "SSO inc", "life(yr)", "decay(km/yr)", "drag dV/yr", "deorbit dV", "prop(kg)"
    );
    println!("{}", "-".repeat(82));

    for alt_km in [300.0, 400.0, 500.0, 600.0, 700.0, 800.0] {
        let a = R_EARTH_MEAN + alt_km * 1000.0;
        let inc = sso_inclination(alt_km)?;
        let life = compute_orbit_lifetime(a, 0.0, &drag, epoch, &lifetime_cfg)?;
        let budget = compute_station_keeping_budget(a, inc, &drag, &sk_cfg)?;
        let life_str = if life.reentered {
            format!("{:.2}", life.lifetime_years())
        } else {
            format!(">{:.0}", lifetime_cfg.max_years)
        };
        println!(
            "{:>8.0}  {:>10.3}  {:>10}  {:>12.2}  {:>10.2}  {:>10.1}  {:>9.2}",
            alt_km,
            inc.to_degrees(),
            life_str,
            budget.altitude_loss_per_year_km,
            budget.drag_dv_per_year,
            budget.deorbit_dv,
            budget.propellant_mass_kg
        );
    }
    println!();

    // nodal regression check at 550 km
    let a = R_EARTH_MEAN + 550_000.0;
    let rate = j2_raan_rate(a, 0.0, sso_inclination(550.0)?);
    println!(
        "SSO nodal rate at 550 km: {:.4} deg/day (Sun: 0.9856)",
        rate.to_degrees() * 86_400.0
    );
    println!("Direct deorbit from 550 km to 50 km perigee: {:.1} m/s\n", deorbit_delta_v(a, 50.0)?);

    println!("Decay from 350 km:");
    let life = compute_orbit_lifetime(R_EARTH_MEAN + 350_000.0, 0.0, &drag, epoch, &lifetime_cfg)?;
    let every = (life.curve.len() / 12).max(1);
    for (k, p) in life.curve.iter().enumerate() {
        if k % every == 0 || k + 1 == life.curve.len() {
            println!("  {}  {:>7.1} d  {:>7.2} km", p.epoch.format("%Y-%m-%d"), p.elapsed_s / 86_400.0, p.altitude_km);
        }
    }
    Ok(())
}
