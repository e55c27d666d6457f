use std::error::Error;

use chrono::{DateTime, Utc};
use constellation_sim::forces::{compose_forces, DeSitter, ForceModel, ForceSet, LenseThirring, Schwarzschild, TwoBodyGravity};
use constellation_sim::orbital::OrbitalElements;
use constellation_sim::sim::{propagate, PropagationConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let epoch: DateTime<Utc> = "2026-01-01T00:00:00Z".parse()?;

    println!("=== Relativistic accelerations by regime ===\n");
    println!(
        "{:>10}  {:>14}  {:>14}  {:>14}  {:>10}",
        "alt (km)", "schwarzschild", "lense_thirring", "de_sitter", "ordered"
    );

    let models: Vec<Box<dyn ForceModel>> = vec![
        Box::new(TwoBodyGravity),
        Box::new(Schwarzschild),
        Box::new(LenseThirring),
        Box::new(DeSitter),
    ];
    for (alt_km, inc_deg) in [(550.0, 53.0), (20_200.0, 55.0), (35_786.0, 0.1)] {
        let s = OrbitalElements::circular(alt_km * 1000.0, f64::to_radians(inc_deg), 0.0, 0.3, epoch).to_state()?;
        let comp = compose_forces(&models, epoch, &s.pos, &s.vel)?;
        let mag = |name: &str| {
            comp.contributions
                .iter()
                .find(|(n, _)| *n == name)
                .map_or(0.0, |(_, a)| a.norm())
        };
        println!(
            "{:>10.0}  {:>14.3e}  {:>14.3e}  {:>14.3e}  {:>10}",
            alt_km,
            mag("schwarzschild"),
            mag("lense_thirring"),
            mag("de_sitter"),
            comp.is_order_independent
        );
    }
    println!();

    println!("=== One-day position offset from post-Newtonian terms (550 km) ===\n");
    let s0 = OrbitalElements::circular(550_000.0, 53f64.to_radians(), 0.0, 0.0, epoch).to_state()?;
    let config = PropagationConfig { step: 600.0, duration: 86_400.0, rtol: 1e-12, atol: 1e-6, ..PropagationConfig::default() };

    let newtonian = propagate(&s0, &ForceSet::two_body(), &config)?;
    let relativistic = ForceSet::builder()
        .with(TwoBodyGravity)
        .with(Schwarzschild)
        .with(LenseThirring)
        .with(DeSitter)
        .build();
    let gr = propagate(&s0, &relativistic, &config)?;

    for (k, (a, b)) in newtonian.iter().zip(&gr).enumerate().step_by(24) {
        println!(
            "  t = {:>6.1} h   |dr| = {:>8.3} m",
            k as f64 * config.step / 3600.0,
            (b.pos - a.pos).norm()
        );
    }
    Ok(())
}
