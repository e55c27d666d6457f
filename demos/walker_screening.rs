use std::error::Error;

use chrono::{DateTime, Utc};
use constellation_sim::conjunction::{
    assess_conjunction, evaluate_profiled_screening, get_screening_profile, screen_pairs, PositionCovariance,
};
use constellation_sim::forces::ForceSet;
use constellation_sim::orbital::{generate_sso_band_configs, generate_walker_shell, OrbitalState, ShellConfig};
use constellation_sim::sim::{propagate, PropagationConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let epoch: DateTime<Utc> = "2026-06-01T00:00:00Z".parse()?;

    println!("=== Walker shell vs SSO band: conjunction screening ===\n");

    let shell = ShellConfig {
        altitude_km: 550.0,
        inclination_deg: 53.0,
        num_planes: 3,
        sats_per_plane: 4,
        phase_factor: 1,
        raan_offset_deg: 0.0,
        shell_name: "Walker".into(),
    };
    let mut sats = generate_walker_shell(&shell);
    for band in generate_sso_band_configs(545.0, 555.0, 5.0, 2)? {
        println!(
            "SSO shell {}: {:.1} km at {:.2} deg",
            band.shell_name, band.altitude_km, band.inclination_deg
        );
        sats.extend(generate_walker_shell(&band));
    }
    println!("{} objects\n", sats.len());

    // one orbit at 30 s sampling, shared epochs for every object
    let config = PropagationConfig { step: 30.0, duration: 5_760.0, ..PropagationConfig::default() };
    let forces = ForceSet::j2();
    let trajectories = sats
        .iter()
        .map(|s| -> constellation_sim::Result<(String, Vec<OrbitalState>)> {
            Ok((s.name.clone(), propagate(&s.state_at(epoch), &forces, &config)?))
        })
        .collect::<constellation_sim::Result<Vec<_>>>()?;

    let profile = get_screening_profile("conservative")?;
    let screening = profile.screening_config(&Default::default());
    let pairs = screen_pairs(&trajectories, &screening);

    // ECI 1-sigma: 200 m in x, 1 km in y, 100 m in z
    let cov = PositionCovariance::from_row_slice(&[
        200.0f64.powi(2), 0.0, 0.0, //
        0.0, 1000.0f64.powi(2), 0.0, //
        0.0, 0.0, 100.0f64.powi(2),
    ])?
    .scaled(profile.covariance_scale);

    let mut events = Vec::new();
    for pair in &pairs {
        for ca in pair.result.as_ref().map_err(|e| e.clone())? {
            events.push(assess_conjunction(ca, &cov, &cov, screening.hard_body_radius_m)?);
        }
    }
    let evaluations = events
        .iter()
        .map(|ev| evaluate_profiled_screening(ev.miss_distance_m, ev.collision_probability, profile.profile_id))
        .collect::<constellation_sim::Result<Vec<_>>>()?;

    for (ev, eval) in events.iter().zip(&evaluations) {
        println!(
            "  {} x {}  TCA {}  miss {:>8.1} m  Pc {:.2e}  band [{:.2e}, {:.2e}]{}",
            ev.id_a,
            ev.id_b,
            ev.tca.format("%H:%M:%S"),
            ev.miss_distance_m,
            ev.collision_probability,
            eval.band.lower,
            eval.band.upper,
            if eval.flagged { "  FLAG" } else { "" }
        );
    }

    let flagged = evaluations.iter().filter(|e| e.flagged).count();
    let max_pc = events.iter().map(|e| e.collision_probability).fold(0.0, f64::max);
    println!(
        "\n{} objects, {} pairs, {} conjunctions, {} flagged, max Pc {:.2e}\n",
        trajectories.len(),
        pairs.len(),
        events.len(),
        flagged,
        max_pc
    );

    // records serialize as-is for downstream tooling
    if let Some(first) = events.first() {
        println!("{}", serde_json::to_string_pretty(first)?);
    }
    Ok(())
}
