use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use constellation_sim::conjunction::{
    assess_conjunction, evaluate_profiled_screening, get_screening_profile, screen_pairs, BPlaneGeometry,
    PositionCovariance,
};
use constellation_sim::constants::{R_EARTH_MEAN, SECONDS_PER_DAY};
use constellation_sim::forces::ForceSet;
use constellation_sim::lifetime::compute_orbit_lifetime;
use constellation_sim::observation::{compute_access_windows, GroundStation};
use constellation_sim::orbital::{generate_walker_shell, OrbitalElements, OrbitalState, ShellConfig};
use constellation_sim::physics::DragConfig;
use constellation_sim::sim::{propagate, propagate_with_events, EventDetector, EventKind, NodeDetector, PropagationConfig};
use constellation_sim::station_keeping::compute_station_keeping_budget;
use constellation_sim::EngineConfig;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn StdError>> {
    let epoch: DateTime<Utc> = "2026-03-20T00:00:00Z".parse()?;
    let config = EngineConfig::default();
    config.validate()?;

    // -----------------------------------------------------------------------
    // Constellation: "Meridian" 550 km Walker shell
    // -----------------------------------------------------------------------
    let shell = ShellConfig {
        altitude_km: 550.0,
        inclination_deg: 53.0,
        num_planes: 6,
        sats_per_plane: 8,
        phase_factor: 1,
        raan_offset_deg: 0.0,
        shell_name: "Meridian".into(),
    };
    let sats = generate_walker_shell(&shell);
    let drag = DragConfig::new(2.2, 10.0, 260.0)?; // flat-panel bus

    let a = R_EARTH_MEAN + shell.altitude_km * 1000.0;
    let inc = shell.inclination_deg.to_radians();
    let lead = sats.first().ok_or("empty shell")?.state_at(epoch);
    let lead_elements = OrbitalElements::from_state(&lead);

    // -----------------------------------------------------------------------
    // Propagation (J2, one day)
    // -----------------------------------------------------------------------
    let prop_cfg = PropagationConfig { duration: SECONDS_PER_DAY, ..config.propagation };
    let mut detectors: Vec<Box<dyn EventDetector>> = vec![Box::new(NodeDetector)];
    let run_j2 = propagate_with_events(&lead, &ForceSet::j2(), &prop_cfg, &mut detectors)?;
    let last = run_j2.trajectory.last().ok_or("empty trajectory")?;
    let end_elements = OrbitalElements::from_state(last);
    let raan_drift_deg = (end_elements.raan - lead_elements.raan).to_degrees();
    let ascending = run_j2.events.iter().filter(|e| e.kind == EventKind::AscendingNode).count();

    let two_body = propagate(&lead, &ForceSet::two_body(), &prop_cfg)?;
    let energy_drift = two_body
        .last()
        .map(|s| (s.specific_energy() - lead.specific_energy()) / lead.specific_energy().abs())
        .unwrap_or(0.0);

    // -----------------------------------------------------------------------
    // Lifetime and station keeping
    // -----------------------------------------------------------------------
    let lifetime = compute_orbit_lifetime(a, 0.0, &drag, epoch, &config.lifetime)?;
    let budget = compute_station_keeping_budget(a, inc, &drag, &config.station_keeping)?;

    // -----------------------------------------------------------------------
    // Conjunction screening: shell plane 1 against a crossing SSO object
    // -----------------------------------------------------------------------
    let screen_cfg = PropagationConfig { step: 30.0, duration: 6000.0, ..config.propagation };
    let t_cross = 1800.0;
    let debris_probe = OrbitalElements::circular(550_500.0, 97.6f64.to_radians(), 0.0, 0.0, epoch);
    let debris = OrbitalElements {
        true_anom: -debris_probe.mean_motion() * t_cross,
        ..debris_probe
    }
    .to_state()?;
    let lead_probe = OrbitalElements::circular(shell.altitude_km * 1000.0, inc, 0.0, 0.0, epoch);
    let target = OrbitalElements {
        true_anom: -lead_probe.mean_motion() * t_cross,
        ..lead_probe
    }
    .to_state()?;

    let mut objects: Vec<(String, Vec<OrbitalState>)> = Vec::new();
    objects.push(("Meridian-Target".into(), propagate(&target, &ForceSet::two_body(), &screen_cfg)?));
    objects.push(("SSO-Debris".into(), propagate(&debris, &ForceSet::two_body(), &screen_cfg)?));
    for sat in sats.iter().filter(|s| s.plane_index == 1) {
        let traj = propagate(&sat.state_at(epoch), &ForceSet::two_body(), &screen_cfg)?;
        objects.push((sat.name.clone(), traj));
    }

    let profile = get_screening_profile("nominal")?;
    let results = screen_pairs(&objects, &profile.screening_config(&config.screening));
    let cov = PositionCovariance::from_row_slice(&[
        40_000.0, 0.0, 0.0, //
        0.0, 250_000.0, 0.0, //
        0.0, 0.0, 10_000.0,
    ])?;

    let mut events = Vec::new();
    for pair in &results {
        match &pair.result {
            Ok(approaches) => {
                for ca in approaches {
                    events.push(assess_conjunction(ca, &cov, &cov, config.screening.hard_body_radius_m)?);
                }
            }
            Err(e) => log::warn!("{} x {}: {}", pair.id_a, pair.id_b, e),
        }
    }

    // -----------------------------------------------------------------------
    // Ground station passes
    // -----------------------------------------------------------------------
    let station = GroundStation::new("Madrid", 40.43, -4.25);
    let windows = compute_access_windows(&run_j2.trajectory, &station);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  CONSTELLATION MISSION ANALYSIS — {}", shell.shell_name);
    println!("====================================================================");
    println!();
    println!("  Shell Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Altitude:      {:>8.1} km    Inclination:  {:>8.2} deg",
        shell.altitude_km, shell.inclination_deg
    );
    println!(
        "  Planes:        {:>8}       Sats/plane:   {:>8}",
        shell.num_planes, shell.sats_per_plane
    );
    println!(
        "  Total sats:    {:>8}       Phasing F:    {:>8}",
        sats.len(),
        shell.phase_factor
    );
    println!(
        "  Period:        {:>8.1} min   Velocity:     {:>8.1} m/s",
        lead_elements.period() / 60.0,
        lead.speed()
    );
    println!(
        "  Ballistic:     {:>8.1} kg/m^2",
        drag.ballistic_coefficient()
    );
    println!();

    println!("  Propagation (one day)");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Integrator:    {:>16}   Samples:     {:>8}",
        prop_cfg.integrator,
        run_j2.trajectory.len()
    );
    println!(
        "  RAAN drift:    {:>8.3} deg/day   Ascending nodes: {:>4}",
        raan_drift_deg, ascending
    );
    println!("  Two-body energy drift: {:.2e} (relative)", energy_drift);
    println!();

    println!("  Lifetime & Station Keeping");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Lifetime:      {:>8.2} yr    {}",
        lifetime.lifetime_years(),
        if lifetime.reentered { "re-entry" } else { "horizon reached" }
    );
    println!(
        "  Decay:         {:>8.2} km/yr Drag dV:      {:>8.2} m/s/yr",
        budget.altitude_loss_per_year_km, budget.drag_dv_per_year
    );
    println!(
        "  Deorbit dV:    {:>8.1} m/s   Total dV:     {:>8.1} m/s",
        budget.deorbit_dv, budget.total_dv
    );
    println!(
        "  Propellant:    {:>8.2} kg    ({} yr mission, Isp {:.0} s)",
        budget.propellant_mass_kg, config.station_keeping.mission_years, config.station_keeping.isp_s
    );
    println!();

    println!("  Conjunctions ({} profile {}, {:.0} km)", profile.profile_id, profile.version, profile.threshold_m / 1000.0);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:<22}  {:<22}  {:>9}  {:>10}  {:>5}",
        "object A", "object B", "miss (m)", "Pc", "flag"
    );
    println!("  {}", "─".repeat(74));
    for ev in &events {
        let screening = evaluate_profiled_screening(ev.miss_distance_m, ev.collision_probability, profile.profile_id)?;
        println!(
            "  {:<22}  {:<22}  {:>9.1}  {:>10.3e}  {:>5}",
            ev.id_a,
            ev.id_b,
            ev.miss_distance_m,
            ev.collision_probability,
            if screening.flagged { "YES" } else { "no" }
        );
        if let BPlaneGeometry::Defined(bp) = &ev.b_plane {
            println!(
                "  {:>24} TCA {}  B = ({:.1}, {:.1}) m  |dv| = {:.0} m/s",
                "",
                ev.tca.format("%H:%M:%S%.3f"),
                bp.along_track_m,
                bp.cross_track_m,
                bp.relative_speed
            );
        }
    }
    if events.is_empty() {
        println!("  none within threshold");
    }
    println!();

    println!("  Passes over {} ({:.2}, {:.2})", station.name, station.lat_deg, station.lon_deg);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  {:>10}  {:>10}  {:>8}  {:>8}", "rise", "set", "dur (s)", "max el");
    for w in &windows {
        println!(
            "  {:>10}  {:>10}  {:>8.0}  {:>8.1}",
            w.rise.format("%H:%M:%S"),
            w.set.format("%H:%M:%S"),
            w.duration_s(),
            w.max_elevation_deg
        );
    }
    println!();
    println!("  Screening: {} objects, {} pairs", objects.len(), results.len());
    println!("====================================================================");
    println!();

    Ok(())
}
