use chrono::{DateTime, TimeZone, Utc};
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};

use constellation_sim::conjunction::{screen_pair, ScreeningConfig};
use constellation_sim::constants::{R_EARTH_MEAN, SECONDS_PER_YEAR};
use constellation_sim::epoch::seconds_between;
use constellation_sim::forces::ForceSet;
use constellation_sim::lifetime::{compute_orbit_lifetime, LifetimeConfig, OrbitLifetime};
use constellation_sim::orbital::{
    compute_ground_track, generate_walker_shell, GroundTrackPoint, OrbitalElements, OrbitalState, ShellConfig,
};
use constellation_sim::physics::DragConfig;
use constellation_sim::sim::{propagate, PropagationConfig};

fn main() -> eframe::Result {
    env_logger::init();
    let app = match SimViz::load() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Constellation Analysis", options, Box::new(|_| Ok(Box::new(app))))
}

struct SimViz {
    shell: ShellConfig,
    lifetime: OrbitLifetime,
    track: Vec<GroundTrackPoint>,
    drag_run: Vec<OrbitalState>,
    range: Vec<[f64; 2]>, // minutes, km
    closest: Option<(DateTime<Utc>, f64)>,
}

impl SimViz {
    fn load() -> constellation_sim::Result<Self> {
        let epoch = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).single().unwrap_or_default();
        let shell = ShellConfig {
            altitude_km: 550.0,
            inclination_deg: 53.0,
            num_planes: 6,
            sats_per_plane: 8,
            phase_factor: 1,
            raan_offset_deg: 0.0,
            shell_name: "Meridian".into(),
        };
        let drag = DragConfig::new(2.2, 10.0, 260.0)?;
        let a = R_EARTH_MEAN + shell.altitude_km * 1000.0;
        let lifetime = compute_orbit_lifetime(a, 0.0, &drag, epoch, &LifetimeConfig::default())?;

        let sats = generate_walker_shell(&shell);
        let track = match sats.first() {
            Some(sat) => compute_ground_track(sat, epoch, 3.0 * 5_700.0, 30.0)?,
            None => Vec::new(),
        };

        // low, draggy orbit for one day
        let low = OrbitalElements::circular(300_000.0, shell.inclination_deg.to_radians(), 0.0, 0.0, epoch).to_state()?;
        let day = PropagationConfig { step: 120.0, duration: 86_400.0, ..PropagationConfig::default() };
        let drag_run = propagate(&low, &ForceSet::leo(drag), &day)?;

        // range between two satellites in neighbouring planes over two orbits
        let orbit = PropagationConfig { step: 30.0, duration: 2.0 * 5_700.0, ..PropagationConfig::default() };
        let (mut range, mut closest) = (Vec::new(), None);
        if let (Some(s1), Some(s2)) = (sats.first(), sats.iter().find(|s| s.plane_index == 1)) {
            let t1 = propagate(&s1.state_at(epoch), &ForceSet::two_body(), &orbit)?;
            let t2 = propagate(&s2.state_at(epoch), &ForceSet::two_body(), &orbit)?;
            range = t1
                .iter()
                .zip(&t2)
                .map(|(x, y)| [seconds_between(epoch, x.epoch) / 60.0, (y.pos - x.pos).norm() / 1000.0])
                .collect();
            let cfg = ScreeningConfig { threshold_m: 5.0e6, ..ScreeningConfig::default() };
            closest = screen_pair(&s1.name, &t1, &s2.name, &t2, &cfg)?
                .into_iter()
                .min_by(|p, q| p.miss_distance_m.total_cmp(&q.miss_distance_m))
                .map(|ca| (ca.tca, ca.miss_distance_m));
        }

        Ok(Self { shell, lifetime, track, drag_run, range, closest })
    }
}

impl eframe::App for SimViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Shell: {}", self.shell.shell_name));
            let closest = match self.closest {
                Some((tca, miss)) => format!("{:.1} km at {}", miss / 1000.0, tca.format("%H:%M:%S")),
                None => "none".into(),
            };
            ui.label(format!(
                "{:.0} km / {:.1} deg  |  {} x {} sats  |  Lifetime: {:.1} yr  |  Closest in-shell approach: {}",
                self.shell.altitude_km,
                self.shell.inclination_deg,
                self.shell.num_planes,
                self.shell.sats_per_plane,
                self.lifetime.lifetime_years(),
                closest,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Decay curve
                ui.vertical(|ui| {
                    ui.label("Altitude decay (km)");
                    let points: PlotPoints = self
                        .lifetime
                        .curve
                        .iter()
                        .map(|p| [p.elapsed_s / SECONDS_PER_YEAR, p.altitude_km])
                        .collect();
                    Plot::new("decay")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (yr)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", points));
                        });
                });

                // Ground track
                ui.vertical(|ui| {
                    ui.label("Ground track (deg)");
                    let points: PlotPoints = self.track.iter().map(|p| [p.lon_deg, p.lat_deg]).collect();
                    Plot::new("ground_track")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Longitude (deg)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.points(Points::new("Sub-satellite point", points).radius(1.5));
                        });
                });
            });

            ui.horizontal(|ui| {
                // Range history
                ui.vertical(|ui| {
                    ui.label("Inter-plane range (km)");
                    let points: PlotPoints = self.range.iter().copied().collect();
                    Plot::new("range")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (min)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Range", points));
                        });
                });

                // Drag run
                ui.vertical(|ui| {
                    ui.label("300 km altitude under J2 + drag (km)");
                    let t0 = self.drag_run.first().map(|s| s.epoch);
                    let points: PlotPoints = self
                        .drag_run
                        .iter()
                        .map(|s| {
                            let t = t0.map_or(0.0, |t0| seconds_between(t0, s.epoch)) / 3600.0;
                            [t, s.altitude() / 1000.0]
                        })
                        .collect();
                    Plot::new("drag_run")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (h)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", points));
                        });
                });
            });
        });
    }
}
