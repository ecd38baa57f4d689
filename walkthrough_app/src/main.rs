//! Walkthrough demo application
//!
//! Loads a scene, then replays a scripted input timeline against it with a
//! fixed time step, logging the camera position and frame rate at regular
//! intervals. The camera collides with the scene the whole way.
//!
//! Usage: `walkthrough [config.toml|config.ron]`

use std::path::PathBuf;

use scene_engine::config::{ScriptEvent, ScriptedInput, SimulationConfig};
use scene_engine::foundation::{logging, math::utils};
use scene_engine::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
enum AppError {
    #[error("usage: walkthrough [config.toml|config.ron]")]
    Usage,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Totals gathered over a run
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct RunSummary {
    ticks: u32,
    collided_ticks: u32,
    distance: f32,
}

struct Walkthrough {
    engine: Engine,
    simulation: SimulationConfig,
    script: Vec<ScriptedInput>,
    next_event: usize,
}

impl Walkthrough {
    fn new(engine: Engine, simulation: SimulationConfig) -> Self {
        let script = simulation.sorted_script();
        Self {
            engine,
            simulation,
            script,
            next_event: 0,
        }
    }

    fn to_app_event(event: ScriptEvent) -> AppEvent {
        match event {
            ScriptEvent::Press(key) => AppEvent::Key {
                key,
                action: KeyAction::Press,
            },
            ScriptEvent::Release(key) => AppEvent::Key {
                key,
                action: KeyAction::Release,
            },
            ScriptEvent::Cursor { x, y } => AppEvent::CursorMoved { x, y },
        }
    }

    /// Deliver every scripted event due at simulated time `now`
    fn deliver_events(&mut self, now: f32) {
        while let Some(input) = self.script.get(self.next_event) {
            if input.at > now {
                break;
            }
            log::debug!("t={:.2}s scripted {:?}", now, input.event);
            self.engine.handle_event(Self::to_app_event(input.event));
            self.next_event += 1;
        }
    }

    fn run(&mut self) -> RunSummary {
        let dt = self.simulation.tick_length;
        let mut summary = RunSummary::default();
        let mut timer = Timer::new();
        let mut since_report = 0.0;

        for tick in 0..self.simulation.tick_count {
            if !self.engine.is_running() {
                break;
            }
            self.deliver_events(tick as f32 * dt);

            let report = self.engine.tick(dt);
            timer.update();
            summary.ticks += 1;
            summary.distance += report.step.norm();
            if report.collided {
                summary.collided_ticks += 1;
                if let Some(contact) = report.contact {
                    log::trace!("{:?} contact, normal {:?}", contact.kind, contact.normal);
                }
            }

            since_report += dt;
            if since_report >= self.simulation.report_interval {
                since_report = 0.0;
                let position = report.position;
                log::info!("Position: ({:.3}, {:.3}, {:.3})", position.x, position.y, position.z);
                let camera = self.engine.camera();
                log::debug!(
                    "View: yaw {:.1}°, pitch {:.1}°",
                    utils::rad_to_deg(camera.yaw()),
                    utils::rad_to_deg(camera.pitch())
                );
                log::info!(
                    "FPS: {:.1} simulated, {:.1} computed",
                    self.engine.frame_stats().average_fps(),
                    timer.average_fps()
                );
            }
        }

        summary
    }
}

fn config_path() -> Result<Option<PathBuf>, AppError> {
    let mut args = std::env::args_os().skip(1);
    let path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        return Err(AppError::Usage);
    }
    Ok(path)
}

fn load_config(path: Option<PathBuf>) -> Result<ViewerConfig, AppError> {
    let Some(path) = path else {
        log::info!("No configuration file given, using defaults");
        return Ok(ViewerConfig::default());
    };
    log::info!("Loading configuration from {}", path.display());
    Ok(ViewerConfig::load_from_file(&path)?)
}

fn run() -> Result<(), AppError> {
    let config = load_config(config_path()?)?;
    let engine = Engine::from_config(&config)?;

    log::info!(
        "Running {} ticks of {:.4}s",
        config.simulation.tick_count,
        config.simulation.tick_length
    );
    let mut walkthrough = Walkthrough::new(engine, config.simulation);
    let summary = walkthrough.run();

    let position = walkthrough.engine.camera().position;
    log::info!(
        "Finished after {} ticks: travelled {:.3}, collided on {} ticks, final position ({:.3}, {:.3}, {:.3})",
        summary.ticks,
        summary.distance,
        summary.collided_ticks,
        position.x,
        position.y,
        position.z
    );
    Ok(())
}

fn main() {
    logging::init_with_default_filter("info");
    log::info!("Starting scene walkthrough");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
