mod autopilot;
mod config;
mod demo;

use std::{env, ffi::OsStr, path::Path};

use engine::EngineError;
use engine::device::SimulatedDevice;
use engine::frame::{FrameClock, IntervalClock, VCountClock};
use engine::game::{FrameEvent, Game, World};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::autopilot::{Autopilot, DEMO_SCRIPT};
use crate::config::RunnerConfig;

fn main() {
    let path = env::args().nth(1);
    let config = match RunnerConfig::load(path.as_deref().map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Keeps the file writer flushing until main returns.
    let _guard = setup_logging(config.log_file.as_deref());
    info!("wanderer v0.1.0");

    let world = match demo::world(&config.game) {
        Ok(world) => world,
        Err(e) => {
            error!("demo assets: {e}");
            std::process::exit(2);
        }
    };

    let result = if config.realtime {
        play(IntervalClock::new(IntervalClock::GBA_FRAME), world, &config)
    } else {
        let clock = VCountClock::new(config.game.throttle_iterations);
        play(clock, world, &config)
    };

    match result {
        Ok(summary) => summary.log(),
        Err(e) => {
            error!("{e}");
            std::process::exit(3);
        }
    }
}

fn setup_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
        return None;
    };

    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_else(|| OsStr::new("wanderer.log"));
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

/// Frame counts per kind of [`FrameEvent`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Summary {
    frames: u64,
    idle: u64,
    walked: u64,
    scrolled: u64,
    blocked: u64,
    interactions: u64,
    map_changes: u64,
    final_map: usize,
    scroll: (i32, i32),
    position: (i32, i32),
}

impl Summary {
    const fn record(&mut self, event: FrameEvent) {
        self.frames += 1;
        match event {
            FrameEvent::Idle => self.idle += 1,
            FrameEvent::Walked(_) => self.walked += 1,
            FrameEvent::Scrolled(_) => self.scrolled += 1,
            FrameEvent::Blocked(_) => self.blocked += 1,
            FrameEvent::UnhandledInteraction { .. } => self.interactions += 1,
            FrameEvent::MapChanged { .. } => self.map_changes += 1,
        }
    }

    fn log(&self) {
        info!(
            "{} frames: {} idle, {} walked, {} scrolled, {} blocked, {} interactions, {} map changes",
            self.frames,
            self.idle,
            self.walked,
            self.scrolled,
            self.blocked,
            self.interactions,
            self.map_changes
        );
        info!(
            "ended on map {} at {:?} with scroll {:?}",
            self.final_map, self.position, self.scroll
        );
    }
}

/// Runs the demo world on the simulated console under the autopilot.
fn play<C: FrameClock>(
    clock: C,
    world: World,
    config: &RunnerConfig,
) -> Result<Summary, EngineError> {
    let mut game = Game::new(SimulatedDevice::new(), clock, world, config.game.clone())?;
    let mut autopilot = Autopilot::new(&DEMO_SCRIPT);
    let mut summary = Summary::default();

    for _ in 0..config.frames {
        autopilot.apply(game.device_mut());
        let report = game.run_frame()?;
        summary.record(report.event);
    }

    summary.final_map = game.current_map();
    summary.scroll = game.scroll();
    summary.position = game.character().position();
    Ok(summary)
}
