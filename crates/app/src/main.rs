//! `realtime-demo`: headless runner for the real-time layer.
//!
//! Populates the in-process host with seeded inhabitants, configures a few
//! workplaces, runs the fixed tick for a number of simulated days while
//! logging shift handovers, then saves the session.
//!
//! Environment:
//! - `REALTIME_PARAMS`: JSON params file (defaults otherwise)
//! - `REALTIME_SAVE`: save file path; an existing file is resumed
//! - `REALTIME_SEED`, `REALTIME_DAYS`, `REALTIME_CITIZENS`

mod demo_rng;
mod population;
mod run_config;
mod run_summary;

use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use realtime::game_params::ParamsFile;
use realtime::new_citizen::NewCitizenStats;
use realtime::shifts::{ShiftHandover, ShiftHandoverStats, ShiftStatus};
use realtime::time_of_day::GameClock;
use realtime::RealTimePlugin;
use save::{LoadGameEvent, SaveFilePath, SaveGameEvent, SaveLoadStats, SavePlugin, SaveableAppExt};

use demo_rng::DemoRng;
use run_config::RunConfig;
use run_summary::RunSummary;

fn build_app(config: &RunConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));

    // Read by GameParamsPlugin while it is built.
    if let Some(path) = &config.params_path {
        app.insert_resource(ParamsFile(path.clone()));
    }
    if let Some(path) = &config.save_path {
        app.insert_resource(SaveFilePath(path.clone()));
    }

    app.add_plugins((RealTimePlugin, SavePlugin));
    app.insert_resource(DemoRng::from_seed_u64(config.seed))
        .register_saveable::<DemoRng>()
        .init_resource::<RunSummary>()
        .register_saveable::<RunSummary>();

    app.finish();
    app.cleanup();
    app
}

fn describe(status: ShiftStatus) -> String {
    match status {
        ShiftStatus::Closed => "closed".to_string(),
        ShiftStatus::Open { shift } => format!("shift {}", shift + 1),
    }
}

fn log_handovers(app: &mut App) -> u64 {
    let mut events = app.world_mut().resource_mut::<Events<ShiftHandover>>();
    let mut count = 0;
    for handover in events.drain() {
        info!(
            "{:?} {:02}:00 {}: {} -> {}",
            handover.time.day_of_week,
            handover.time.hour,
            population::workplace_name(handover.building),
            describe(handover.previous),
            describe(handover.current),
        );
        count += 1;
    }
    count
}

/// Run `days` simulated days, one `FixedUpdate` per simulated minute.
fn run_days(app: &mut App, days: u32) -> u64 {
    let mut handovers = 0;
    for _ in 0..days {
        for _ in 0..GameClock::TICKS_PER_HOUR * 24 {
            app.world_mut().run_schedule(FixedUpdate);
            handovers += log_handovers(app);
        }
        info!("{}", app.world().resource::<GameClock>().formatted());
    }
    handovers
}

fn main() -> ExitCode {
    let config = RunConfig::from_env();
    let mut app = build_app(&config);
    info!("Starting realtime-demo with {config:?}");

    let resume = config.save_path.as_ref().is_some_and(|path| path.exists());
    if resume {
        app.world_mut().send_event(LoadGameEvent);
        app.update();
        if app.world().resource::<SaveLoadStats>().loads == 0 {
            error!("Could not resume the saved session");
            return ExitCode::FAILURE;
        }
    } else {
        population::configure_workplaces(app.world_mut());
    }

    let created = population::seed_citizens(app.world_mut(), config.citizens);
    info!("Created {created} citizens");

    let handovers = run_days(&mut app, config.days);

    {
        let stats = app.world().resource::<NewCitizenStats>().clone();
        info!(
            "Demographics: {} assigned, {} age-adjusted, {} rejected",
            stats.assigned, stats.age_adjusted, stats.rejected
        );
        let shifts = app.world().resource::<ShiftHandoverStats>();
        info!("Shift handovers: {} this run, {} in total", handovers, shifts.total);
    }

    let mut summary = app.world_mut().resource_mut::<RunSummary>();
    summary.seed = config.seed;
    summary.runs += 1;
    summary.days_simulated += config.days;
    summary.citizens_created += created;
    summary.handovers += handovers;
    info!("Run summary: {:?}", *summary);

    if config.save_path.is_none() {
        return ExitCode::SUCCESS;
    }
    app.world_mut().send_event(SaveGameEvent);
    app.update();

    let stats = app.world().resource::<SaveLoadStats>();
    if stats.failures > 0 {
        error!("Session was not saved: {}", stats.last_error.as_deref().unwrap_or("unknown error"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
