use std::path::PathBuf;

use bevy::prelude::*;
use realtime::SaveableRegistry;

use crate::save_codec::{load_from_file, reset_world, save_to_file};
use crate::save_error::SaveError;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Where `SaveGameEvent` / `LoadGameEvent` read and write the session.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SaveFilePath(pub PathBuf);

impl Default for SaveFilePath {
    fn default() -> Self {
        Self(PathBuf::from("realtime_session.rtsv"))
    }
}

/// Outcome counters for the save/load/new-session requests of this run.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveLoadStats {
    pub saves: u32,
    pub loads: u32,
    pub resets: u32,
    pub failures: u32,
    pub last_error: Option<String>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Event)]
pub struct SaveGameEvent;

#[derive(Event)]
pub struct LoadGameEvent;

#[derive(Event)]
pub struct NewGameEvent;

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SaveGameEvent>()
            .add_event::<LoadGameEvent>()
            .add_event::<NewGameEvent>()
            .init_resource::<SaveableRegistry>()
            .init_resource::<SaveFilePath>()
            .init_resource::<SaveLoadStats>();

        // File I/O happens here, outside the FixedUpdate tick.
        app.add_systems(PostUpdate, exclusive_save_load);
    }
}

/// Take all pending events of type `E`, returning whether there were any.
fn take_events<E: Event>(world: &mut World) -> bool {
    world
        .get_resource_mut::<Events<E>>()
        .is_some_and(|mut events| events.drain().count() > 0)
}

/// Handles at most one request of each kind per frame, in the order
/// new session, load, save.
pub(crate) fn exclusive_save_load(world: &mut World) {
    let new_game = take_events::<NewGameEvent>(world);
    let load = take_events::<LoadGameEvent>(world);
    let save = take_events::<SaveGameEvent>(world);
    if !(new_game || load || save) {
        return;
    }

    let path = world.resource::<SaveFilePath>().0.clone();

    if new_game {
        let outcome = reset_world(world).inspect(|_| info!("Started a new session"));
        record(world, "New session", outcome, |stats| stats.resets += 1);
    }

    if load {
        let outcome = load_from_file(world, &path).map(|save| {
            info!(
                "Loaded session from {} ({} extensions, v{})",
                path.display(),
                save.extensions.len(),
                save.version
            );
        });
        record(world, "Load", outcome, |stats| stats.loads += 1);
    }

    if save {
        let outcome = save_to_file(world, &path).map(|bytes| {
            info!("Saved session to {} ({} bytes)", path.display(), bytes);
        });
        record(world, "Save", outcome, |stats| stats.saves += 1);
    }
}

fn record(
    world: &mut World,
    what: &str,
    result: Result<(), SaveError>,
    on_success: impl FnOnce(&mut SaveLoadStats),
) {
    let mut stats = world.resource_mut::<SaveLoadStats>();
    match result {
        Ok(()) => on_success(&mut *stats),
        Err(e) => {
            error!("{what} failed: {e}");
            stats.failures += 1;
            stats.last_error = Some(e.to_string());
        }
    }
}
