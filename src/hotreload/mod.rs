//! Hot-reload of Tuning Values
//!
//! Provides file-watching and automatic reload of config/tuning.ron:
//! - Uses `notify` crate for filesystem events
//! - Validation before applying (range checks on every tunable)
//! - Rollback on invalid content: the live session keeps its last good
//!   tuning and the failure is recorded
//!
//! Tuning covers the user-editable settings: projection clamp/spread/scale,
//! candidate pool, and all balance constants.

use bevy::prelude::*;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::engine::config::Tuning;
use crate::engine::plugin::SessionResource;

/// File watched relative to the working directory.
pub const TUNING_PATH: &str = "config/tuning.ron";

pub struct HotReloadPlugin;

impl Plugin for HotReloadPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(HotReloadState::default())
            .add_event::<TuningReloadEvent>()
            .add_systems(Startup, setup_tuning_watcher)
            .add_systems(Update, process_tuning_changes);
    }
}

/// Hot-reload state tracking
#[derive(Resource, Default)]
pub struct HotReloadState {
    pub enabled: bool,
    pub watched_file: Option<PathBuf>,
    pub reload_count: u32,
    pub last_reload_success: bool,
    pub last_error: Option<String>,
}

/// Tuning reload event
#[derive(Event, Debug, Clone)]
pub struct TuningReloadEvent {
    pub path: PathBuf,
    pub success: bool,
    pub error: Option<String>,
}

/// Global watcher holder (shared across Bevy systems)
#[derive(Resource)]
struct WatcherResource {
    _watcher: RecommendedWatcher,
    receiver: Arc<Mutex<Receiver<notify::Result<Event>>>>,
}

/// Initialize file watcher for config/tuning.ron
fn setup_tuning_watcher(mut commands: Commands, mut state: ResMut<HotReloadState>) {
    let tuning_path = PathBuf::from(TUNING_PATH);

    if !tuning_path.exists() {
        warn!("Tuning file not found: {:?}", tuning_path);
        state.enabled = false;
        return;
    }

    let (tx, rx): (
        Sender<notify::Result<Event>>,
        Receiver<notify::Result<Event>>,
    ) = channel();

    let mut watcher = match notify::recommended_watcher(tx) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create file watcher: {}", e);
            state.enabled = false;
            return;
        }
    };

    if let Err(e) = watcher.watch(tuning_path.parent().unwrap(), RecursiveMode::NonRecursive) {
        error!("Failed to watch tuning directory: {}", e);
        state.enabled = false;
        return;
    }

    state.enabled = true;
    state.watched_file = Some(tuning_path.clone());

    commands.insert_resource(WatcherResource {
        _watcher: watcher,
        receiver: Arc::new(Mutex::new(rx)),
    });

    info!("Hot-reload enabled for {:?}", tuning_path);
}

/// Process filesystem events, reload and apply tuning
fn process_tuning_changes(
    watcher: Option<Res<WatcherResource>>,
    mut state: ResMut<HotReloadState>,
    mut events: EventWriter<TuningReloadEvent>,
    session: Option<Res<SessionResource>>,
) {
    let Some(watcher) = watcher else {
        return;
    };

    let receiver = watcher.receiver.lock().unwrap();

    // Process all pending events
    while let Ok(result) = receiver.try_recv() {
        match result {
            Ok(event) => {
                if !is_tuning_modify_event(&event, &state.watched_file) {
                    continue;
                }
                info!("Tuning file modified, reloading...");

                match load_tuning(TUNING_PATH) {
                    Ok(tuning) => {
                        if let Some(session) = session.as_ref() {
                            if let Ok(mut session) = session.0.write() {
                                session.apply_tuning(tuning);
                            }
                        }
                        state.reload_count += 1;
                        state.last_reload_success = true;
                        state.last_error = None;

                        events.send(TuningReloadEvent {
                            path: state.watched_file.clone().unwrap(),
                            success: true,
                            error: None,
                        });

                        info!("Tuning reloaded successfully (count: {})", state.reload_count);
                    }
                    Err(e) => {
                        // Rollback: the session keeps its last good tuning.
                        state.last_reload_success = false;
                        state.last_error = Some(e.clone());

                        events.send(TuningReloadEvent {
                            path: state.watched_file.clone().unwrap(),
                            success: false,
                            error: Some(e.clone()),
                        });

                        error!("Tuning reload failed: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!("File watcher error: {}", e);
            }
        }
    }
}

/// Check if event is a modification to the tuning file
fn is_tuning_modify_event(event: &Event, watched_file: &Option<PathBuf>) -> bool {
    if watched_file.is_some() {
        event.paths.iter().any(|p| {
            p.ends_with("tuning.ron")
                && (event.kind.is_modify() || matches!(event.kind, notify::EventKind::Create(_)))
        })
    } else {
        false
    }
}

/// Read, parse, and validate a tuning file
fn load_tuning(path: &str) -> Result<Tuning, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("Read error: {}", e))?;
    let tuning: Tuning = ron::from_str(&content).map_err(|e| format!("RON parse error: {}", e))?;
    tuning.validate().map_err(|e| e.to_string())?;
    Ok(tuning)
}
