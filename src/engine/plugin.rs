use bevy::prelude::*;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::constants::BALANCE_TICK_SECS;
use crate::discs::DiscId;
use crate::embedding::FixedVectorProvider;
use crate::engine::config::SessionConfig;
use crate::engine::session::GameSession;
use crate::physics::{DiscContact, DiscFell, DiscLanded, DiscPositionSync};

/// Session specialization used by the bevy app and the FFI bridge.
pub type LexiconSession = GameSession<FixedVectorProvider>;

/// Default lexicon location when running the core standalone.
pub const LEXICON_PATH: &str = "config/lexicon.ron";

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        let provider = match FixedVectorProvider::load(Path::new(LEXICON_PATH)) {
            Ok(provider) => provider,
            Err(err) => {
                warn!("No usable lexicon at {LEXICON_PATH} ({err}); all drops will be rejected");
                FixedVectorProvider::default()
            }
        };
        let session = GameSession::new(provider, SessionConfig::default());

        app.insert_resource(SessionResource(Arc::new(RwLock::new(session))))
            .insert_resource(BalanceTickTimer(Timer::from_seconds(
                BALANCE_TICK_SECS,
                TimerMode::Repeating,
            )))
            .add_event::<WordDropRequested>()
            .add_event::<DiscSpawned>()
            .add_event::<BoardTiltUpdated>()
            .add_systems(
                Update,
                (process_drop_requests, apply_disc_lifecycle, balance_tick)
                    .chain(),
            );
    }
}

/// Shared handle so FFI calls and bevy systems serialize on one writer.
#[derive(Resource)]
pub struct SessionResource(pub Arc<RwLock<LexiconSession>>);

#[derive(Resource)]
struct BalanceTickTimer(Timer);

/// A typed (or handwritten, already recognized) word arriving from input.
#[derive(Event, Debug, Clone)]
pub struct WordDropRequested {
    pub word: String,
}

/// An accepted drop; the physics layer spawns a body for it.
#[derive(Event, Debug, Clone, Copy)]
pub struct DiscSpawned {
    pub id: DiscId,
    /// Board-plane offset where the body enters the world.
    pub spawn_position: Vec2,
}

/// Fresh tilt angles for the kinematic board body, radians.
#[derive(Event, Debug, Clone, Copy)]
pub struct BoardTiltUpdated {
    pub pitch: f32,
    pub roll: f32,
}

fn process_drop_requests(
    session: Res<SessionResource>,
    mut requests: EventReader<WordDropRequested>,
    mut spawned: EventWriter<DiscSpawned>,
) {
    if requests.is_empty() {
        return;
    }
    let Ok(mut session) = session.0.write() else {
        return;
    };
    for request in requests.read() {
        match session.drop_word(&request.word) {
            Ok(drop) => {
                spawned.send(DiscSpawned {
                    id: drop.id,
                    spawn_position: drop.spawn_position,
                });
            }
            Err(rejection) => {
                debug!(word = request.word.as_str(), reason = rejection.as_str(), "drop rejected");
            }
        }
    }
}

/// Drain physics lifecycle events into the session on the app's single
/// writer. Falls are applied before position syncs so a fallen disc cannot
/// re-enter the feed within the same frame.
fn apply_disc_lifecycle(
    session: Res<SessionResource>,
    mut fell: EventReader<DiscFell>,
    mut landed: EventReader<DiscLanded>,
    mut contacts: EventReader<DiscContact>,
    mut positions: EventReader<DiscPositionSync>,
) {
    if fell.is_empty() && landed.is_empty() && contacts.is_empty() && positions.is_empty() {
        return;
    }
    let Ok(mut session) = session.0.write() else {
        return;
    };
    for event in fell.read() {
        session.notify_fell(event.id);
    }
    for event in landed.read() {
        session.notify_landed(event.id);
    }
    for event in contacts.read() {
        session.notify_contact(event.a, event.b);
    }
    for event in positions.read() {
        session.update_disc_position(event.id, event.position);
    }
}

fn balance_tick(
    time: Res<Time>,
    mut timer: ResMut<BalanceTickTimer>,
    session: Res<SessionResource>,
    mut tilt: EventWriter<BoardTiltUpdated>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    let Ok(mut session) = session.0.write() else {
        return;
    };
    let frame = session.tick();
    tilt.send(BoardTiltUpdated {
        pitch: frame.pitch,
        roll: frame.roll,
    });
}
