//! Game session orchestrator.
//!
//! Thin coordination layer over the core pieces: it owns the disc records,
//! feeds accepted drops into the projector, relays physics lifecycle events
//! into the registry, runs the fixed-cadence balance tick, and keeps the
//! advisory counter-word suggestions fresh. All mutation goes through
//! `&mut self`, so wrapping a session in one lock (or pinning it to one
//! queue) gives the single-writer discipline the contact callbacks need.

use bevy::math::Vec2;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use sha3::{Digest, Sha3_256};
use tracing::debug;

use crate::balance::{BalanceController, BalanceFrame};
use crate::discs::{DiscId, DiscRegistry};
use crate::embedding::EmbeddingProvider;
use crate::engine::config::{SessionConfig, Tuning};
use crate::engine::messages::{BoardSnapshotMsg, DiscMsg, DropResultMsg, SessionCountersMsg};
use crate::projector::{AnchorSet, SemanticCoordinate, SemanticProjector};

/// An accepted drop: the new disc and where it enters the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscDrop {
    pub id: DiscId,
    pub coordinate: SemanticCoordinate,
    /// World-space board-plane offset where the body spawns.
    pub spawn_position: Vec2,
}

/// Why a drop was not accepted. A normal result, not an error: unknown
/// words stay unknown for the lifetime of the embedding model and the core
/// never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    EmptyWord,
    UnknownWord,
}

impl DropRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            DropRejection::EmptyWord => "empty word",
            DropRejection::UnknownWord => "word not in vocabulary",
        }
    }
}

pub struct GameSession<P: EmbeddingProvider> {
    anchors: AnchorSet,
    projector: SemanticProjector<P>,
    balance: BalanceController,
    registry: DiscRegistry,
    counters: SessionCountersMsg,
    suggestions: Vec<String>,
    session_seed: u64,
    tick_interval_secs: f32,
    suggestion_sample: usize,
    suggestion_limit: usize,
    tick_count: u64,
    turn: u64,
    position_scratch: Vec<Vec2>,
}

impl<P: EmbeddingProvider> GameSession<P> {
    pub fn new(provider: P, config: SessionConfig) -> Self {
        let mut session = Self {
            anchors: config.anchors,
            projector: SemanticProjector::new(provider, config.tuning.projection),
            balance: BalanceController::new(config.tuning.balance),
            registry: DiscRegistry::default(),
            counters: SessionCountersMsg::default(),
            suggestions: Vec::new(),
            session_seed: config.session_seed,
            tick_interval_secs: config.tick_interval_secs,
            suggestion_sample: config.suggestion_sample,
            suggestion_limit: config.suggestion_limit,
            tick_count: 0,
            turn: 0,
            position_scratch: Vec::new(),
        };
        session.refresh_suggestions();
        session
    }

    // ---- drops -------------------------------------------------------

    /// Accept or reject a typed word. The word is trimmed and lowercased
    /// here; rejection is the caller's cue to show "word not recognized".
    pub fn drop_word(&mut self, raw_word: &str) -> Result<DiscDrop, DropRejection> {
        let word = raw_word.trim().to_lowercase();
        if word.is_empty() {
            self.counters.drops_rejected += 1;
            return Err(DropRejection::EmptyWord);
        }

        let Some(coordinate) = self.projector.project(&word, &self.anchors) else {
            self.counters.drops_rejected += 1;
            debug!(word = word.as_str(), "drop rejected: unknown word");
            return Err(DropRejection::UnknownWord);
        };

        let spawn_position = coordinate.as_vec2()
            * self.projector.config().position_scale
            * self.balance.config().board_half_extent;
        let id = self.registry.spawn(word, coordinate, spawn_position);
        self.counters.drops_accepted += 1;
        self.turn += 1;
        self.refresh_suggestions();

        Ok(DiscDrop {
            id,
            coordinate,
            spawn_position,
        })
    }

    // ---- physics lifecycle -------------------------------------------

    /// First contact with the board.
    pub fn notify_landed(&mut self, id: DiscId) -> bool {
        self.registry.mark_landed(id)
    }

    /// Disc-to-disc contact; grounded status is copied transitively.
    pub fn notify_contact(&mut self, a: DiscId, b: DiscId) -> Option<DiscId> {
        self.registry.promote_on_contact(a, b)
    }

    /// The body left the board region. Removal is immediate so the next
    /// tick's center of mass no longer includes it; duplicates are no-ops.
    pub fn notify_fell(&mut self, id: DiscId) -> bool {
        if self.registry.remove_fallen(id).is_some() {
            self.counters.discs_fallen += 1;
            self.refresh_suggestions();
            true
        } else {
            false
        }
    }

    /// Per-frame position sync from the physics engine.
    pub fn update_disc_position(&mut self, id: DiscId, position: Vec2) -> bool {
        self.registry.update_position(id, position)
    }

    // ---- tick & state ------------------------------------------------

    /// Run one fixed-cadence balance update over the live on-board discs.
    pub fn tick(&mut self) -> BalanceFrame {
        let mut positions = std::mem::take(&mut self.position_scratch);
        self.registry.on_board_positions(&mut positions);
        let frame = self.balance.tick(&positions, self.tick_interval_secs);
        self.position_scratch = positions;
        self.tick_count += 1;
        frame
    }

    /// Remove every disc and zero the balance state (board cleared).
    /// Counters survive; they describe the whole session.
    pub fn clear_board(&mut self) {
        self.registry.clear();
        self.balance.reset();
        self.refresh_suggestions();
    }

    /// Full restart: board clear plus counters and tick bookkeeping.
    pub fn reset(&mut self) {
        self.clear_board();
        self.counters = SessionCountersMsg::default();
        self.tick_count = 0;
        self.turn = 0;
    }

    /// Swap in validated tuning (hot reload); live state carries over.
    pub fn apply_tuning(&mut self, tuning: Tuning) {
        self.projector.set_config(tuning.projection);
        self.balance.set_config(tuning.balance);
        self.refresh_suggestions();
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn counters(&self) -> SessionCountersMsg {
        self.counters
    }

    pub fn registry(&self) -> &DiscRegistry {
        &self.registry
    }

    pub fn balance(&self) -> &BalanceController {
        &self.balance
    }

    pub fn projector(&self) -> &SemanticProjector<P> {
        &self.projector
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    /// Replace the anchor set (settings change). Existing discs keep their
    /// coordinates; only new projections see the new anchors.
    pub fn set_anchors(&mut self, anchors: AnchorSet) {
        self.anchors = anchors;
        self.refresh_suggestions();
    }

    // ---- DTO helpers -------------------------------------------------

    pub fn drop_result_msg(&self, word: &str, result: &Result<DiscDrop, DropRejection>) -> DropResultMsg {
        match result {
            Ok(drop) => DropResultMsg {
                accepted: true,
                word: word.trim().to_lowercase(),
                disc_id: Some(drop.id.0),
                coordinate: Some(drop.coordinate.as_vec2().into()),
                rejection_reason: None,
            },
            Err(rejection) => DropResultMsg {
                accepted: false,
                word: word.trim().to_lowercase(),
                disc_id: None,
                coordinate: None,
                rejection_reason: Some(rejection.as_str().to_string()),
            },
        }
    }

    pub fn snapshot(&self) -> BoardSnapshotMsg {
        BoardSnapshotMsg {
            tick: self.tick_count,
            frame: self.balance.frame().into(),
            discs: self.registry.iter().map(DiscMsg::from).collect(),
            suggestions: self.suggestions.clone(),
            counters: self.counters,
        }
    }

    // ---- suggestions -------------------------------------------------

    /// Re-rank the advisory counter-words: sample a deterministic subset of
    /// the candidate pool for this turn, then rank it against the current
    /// smoothed center of mass.
    fn refresh_suggestions(&mut self) {
        let pool = &self.projector.config().candidate_words;
        if pool.is_empty() {
            self.suggestions.clear();
            return;
        }

        let mut rng = Xoshiro256StarStar::seed_from_u64(turn_seed(self.session_seed, self.turn));
        let mut sample: Vec<String> = pool
            .choose_multiple(&mut rng, self.suggestion_sample.min(pool.len()))
            .cloned()
            .collect();
        // Stable input order for deterministic tie-breaking.
        sample.sort();

        self.suggestions = self.projector.counter_words(
            self.balance.state().smoothed_com,
            &self.anchors,
            &sample,
            self.suggestion_limit,
        );
    }
}

/// Deterministic per-turn sampling seed from the session seed.
fn turn_seed(session_seed: u64, turn: u64) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(session_seed.to_le_bytes());
    hasher.update(turn.to_le_bytes());
    let result = hasher.finalize();
    u64::from_le_bytes(result[0..8].try_into().unwrap())
}
