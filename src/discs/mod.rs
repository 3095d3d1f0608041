//! Disc lifecycle bookkeeping.
//!
//! One record per word currently part of the tower. A disc spawns in flight,
//! becomes on-board on first contact with the board (or, transitively, with
//! a disc that is already on-board), and is destroyed when the physics layer
//! reports its body left the board region. Only on-board discs feed the
//! balance tick.
//!
//! Single-writer discipline: the registry belongs to the session and every
//! mutation - spawn on drop, promote on contact, remove on fall - happens on
//! the session's logical thread. Physics callbacks are turned into events
//! and drained there rather than touching this state directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::projector::SemanticCoordinate;

/// Opaque handle tying a record to its physics body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscId(pub u64);

/// One word on (or falling toward) the board.
#[derive(Debug, Clone)]
pub struct PlacedDisc {
    pub id: DiscId,
    /// Case-normalized word the disc represents.
    pub word: String,
    /// Where the projector placed the word, in [-1, 1]^2.
    pub coordinate: SemanticCoordinate,
    /// Live world-space offset from the board center, fed by physics.
    pub position: Vec2,
    /// True once the disc counts as supported by the board.
    pub on_board: bool,
}

/// Insertion-ordered set of live discs.
#[derive(Debug, Clone, Default)]
pub struct DiscRegistry {
    discs: Vec<PlacedDisc>,
    next_id: u64,
}

impl DiscRegistry {
    /// Register a freshly dropped disc, in flight at its world-space spawn
    /// position.
    pub fn spawn(&mut self, word: String, coordinate: SemanticCoordinate, position: Vec2) -> DiscId {
        self.next_id += 1;
        let id = DiscId(self.next_id);
        self.discs.push(PlacedDisc {
            id,
            word,
            coordinate,
            position,
            on_board: false,
        });
        id
    }

    /// First contact with the board. Idempotent; returns true when the disc
    /// was newly grounded.
    pub fn mark_landed(&mut self, id: DiscId) -> bool {
        match self.find_mut(id) {
            Some(disc) if !disc.on_board => {
                disc.on_board = true;
                true
            }
            _ => false,
        }
    }

    /// Disc-to-disc contact: whichever side is already on-board grounds the
    /// other, copying its status at contact time. A cheap approximation of
    /// physical support - no contact-graph analysis. Returns the newly
    /// grounded disc, if any.
    pub fn promote_on_contact(&mut self, a: DiscId, b: DiscId) -> Option<DiscId> {
        let grounded = |registry: &Self, id: DiscId| {
            registry.get(id).map(|d| d.on_board).unwrap_or(false)
        };
        let (a_on, b_on) = (grounded(self, a), grounded(self, b));
        let promoted = match (a_on, b_on) {
            (true, false) => b,
            (false, true) => a,
            _ => return None,
        };
        if self.mark_landed(promoted) {
            Some(promoted)
        } else {
            None
        }
    }

    /// The physics layer reported the body below the board region. The
    /// record is removed immediately so the very next balance tick no
    /// longer sees it. Idempotent: a duplicate fall event is a no-op.
    pub fn remove_fallen(&mut self, id: DiscId) -> Option<PlacedDisc> {
        let index = self.discs.iter().position(|d| d.id == id)?;
        Some(self.discs.remove(index))
    }

    /// Per-frame position feed from the physics engine.
    pub fn update_position(&mut self, id: DiscId, position: Vec2) -> bool {
        match self.find_mut(id) {
            Some(disc) => {
                disc.position = position;
                true
            }
            None => false,
        }
    }

    /// Collect the live positions the balance tick consumes.
    pub fn on_board_positions(&self, out: &mut Vec<Vec2>) {
        out.clear();
        out.extend(
            self.discs
                .iter()
                .filter(|d| d.on_board)
                .map(|d| d.position),
        );
    }

    pub fn get(&self, id: DiscId) -> Option<&PlacedDisc> {
        self.discs.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedDisc> {
        self.discs.iter()
    }

    pub fn len(&self) -> usize {
        self.discs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discs.is_empty()
    }

    pub fn on_board_count(&self) -> usize {
        self.discs.iter().filter(|d| d.on_board).count()
    }

    /// Drop every record (board clear). Ids keep counting up so stale
    /// physics events for old discs cannot alias new ones.
    pub fn clear(&mut self) {
        self.discs.clear();
    }

    fn find_mut(&mut self, id: DiscId) -> Option<&mut PlacedDisc> {
        self.discs.iter_mut().find(|d| d.id == id)
    }
}
