use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::balance::BalanceFrame;
use crate::discs::PlacedDisc;

// =====================================================
// Shared response types (mirrored across the FFI boundary)
// =====================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vec2Msg {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Vec2Msg {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// One balance tick's output. Angles are radians.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceFrameMsg {
    pub smoothed_com: Vec2Msg,
    pub pitch: f32,
    pub roll: f32,
    pub target_drop_point: Vec2Msg,
}

impl From<BalanceFrame> for BalanceFrameMsg {
    fn from(frame: BalanceFrame) -> Self {
        Self {
            smoothed_com: frame.smoothed_com.into(),
            pitch: frame.pitch,
            roll: frame.roll,
            target_drop_point: frame.target_drop_point.into(),
        }
    }
}

/// One live disc: semantic coordinate plus current physics position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscMsg {
    pub id: u64,
    pub word: String,
    pub coordinate: Vec2Msg,
    pub position: Vec2Msg,
    pub on_board: bool,
}

impl From<&PlacedDisc> for DiscMsg {
    fn from(disc: &PlacedDisc) -> Self {
        Self {
            id: disc.id.0,
            word: disc.word.clone(),
            coordinate: disc.coordinate.as_vec2().into(),
            position: disc.position.into(),
            on_board: disc.on_board,
        }
    }
}

/// Session lifetime counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionCountersMsg {
    pub drops_accepted: u64,
    pub drops_rejected: u64,
    pub discs_fallen: u64,
}

/// Outcome of a drop request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropResultMsg {
    pub accepted: bool,
    pub word: String,
    pub disc_id: Option<u64>,
    pub coordinate: Option<Vec2Msg>,
    pub rejection_reason: Option<String>,
}

/// Full board state for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshotMsg {
    pub tick: u64,
    pub frame: BalanceFrameMsg,
    pub discs: Vec<DiscMsg>,
    pub suggestions: Vec<String>,
    pub counters: SessionCountersMsg,
}
