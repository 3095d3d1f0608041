use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::balance::BalanceConfig;
use crate::constants::*;
use crate::projector::{AnchorSet, ProjectionConfig};

/// Everything a designer can edit without a rebuild: projection and balance
/// tunables, bundled so the hot-reload watcher can swap them atomically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tuning {
    pub projection: ProjectionConfig,
    pub balance: BalanceConfig,
}

/// A tuning value that failed validation; the previous tuning stays active.
#[derive(Debug, Error)]
#[error("tuning field '{field}' is {value}, expected {expected}")]
pub struct TuningError {
    pub field: &'static str,
    pub value: f32,
    pub expected: &'static str,
}

impl Tuning {
    /// Range-check every tunable before it is allowed anywhere near a live
    /// session.
    pub fn validate(&self) -> Result<(), TuningError> {
        let checks: [(&'static str, f32, bool, &'static str); 8] = [
            (
                "projection.clamp_magnitude",
                self.projection.clamp_magnitude,
                self.projection.clamp_magnitude >= 0.0,
                ">= 0",
            ),
            (
                "projection.spread_exponent",
                self.projection.spread_exponent,
                self.projection.spread_exponent > 0.0 && self.projection.spread_exponent <= 1.0,
                "in (0, 1]",
            ),
            (
                "projection.position_scale",
                self.projection.position_scale,
                self.projection.position_scale > 0.0,
                "> 0",
            ),
            (
                "balance.board_half_extent",
                self.balance.board_half_extent,
                self.balance.board_half_extent > 0.0,
                "> 0",
            ),
            (
                "balance.com_alpha",
                self.balance.com_alpha,
                self.balance.com_alpha > 0.0 && self.balance.com_alpha <= 1.0,
                "in (0, 1]",
            ),
            (
                "balance.dead_zone",
                self.balance.dead_zone,
                (0.0..1.0).contains(&self.balance.dead_zone),
                "in [0, 1)",
            ),
            (
                "balance.max_tilt",
                self.balance.max_tilt,
                self.balance.max_tilt > 0.0,
                "> 0",
            ),
            (
                "balance.stiffness",
                self.balance.stiffness,
                self.balance.stiffness > 0.0 && self.balance.damping >= 0.0,
                "> 0 (with damping >= 0)",
            ),
        ];
        for (field, value, ok, expected) in checks {
            if !ok {
                return Err(TuningError {
                    field,
                    value,
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// Per-session configuration supplied by the frontend at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub anchors: AnchorSet,
    pub tuning: Tuning,
    /// Seed for deterministic per-turn candidate sampling.
    pub session_seed: u64,
    /// Fixed balance tick interval in seconds.
    pub tick_interval_secs: f32,
    /// Candidates sampled from the pool each turn before ranking.
    pub suggestion_sample: usize,
    /// Ranked counter-words surfaced to the UI.
    pub suggestion_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            anchors: AnchorSet::default(),
            tuning: Tuning::default(),
            session_seed: 42,
            tick_interval_secs: BALANCE_TICK_SECS,
            suggestion_sample: SUGGESTION_SAMPLE_SIZE,
            suggestion_limit: SUGGESTION_LIMIT,
        }
    }
}
