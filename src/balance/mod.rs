//! Board balance controller.
//!
//! Turns a live snapshot of on-board disc positions into a smoothed
//! center-of-mass estimate, a target drop point, and board tilt angles for
//! the physics engine's kinematic board body. Runs on a fixed 10 Hz tick.
//!
//! Pipeline per tick: normalize disc offsets by the board half-extent and
//! average them, low-pass filter the result, apply a per-axis dead zone,
//! then integrate a spring-damper toward the dead-zone-adjusted target
//! angles. The target drop point bypasses the dead zone and spring stages
//! on purpose - it is advisory, not physically consequential, so it can be
//! more responsive than the tilt.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Tunable balance parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Board half-extent in world units; disc offsets are divided by this.
    pub board_half_extent: f32,
    /// Low-pass coefficient for the center-of-mass estimate, in (0, 1].
    pub com_alpha: f32,
    /// Per-axis dead zone on the smoothed center of mass, in [0, 1).
    pub dead_zone: f32,
    /// Maximum tilt on either axis, in radians.
    pub max_tilt: f32,
    /// Spring constant for tilt integration.
    pub stiffness: f32,
    /// Damping constant for tilt integration.
    pub damping: f32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            board_half_extent: BOARD_HALF_EXTENT,
            com_alpha: COM_SMOOTHING_ALPHA,
            dead_zone: TILT_DEAD_ZONE,
            max_tilt: MAX_TILT_DEGREES.to_radians(),
            stiffness: TILT_STIFFNESS,
            damping: TILT_DAMPING,
        }
    }
}

/// Mutable state owned by the controller. Reset to zero when the board is
/// cleared.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceState {
    /// Low-pass filtered center of mass, components in [-1, 1].
    pub smoothed_com: Vec2,
    /// Current pitch (rotation about X, driven by the Y imbalance).
    pub pitch: f32,
    /// Current roll (rotation about Z, driven by the X imbalance).
    pub roll: f32,
    /// Spring-damper velocities.
    pub pitch_velocity: f32,
    pub roll_velocity: f32,
}

/// Output of one balance tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceFrame {
    pub smoothed_com: Vec2,
    pub pitch: f32,
    pub roll: f32,
    /// Antipode of the smoothed center of mass: where the next disc would
    /// best land. Raw, not dead-zone adjusted.
    pub target_drop_point: Vec2,
}

/// Converts live on-board positions into tilt. Exclusively owns its state;
/// callers feed it plain coordinates each tick and it never touches the
/// disc records themselves.
#[derive(Debug, Clone, Default)]
pub struct BalanceController {
    config: BalanceConfig,
    state: BalanceState,
}

impl BalanceController {
    pub fn new(config: BalanceConfig) -> Self {
        Self {
            config,
            state: BalanceState::default(),
        }
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    pub fn state(&self) -> &BalanceState {
        &self.state
    }

    /// Swap the tunables (hot reload). State carries over so the board does
    /// not snap.
    pub fn set_config(&mut self, config: BalanceConfig) {
        self.config = config;
    }

    /// Run one fixed-cadence update from the live on-board positions
    /// (world-space offsets from the board center). Fallen discs must
    /// already be absent from the slice.
    pub fn tick(&mut self, on_board_positions: &[Vec2], dt: f32) -> BalanceFrame {
        let target_com = self.raw_center_of_mass(on_board_positions);

        // Low-pass: slow enough that players can react before the tilt does.
        self.state.smoothed_com += (target_com - self.state.smoothed_com) * self.config.com_alpha;

        let effective = Vec2::new(
            dead_zone_axis(self.state.smoothed_com.x, self.config.dead_zone),
            dead_zone_axis(self.state.smoothed_com.y, self.config.dead_zone),
        );

        let target_roll = -effective.x * self.config.max_tilt;
        let target_pitch = effective.y * self.config.max_tilt;

        self.state.pitch = spring_step(
            self.state.pitch,
            target_pitch,
            &mut self.state.pitch_velocity,
            &self.config,
            dt,
        );
        self.state.roll = spring_step(
            self.state.roll,
            target_roll,
            &mut self.state.roll_velocity,
            &self.config,
            dt,
        );

        self.frame()
    }

    /// Clear all smoothing and tilt state (game restart / board clear).
    pub fn reset(&mut self) {
        self.state = BalanceState::default();
    }

    /// The frame for the current state without advancing it.
    pub fn frame(&self) -> BalanceFrame {
        BalanceFrame {
            smoothed_com: self.state.smoothed_com,
            pitch: self.state.pitch,
            roll: self.state.roll,
            target_drop_point: -self.state.smoothed_com,
        }
    }

    /// Mean of normalized, per-axis-clamped disc offsets; zero when the
    /// board is empty.
    fn raw_center_of_mass(&self, positions: &[Vec2]) -> Vec2 {
        if positions.is_empty() {
            return Vec2::ZERO;
        }
        let half = self.config.board_half_extent.max(f32::EPSILON);
        let sum: Vec2 = positions
            .iter()
            .map(|p| (*p / half).clamp(Vec2::splat(-1.0), Vec2::splat(1.0)))
            .sum();
        sum / positions.len() as f32
    }

}

/// One spring-damper Euler step toward `target`, clamped to ±max tilt so
/// transient overshoot never leaves the legal range.
fn spring_step(current: f32, target: f32, velocity: &mut f32, config: &BalanceConfig, dt: f32) -> f32 {
    let force = -config.stiffness * (current - target) - config.damping * *velocity;
    *velocity += force * dt;
    (current + *velocity * dt).clamp(-config.max_tilt, config.max_tilt)
}

/// Per-axis dead zone: values inside the zone vanish, values beyond it are
/// rescaled back to the full [-1, 1] signal so the transition is continuous.
fn dead_zone_axis(v: f32, dead_zone: f32) -> f32 {
    if v.abs() <= dead_zone {
        return 0.0;
    }
    let span = (1.0 - dead_zone).max(f32::EPSILON);
    v.signum() * (v.abs() - dead_zone) / span
}
