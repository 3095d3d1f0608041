//! Centralized game constants for the WordStack core.
//!
//! Eliminates magic numbers duplicated across the session orchestrator and
//! FFI bridge. Per-module defaults (projection config, balance config) are
//! built from these values as the single source of truth.

// =====================================================
// Semantic Projection
// =====================================================

/// Clamp magnitude for raw anchor-similarity differences. Cosine differences
/// rarely leave ±0.5 in practice; anything beyond is treated as saturated.
pub const SIMILARITY_CLAMP: f32 = 0.5;

/// Signed power-law spread exponent, valid range (0, 1]. Smaller = more
/// spread near the origin.
pub const SPREAD_EXPONENT: f32 = 0.55;

/// Extra spread exponent for minimap display points (applied on top of the
/// projected coordinate, output still in [-1, 1]).
pub const MINIMAP_SPREAD_EXPONENT: f32 = 0.7;

/// Uniform position scale applied by `scaled_project` when the caller does
/// not override it.
pub const DEFAULT_POSITION_SCALE: f32 = 1.0;

/// Below this magnitude a 2D vector has no usable direction (cosine
/// similarity is undefined); used by the counter-word search.
pub const ZERO_MAGNITUDE_EPSILON: f32 = 1e-4;

// =====================================================
// Board Balance
// =====================================================

/// Board half-extent in world units; disc offsets are normalized by this.
pub const BOARD_HALF_EXTENT: f32 = 4.0;

/// Low-pass filter coefficient for the center-of-mass estimate. Deliberately
/// slow so the board does not jitter with every disc settling.
pub const COM_SMOOTHING_ALPHA: f32 = 0.08;

/// Per-axis dead zone on the smoothed center of mass; imbalances inside it
/// produce no tilt at all.
pub const TILT_DEAD_ZONE: f32 = 0.15;

/// Maximum board tilt on either axis, in degrees.
pub const MAX_TILT_DEGREES: f32 = 25.0;

/// Spring constant for tilt integration.
pub const TILT_STIFFNESS: f32 = 3.0;

/// Damping constant for tilt integration.
pub const TILT_DAMPING: f32 = 2.8;

/// Fixed balance tick interval in seconds (10 Hz).
pub const BALANCE_TICK_SECS: f32 = 0.1;

// =====================================================
// Physics Glue
// =====================================================

/// World-space height at which a new disc body is spawned above the board.
pub const DISC_DROP_HEIGHT: f32 = 6.0;

/// Disc collider half-height in world units.
pub const DISC_HALF_HEIGHT: f32 = 0.15;

/// Disc collider radius in world units.
pub const DISC_RADIUS: f32 = 0.45;

/// A body whose center falls below this height has left the board region.
pub const FALL_THRESHOLD_Y: f32 = -2.0;

// =====================================================
// Candidate Suggestions
// =====================================================

/// How many candidates are sampled from the pool each turn before ranking.
pub const SUGGESTION_SAMPLE_SIZE: usize = 24;

/// How many ranked counter-words are surfaced to the UI.
pub const SUGGESTION_LIMIT: usize = 5;
