//! Session Orchestrator — Integration Layer
//!
//! Thin coordination layer between the Swift frontend, the rigid-body
//! simulator, and the core logic modules:
//!
//!   Swift UI  ←→ FFI/JSON ←→ GameSession (this module)
//!   rapier    ←→ events   ←→ GameSession (this module)
//!
//! Responsibilities:
//!   1. Drop intake      — case-normalize, project, spawn or reject
//!   2. Disc lifecycle   — landed / grounded-contact / fell bookkeeping
//!   3. Balance tick     — 10 Hz smoothed center of mass and board tilt
//!   4. Suggestions      — deterministic counter-word sampling per turn
//!   5. Snapshots        — serde DTOs mirrored across the FFI boundary

pub mod config;
pub mod messages;
pub mod plugin;
pub mod session;

#[allow(unused_imports)]
pub use config::{SessionConfig, Tuning, TuningError};
#[allow(unused_imports)]
pub use messages::*;
#[allow(unused_imports)]
pub use plugin::{LexiconSession, SessionPlugin, SessionResource};
#[allow(unused_imports)]
pub use session::{DiscDrop, DropRejection, GameSession};

// =====================================================
// Tests
// =====================================================
