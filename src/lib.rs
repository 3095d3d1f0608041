//! WordStack - Core Library
//!
//! This crate provides the deterministic game logic for the WordStack
//! balancing game:
//! - Word-embedding provider abstraction (similarity lookups, lexicon files)
//! - Semantic projection (word -> bounded 2D board coordinate)
//! - Counter-word search (candidates that oppose the current imbalance)
//! - Board balance controller (smoothed center of mass, dead zone, tilt)
//! - Disc lifecycle bookkeeping (landed / grounded-contact / fallen)
//! - Physics glue for the rigid-body simulator (bevy_rapier3d)
//! - FFI bridge for the Swift frontend

pub mod balance;
pub mod bridge;
pub mod constants;
pub mod discs;
pub mod embedding;
pub mod engine;
pub mod hotreload;
pub mod logging;
pub mod physics;
pub mod projector;
