//! FFI Bridge Layer: Rust Core <-> Swift Frontend
//!
//! This module exposes C-ABI functions the iOS app calls through the
//! static library / dylib boundary. Data is serialized as JSON across the
//! boundary. All functions returning `*mut c_char` hand over heap-allocated
//! strings — caller must free with `free_string`. A null return means the
//! operation failed or produced no result.
//!
//! State lives in a single process-wide session slot guarded by a mutex;
//! every call locks it, which gives the contact callbacks the single-writer
//! discipline the disc registry requires. Integer-returning functions use
//! 0 for success and negative values for errors.

use serde::Serialize;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::Mutex;

use bevy::math::Vec2;

use crate::discs::DiscId;
use crate::embedding::FixedVectorProvider;
use crate::engine::config::SessionConfig;
use crate::engine::messages::BalanceFrameMsg;
use crate::engine::plugin::LexiconSession;
use crate::engine::session::GameSession;
use crate::logging;
use crate::projector::AnchorSet;

/// Error codes shared with the Swift side.
const OK: i32 = 0;
const ERR_NO_SESSION: i32 = -1;
const ERR_BAD_INPUT: i32 = -2;
const ERR_LOCK: i32 = -3;

static SESSION: Mutex<Option<LexiconSession>> = Mutex::new(None);

// ========================
// Helpers
// ========================

fn json_to_cstring<T: Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn parse_cstr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_owned()) }
}

/// Run a closure against the live session, mapping lock/slot failures to
/// error codes.
fn with_session<R>(f: impl FnOnce(&mut LexiconSession) -> R) -> Result<R, i32> {
    let mut guard = SESSION.lock().map_err(|_| ERR_LOCK)?;
    match guard.as_mut() {
        Some(session) => Ok(f(session)),
        None => Err(ERR_NO_SESSION),
    }
}

// ========================
// C-ABI: Core
// ========================

/// Version string
#[no_mangle]
pub extern "C" fn get_version() -> *mut c_char {
    CString::new(env!("CARGO_PKG_VERSION"))
        .unwrap_or_default()
        .into_raw()
}

/// Free a string allocated by Rust.
/// Called from Swift — ptr must be from a prior Rust FFI allocation or null.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}

// ========================
// C-ABI: Session Lifecycle
// ========================

/// Create (or replace) the process session. `lexicon_ron` is the RON
/// lexicon file contents; `config_json` is an optional `SessionConfig`
/// (null/empty = defaults).
#[no_mangle]
pub extern "C" fn session_init(lexicon_ron: *const c_char, config_json: *const c_char) -> i32 {
    logging::init_tracing_default();

    let Some(lexicon) = parse_cstr(lexicon_ron) else {
        return ERR_BAD_INPUT;
    };
    let provider = match FixedVectorProvider::from_ron_str(&lexicon) {
        Ok(provider) => provider,
        Err(err) => {
            logging::log_error("bridge", &format!("lexicon rejected: {err}"));
            return ERR_BAD_INPUT;
        }
    };

    let config = match parse_cstr(config_json) {
        Some(json) if !json.is_empty() => match serde_json::from_str::<SessionConfig>(&json) {
            Ok(config) => config,
            Err(err) => {
                logging::log_error("bridge", &format!("session config rejected: {err}"));
                return ERR_BAD_INPUT;
            }
        },
        _ => SessionConfig::default(),
    };
    if config.tuning.validate().is_err() {
        return ERR_BAD_INPUT;
    }

    let Ok(mut guard) = SESSION.lock() else {
        return ERR_LOCK;
    };
    *guard = Some(GameSession::new(provider, config));
    logging::log_info("bridge", "session initialized");
    OK
}

/// Tear the session down and release the lexicon.
#[no_mangle]
pub extern "C" fn session_shutdown() -> i32 {
    let Ok(mut guard) = SESSION.lock() else {
        return ERR_LOCK;
    };
    *guard = None;
    OK
}

/// Clear the board and all balance state, keeping the lexicon loaded.
#[no_mangle]
pub extern "C" fn session_reset() -> i32 {
    match with_session(|session| session.reset()) {
        Ok(()) => OK,
        Err(code) => code,
    }
}

// ========================
// C-ABI: Projection & Drops
// ========================

/// Project a word onto the semantic plane. Returns `{"x":..,"y":..}` JSON
/// or null when the word (or an anchor) is out of vocabulary.
#[no_mangle]
pub extern "C" fn project_word(word: *const c_char) -> *mut c_char {
    let Some(word) = parse_cstr(word) else {
        return std::ptr::null_mut();
    };
    let result = with_session(|session| {
        let normalized = word.trim().to_lowercase();
        session.projector().project(&normalized, session.anchors())
    });
    match result {
        Ok(Some(coordinate)) => json_to_cstring(&coordinate),
        _ => std::ptr::null_mut(),
    }
}

/// Drop a word onto the board. Returns a `DropResultMsg` JSON (accepted or
/// rejected with a reason), or null on session errors.
#[no_mangle]
pub extern "C" fn drop_word(word: *const c_char) -> *mut c_char {
    let Some(word) = parse_cstr(word) else {
        return std::ptr::null_mut();
    };
    match with_session(|session| {
        let result = session.drop_word(&word);
        session.drop_result_msg(&word, &result)
    }) {
        Ok(msg) => json_to_cstring(&msg),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Rank counter-words from the configured candidate pool against an
/// explicit center of mass. Returns a JSON string array, best first.
#[no_mangle]
pub extern "C" fn counter_words(com_x: f32, com_y: f32, limit: u32) -> *mut c_char {
    match with_session(|session| {
        let candidates = session.projector().config().candidate_words.clone();
        session.projector().counter_words(
            Vec2::new(com_x, com_y),
            session.anchors(),
            &candidates,
            limit as usize,
        )
    }) {
        Ok(ranked) => json_to_cstring(&ranked),
        Err(_) => std::ptr::null_mut(),
    }
}

// ========================
// C-ABI: Disc Lifecycle (from the physics engine)
// ========================

/// First contact with the board.
#[no_mangle]
pub extern "C" fn notify_disc_landed(disc_id: u64) -> i32 {
    match with_session(|session| session.notify_landed(DiscId(disc_id))) {
        Ok(_) => OK,
        Err(code) => code,
    }
}

/// Contact between two discs (grounded status copies transitively).
#[no_mangle]
pub extern "C" fn notify_disc_contact(disc_a: u64, disc_b: u64) -> i32 {
    match with_session(|session| session.notify_contact(DiscId(disc_a), DiscId(disc_b))) {
        Ok(_) => OK,
        Err(code) => code,
    }
}

/// A disc body left the board region. Idempotent.
#[no_mangle]
pub extern "C" fn notify_disc_fell(disc_id: u64) -> i32 {
    match with_session(|session| session.notify_fell(DiscId(disc_id))) {
        Ok(_) => OK,
        Err(code) => code,
    }
}

/// Per-frame position sync for one disc (board-plane offset).
#[no_mangle]
pub extern "C" fn update_disc_position(disc_id: u64, x: f32, y: f32) -> i32 {
    match with_session(|session| session.update_disc_position(DiscId(disc_id), Vec2::new(x, y))) {
        Ok(_) => OK,
        Err(code) => code,
    }
}

// ========================
// C-ABI: Balance & Snapshots
// ========================

/// Run one 10 Hz balance update. Returns a `BalanceFrameMsg` JSON.
#[no_mangle]
pub extern "C" fn balance_tick() -> *mut c_char {
    match with_session(|session| BalanceFrameMsg::from(session.tick())) {
        Ok(frame) => json_to_cstring(&frame),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Full board snapshot for the renderer (`BoardSnapshotMsg` JSON).
#[no_mangle]
pub extern "C" fn board_snapshot() -> *mut c_char {
    match with_session(|session| session.snapshot()) {
        Ok(snapshot) => json_to_cstring(&snapshot),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Replace the anchor set mid-session (settings screen). Takes an
/// `AnchorSet` JSON; coordinates of already-dropped discs are not
/// recomputed.
#[no_mangle]
pub extern "C" fn set_anchor_words(anchors_json: *const c_char) -> i32 {
    let Some(json) = parse_cstr(anchors_json) else {
        return ERR_BAD_INPUT;
    };
    let Ok(anchors) = serde_json::from_str::<AnchorSet>(&json) else {
        return ERR_BAD_INPUT;
    };
    match with_session(|session| session.set_anchors(anchors)) {
        Ok(()) => OK,
        Err(code) => code,
    }
}
