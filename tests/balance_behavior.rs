//! Cross-module behavior tests: the balance controller driven through the
//! session and disc registry, the way the orchestrator drives it in game.
//!
//! Covers the observable guarantees:
//! - Dead zone: small imbalances never tilt the board
//! - Boundedness: tilt stays inside ±max angle for any input sequence
//! - Fall removal: a fallen disc is gone from the very next tick
//! - Transitive grounding: contact with a grounded disc grounds the other
//! - Reset: fully idempotent, always returns to a level board

use bevy::math::Vec2;
use proptest::prelude::*;

use wordstack_core::constants::BALANCE_TICK_SECS;
use wordstack_core::balance::{BalanceConfig, BalanceController};
use wordstack_core::embedding::FixedVectorProvider;
use wordstack_core::engine::config::SessionConfig;
use wordstack_core::engine::session::GameSession;

/// Small vocabulary; every test word resolves against the default anchors.
fn test_provider() -> FixedVectorProvider {
    FixedVectorProvider::new(vec![
        ("nature", vec![1.0, 0.0]),
        ("machine", vec![-1.0, 0.0]),
        ("life", vec![0.0, 1.0]),
        ("object", vec![0.0, -1.0]),
        ("forest", vec![1.0, 0.2]),
        ("anvil", vec![-0.8, -0.6]),
        ("moss", vec![0.9, 0.4]),
    ])
}

fn session() -> GameSession<FixedVectorProvider> {
    GameSession::new(test_provider(), SessionConfig::default())
}

#[test]
fn dead_zone_holds_board_level() {
    let mut session = session();
    let drop = session.drop_word("forest").unwrap();
    session.notify_landed(drop.id);
    // Normalized offset (0.1, 0.1): inside the 0.15 dead zone.
    let half = session.balance().config().board_half_extent;
    session.update_disc_position(drop.id, Vec2::splat(0.1 * half));

    let mut frame = session.tick();
    for _ in 0..600 {
        frame = session.tick();
    }
    assert!(
        frame.pitch.abs() < 1e-3 && frame.roll.abs() < 1e-3,
        "dead-zone imbalance must converge to level, got ({}, {})",
        frame.pitch,
        frame.roll
    );
}

#[test]
fn fall_removal_is_immediate() {
    let mut session = session();
    let drop = session.drop_word("forest").unwrap();
    session.notify_landed(drop.id);
    let half = session.balance().config().board_half_extent;
    session.update_disc_position(drop.id, Vec2::new(half, 0.0));

    let alpha = session.balance().config().com_alpha;
    let leaning = session.tick();
    assert!(leaning.smoothed_com.x > 0.0);

    // The disc falls: the very next tick must compute its raw target from
    // an empty board, i.e. the estimate decays instead of growing.
    session.notify_fell(drop.id);
    let after = session.tick();
    let expected = leaning.smoothed_com.x * (1.0 - alpha);
    assert!(
        (after.smoothed_com.x - expected).abs() < 1e-5,
        "fallen disc still influencing center of mass: {} vs {}",
        after.smoothed_com.x,
        expected
    );
}

#[test]
fn transitive_grounding_feeds_balance() {
    let mut session = session();
    let grounded = session.drop_word("forest").unwrap();
    let airborne = session.drop_word("anvil").unwrap();
    session.notify_landed(grounded.id);

    // Airborne disc touches the grounded one mid-air pile-up.
    assert_eq!(
        session.notify_contact(airborne.id, grounded.id),
        Some(airborne.id)
    );

    let half = session.balance().config().board_half_extent;
    session.update_disc_position(grounded.id, Vec2::new(half, 0.0));
    session.update_disc_position(airborne.id, Vec2::new(half, 0.0));

    // Both discs count: the first tick moves by alpha of the full target.
    let alpha = session.balance().config().com_alpha;
    let frame = session.tick();
    assert!((frame.smoothed_com.x - alpha).abs() < 1e-5);
}

#[test]
fn reset_is_idempotent() {
    let mut session = session();
    let drop = session.drop_word("forest").unwrap();
    session.notify_landed(drop.id);
    let half = session.balance().config().board_half_extent;
    session.update_disc_position(drop.id, Vec2::new(half, half));
    for _ in 0..200 {
        session.tick();
    }

    for _ in 0..3 {
        session.reset();
        let frame = session.tick();
        assert_eq!(frame.smoothed_com, Vec2::ZERO);
        assert_eq!((frame.pitch, frame.roll), (0.0, 0.0));
    }
}

#[test]
fn clear_board_keeps_counters() {
    let mut session = session();
    session.drop_word("forest").unwrap();
    session.drop_word("zzz-unknown").unwrap_err();
    session.clear_board();
    assert_eq!(session.registry().len(), 0);
    assert_eq!(session.counters().drops_accepted, 1);
    assert_eq!(session.counters().drops_rejected, 1);
}

// ============================================================
// Controller-level properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_tilt_bounded_for_any_input(
        positions in prop::collection::vec(
            prop::collection::vec((-10.0f32..=10.0, -10.0f32..=10.0), 0..6),
            1..80,
        ),
    ) {
        let config = BalanceConfig::default();
        let mut controller = BalanceController::new(config);

        for snapshot in &positions {
            let discs: Vec<Vec2> = snapshot.iter().map(|(x, y)| Vec2::new(*x, *y)).collect();
            let frame = controller.tick(&discs, BALANCE_TICK_SECS);

            prop_assert!(frame.pitch.is_finite() && frame.roll.is_finite());
            prop_assert!(frame.pitch.abs() <= config.max_tilt + 1e-6,
                "pitch out of range: {}", frame.pitch);
            prop_assert!(frame.roll.abs() <= config.max_tilt + 1e-6,
                "roll out of range: {}", frame.roll);
            prop_assert!(frame.smoothed_com.x.abs() <= 1.0 + 1e-6);
            prop_assert!(frame.smoothed_com.y.abs() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn prop_constant_input_converges(x in -1.0f32..=1.0, y in -1.0f32..=1.0) {
        let config = BalanceConfig::default();
        let mut controller = BalanceController::new(config);
        let positions = [Vec2::new(x * config.board_half_extent, y * config.board_half_extent)];

        let mut frame = controller.tick(&positions, BALANCE_TICK_SECS);
        for _ in 0..1200 {
            frame = controller.tick(&positions, BALANCE_TICK_SECS);
        }

        // Where the settled tilt must end up, dead zone applied per axis.
        let dz = config.dead_zone;
        let rescale = |v: f32| {
            if v.abs() <= dz { 0.0 } else { v.signum() * (v.abs() - dz) / (1.0 - dz) }
        };
        let expected_roll = -rescale(frame.smoothed_com.x) * config.max_tilt;
        let expected_pitch = rescale(frame.smoothed_com.y) * config.max_tilt;

        prop_assert!((frame.roll - expected_roll).abs() < 0.02,
            "roll {} did not converge to {}", frame.roll, expected_roll);
        prop_assert!((frame.pitch - expected_pitch).abs() < 0.02,
            "pitch {} did not converge to {}", frame.pitch, expected_pitch);
    }

    #[test]
    fn prop_target_drop_point_is_negated_com(
        x in -1.0f32..=1.0,
        y in -1.0f32..=1.0,
        ticks in 1usize..50,
    ) {
        let config = BalanceConfig::default();
        let mut controller = BalanceController::new(config);
        let positions = [Vec2::new(x * config.board_half_extent, y * config.board_half_extent)];

        let mut frame = controller.tick(&positions, BALANCE_TICK_SECS);
        for _ in 1..ticks {
            frame = controller.tick(&positions, BALANCE_TICK_SECS);
        }
        prop_assert!((frame.target_drop_point.x + frame.smoothed_com.x).abs() < 1e-6);
        prop_assert!((frame.target_drop_point.y + frame.smoothed_com.y).abs() < 1e-6);
    }
}
