//! Physics Glue — bevy_rapier3d collision layers, body bundles, and event
//! relay
//!
//! Provides:
//! - Collision group constants (BOARD, DISC)
//! - Helper functions for spawning the board and disc bodies
//! - Systems translating rapier contact events into disc lifecycle events
//!   (landed / grounded-contact) and below-board positions into fall events
//! - The board is KinematicPositionBased: tilt is applied from the balance
//!   controller's output, never from collision response
//!
//! Collision *resolution* stays entirely inside rapier; this module only
//! maps simulator events onto the core's lifecycle notifications. Events
//! are drained by the session systems on the app's single writer, which is
//! what keeps contact callbacks off the registry.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::constants::*;
use crate::discs::DiscId;
use crate::engine::plugin::{BoardTiltUpdated, DiscSpawned};

// ============================================================================
// Collision Layers
// ============================================================================

/// Collision group constants for physics filtering.
pub struct PhysicsLayers;

impl PhysicsLayers {
    /// The tilting board.
    pub const BOARD: Group = Group::GROUP_1;
    /// Word discs.
    pub const DISC: Group = Group::GROUP_2;
}

// ============================================================================
// Components & Events
// ============================================================================

/// Tags a rapier body as the board.
#[derive(Component, Debug)]
pub struct Board;

/// Ties a rapier body back to its disc record.
#[derive(Component, Debug, Clone, Copy)]
pub struct DiscBody {
    pub id: DiscId,
}

/// First contact between a disc and the board.
#[derive(Event, Debug, Clone, Copy)]
pub struct DiscLanded {
    pub id: DiscId,
}

/// Contact between two discs; the session copies grounded status across.
#[derive(Event, Debug, Clone, Copy)]
pub struct DiscContact {
    pub a: DiscId,
    pub b: DiscId,
}

/// A disc body dropped below the board support region.
#[derive(Event, Debug, Clone, Copy)]
pub struct DiscFell {
    pub id: DiscId,
}

/// Per-frame board-plane position of a disc body.
#[derive(Event, Debug, Clone, Copy)]
pub struct DiscPositionSync {
    pub id: DiscId,
    pub position: Vec2,
}

// ============================================================================
// Physics Component Bundles
// ============================================================================

/// Physics components for the board: kinematic (tilt is authored by the
/// balance controller), a flat cuboid slightly below y = 0.
pub fn board_physics_bundle(half_extent: f32) -> (RigidBody, Collider, CollisionGroups) {
    (
        RigidBody::KinematicPositionBased,
        Collider::cuboid(half_extent, 0.1, half_extent),
        CollisionGroups::new(PhysicsLayers::BOARD, PhysicsLayers::DISC),
    )
}

/// Physics components for a word disc: dynamic cylinder with collision
/// events enabled so landings and disc contacts are reported.
pub fn disc_physics_bundle() -> (RigidBody, Collider, CollisionGroups, ActiveEvents) {
    (
        RigidBody::Dynamic,
        Collider::cylinder(DISC_HALF_HEIGHT, DISC_RADIUS),
        CollisionGroups::new(
            PhysicsLayers::DISC,
            PhysicsLayers::BOARD | PhysicsLayers::DISC,
        ),
        ActiveEvents::COLLISION_EVENTS,
    )
}

// ============================================================================
// Plugin & Systems
// ============================================================================

/// Registers the lifecycle events and relay systems. The host app is
/// expected to add `RapierPhysicsPlugin` itself (exactly once).
pub struct BoardPhysicsPlugin;

impl Plugin for BoardPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DiscLanded>()
            .add_event::<DiscContact>()
            .add_event::<DiscFell>()
            .add_event::<DiscPositionSync>()
            .add_systems(Startup, spawn_board)
            .add_systems(
                Update,
                (
                    spawn_disc_bodies,
                    relay_contacts,
                    detect_falls,
                    sync_disc_positions,
                    apply_board_tilt,
                ),
            );
    }
}

fn spawn_board(mut commands: Commands) {
    let (body, collider, groups) = board_physics_bundle(BOARD_HALF_EXTENT);
    commands.spawn((
        Board,
        body,
        collider,
        groups,
        Transform::from_translation(Vec3::new(0.0, -0.1, 0.0)),
    ));
}

/// One rapier body per accepted drop, entering above the board at the
/// projected board-plane offset.
fn spawn_disc_bodies(mut commands: Commands, mut spawned: EventReader<DiscSpawned>) {
    for event in spawned.read() {
        let (body, collider, groups, active_events) = disc_physics_bundle();
        commands.spawn((
            DiscBody { id: event.id },
            body,
            collider,
            groups,
            active_events,
            Transform::from_translation(Vec3::new(
                event.spawn_position.x,
                DISC_DROP_HEIGHT,
                event.spawn_position.y,
            )),
        ));
    }
}

/// Classify rapier contact starts: board/disc becomes a landing, disc/disc
/// becomes a contact the session may promote across.
fn relay_contacts(
    mut collisions: EventReader<CollisionEvent>,
    discs: Query<&DiscBody>,
    board: Query<(), With<Board>>,
    mut landed: EventWriter<DiscLanded>,
    mut contacts: EventWriter<DiscContact>,
) {
    for collision in collisions.read() {
        let CollisionEvent::Started(e1, e2, _) = collision else {
            continue;
        };
        match (discs.get(*e1).ok(), discs.get(*e2).ok()) {
            (Some(a), Some(b)) => {
                contacts.send(DiscContact { a: a.id, b: b.id });
            }
            (Some(disc), None) if board.get(*e2).is_ok() => {
                landed.send(DiscLanded { id: disc.id });
            }
            (None, Some(disc)) if board.get(*e1).is_ok() => {
                landed.send(DiscLanded { id: disc.id });
            }
            _ => {}
        }
    }
}

/// A body below the support region has slid off: report the fall and
/// despawn the body. The session removes its record before the next tick.
fn detect_falls(
    mut commands: Commands,
    bodies: Query<(Entity, &Transform, &DiscBody)>,
    mut fell: EventWriter<DiscFell>,
) {
    for (entity, transform, disc) in &bodies {
        if transform.translation.y < FALL_THRESHOLD_Y {
            fell.send(DiscFell { id: disc.id });
            commands.entity(entity).despawn();
        }
    }
}

/// Feed live board-plane positions back to the session every frame.
fn sync_disc_positions(
    bodies: Query<(&Transform, &DiscBody)>,
    mut positions: EventWriter<DiscPositionSync>,
) {
    for (transform, disc) in &bodies {
        positions.send(DiscPositionSync {
            id: disc.id,
            position: Vec2::new(transform.translation.x, transform.translation.z),
        });
    }
}

/// Apply the controller's latest angles to the kinematic board body.
fn apply_board_tilt(
    mut tilt: EventReader<BoardTiltUpdated>,
    mut board: Query<&mut Transform, With<Board>>,
) {
    let Some(latest) = tilt.read().last() else {
        return;
    };
    for mut transform in &mut board {
        transform.rotation =
            Quat::from_rotation_x(latest.pitch) * Quat::from_rotation_z(latest.roll);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_layers_distinct() {
        assert_ne!(PhysicsLayers::BOARD, PhysicsLayers::DISC);
    }

    #[test]
    fn test_board_is_kinematic() {
        let (body, _collider, groups) = board_physics_bundle(BOARD_HALF_EXTENT);
        assert!(matches!(body, RigidBody::KinematicPositionBased));
        assert!(groups.filters.contains(PhysicsLayers::DISC));
        assert!(!groups.filters.contains(PhysicsLayers::BOARD));
    }

    #[test]
    fn test_disc_is_dynamic_with_events() {
        let (body, _collider, groups, events) = disc_physics_bundle();
        assert!(matches!(body, RigidBody::Dynamic));
        assert!(groups.filters.contains(PhysicsLayers::BOARD));
        assert!(groups.filters.contains(PhysicsLayers::DISC));
        assert!(events.contains(ActiveEvents::COLLISION_EVENTS));
    }

    #[test]
    fn test_fall_threshold_below_board() {
        assert!(FALL_THRESHOLD_Y < 0.0, "Discs must leave the board before falling");
        assert!(DISC_DROP_HEIGHT > 0.0);
    }

    #[test]
    fn test_tilt_rotation_composition() {
        let pitch = 0.2_f32;
        let roll = -0.1_f32;
        let rotation = Quat::from_rotation_x(pitch) * Quat::from_rotation_z(roll);
        let (x, z, y) = rotation.to_euler(EulerRot::XZY);
        assert!((x - pitch).abs() < 1e-5);
        assert!((z - roll).abs() < 1e-5);
        assert!(y.abs() < 1e-5);
    }
}
