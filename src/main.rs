//! Headless dev harness: runs the full session + physics loop without a
//! renderer. Useful for watching the balance controller react to scripted
//! drops (`RUST_LOG=wordstack_core=debug cargo run`).

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use wordstack_core::engine::plugin::{SessionPlugin, WordDropRequested};
use wordstack_core::hotreload::HotReloadPlugin;
use wordstack_core::logging::LoggingPlugin;
use wordstack_core::physics::BoardPhysicsPlugin;

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(LoggingPlugin)
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(SessionPlugin)
        .add_plugins(BoardPhysicsPlugin)
        .add_plugins(HotReloadPlugin)
        .add_systems(Startup, queue_demo_drops)
        .run();
}

/// Seed the board with a few drops so the harness has something to balance.
fn queue_demo_drops(mut drops: EventWriter<WordDropRequested>) {
    for word in ["forest", "engine", "river", "anvil"] {
        drops.send(WordDropRequested { word: word.into() });
    }
}
