//! Scene graph
//!
//! An arena of orbit, body and ring transforms built from the body table,
//! plus the mesh entities that show it.

use bevy::prelude::*;

pub mod builder;
pub mod graph;
pub mod spawn;

pub use builder::{BodyNodes, BodyRig, Scene, attach_central, build_body, ring_tilt};
pub use graph::{Node, NodeId, NodeKind, SceneGraph, wrap_angle};
pub use spawn::{CentralBody, SceneNode};

/// Plugin spawning the body meshes and scene lighting
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn::spawn_body_meshes, spawn_lights));
    }
}

/// Dim ambient fill plus a point light sitting in the central body
fn spawn_lights(mut commands: Commands) {
    commands.insert_resource(bevy::light::GlobalAmbientLight {
        brightness: 50.0,
        ..default()
    });

    commands.spawn((
        PointLight {
            intensity: 50_000_000.0,
            range: 1000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 0.0),
        Name::new("Central Light"),
    ));
}
