//! Mesh entities mirroring the scene graph

use bevy::prelude::*;

use crate::bodies::{BodyDescriptor, BodyTable};
use crate::context::OrreryContext;
use crate::scene::builder::{BodyRig, Scene};
use crate::scene::graph::NodeId;

/// Links a render entity to the arena node whose world transform it shows
#[derive(Component, Copy, Clone, Debug, PartialEq, Eq)]
pub struct SceneNode(pub NodeId);

/// Marker for the self-luminous central body
#[derive(Component)]
pub struct CentralBody;

const SPHERE_SEGMENTS: u32 = 64;
const RING_RESOLUTION: u32 = 64;

/// Spawn one mesh per body and ring
///
/// Entities stay flat (no Bevy parent); the render pass writes each one's
/// world transform straight from the arena.
pub fn spawn_body_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    ctx: Res<OrreryContext>,
) {
    let world = ctx.scene.graph.world_transforms();
    let transform_of = |id: NodeId| Transform::from_matrix(Mat4::from(world[id.index()]));

    for (rig, descriptor) in rig_descriptors(&ctx.scene, &ctx.bodies) {
        let is_central = rig.nodes.orbit.is_none();

        let mut body = commands.spawn((
            Mesh3d(meshes.add(Sphere::new(descriptor.radius).mesh().uv(SPHERE_SEGMENTS, SPHERE_SEGMENTS))),
            MeshMaterial3d(materials.add(body_material(descriptor, is_central, &asset_server))),
            transform_of(rig.nodes.body),
            SceneNode(rig.nodes.body),
            Name::new(rig.name.clone()),
        ));
        if is_central {
            body.insert(CentralBody);
        }

        if let (Some(ring_node), Some(ring)) = (rig.nodes.ring, &descriptor.ring) {
            let mesh = Annulus::new(ring.inner_radius, ring.outer_radius)
                .mesh()
                .resolution(RING_RESOLUTION);
            let material = StandardMaterial {
                base_color: Color::WHITE,
                base_color_texture: ring.texture.as_ref().map(|path| asset_server.load(path.clone())),
                alpha_mode: AlphaMode::Blend,
                double_sided: true,
                cull_mode: None,
                unlit: true,
                ..default()
            };
            commands.spawn((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(materials.add(material)),
                transform_of(ring_node),
                SceneNode(ring_node),
                Name::new(format!("{} ring", rig.name)),
            ));
        }
    }

    info!(
        "Spawned {} bodies ({} scene nodes)",
        ctx.bodies.len(),
        ctx.scene.graph.len()
    );
}

/// Pair each rig with the descriptor of the same name
///
/// A rig with no matching body is skipped with a warning.
fn rig_descriptors<'a>(
    scene: &'a Scene,
    bodies: &'a BodyTable,
) -> impl Iterator<Item = (&'a BodyRig, &'a BodyDescriptor)> {
    scene.rigs().filter_map(move |rig| match bodies.get(&rig.name) {
        Some(descriptor) => Some((rig, descriptor)),
        None => {
            warn!("No body named {} for scene rig, not spawning it", rig.name);
            None
        }
    })
}

fn body_material(descriptor: &BodyDescriptor, is_central: bool, asset_server: &AssetServer) -> StandardMaterial {
    // A missing texture leaves the default white surface in place.
    let base_color_texture = descriptor
        .texture
        .as_ref()
        .map(|path| asset_server.load(path.clone()));

    if is_central {
        StandardMaterial {
            base_color: Color::WHITE,
            base_color_texture,
            unlit: true,
            ..default()
        }
    } else {
        StandardMaterial {
            base_color: Color::WHITE,
            base_color_texture,
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        }
    }
}
