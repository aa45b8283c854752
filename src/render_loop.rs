//! Render loop scheduler
//!
//! Once per display-synchronized frame: reconcile the camera controller,
//! advance the animation by one step, then hand the scene to the renderer.
//! Ticks never overlap; a slow frame just delays the next one.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::transform::TransformSystems;
use bevy_panorbit_camera::PanOrbitCameraSystemSet;

use crate::animation::advance_frame;
use crate::camera::{CameraController, CameraState, MainCamera, PanOrbitControls};
use crate::context::OrreryContext;
use crate::scene::{SceneGraph, SceneNode};
use crate::viewport::ViewportState;

/// Renderer collaborator
///
/// Must not mutate simulation state.
pub trait Renderer {
    fn render(&mut self, graph: &SceneGraph, camera: &CameraState, viewport: ViewportState);
    fn resize_surface(&mut self, width: u32, height: u32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Running,
    Stopped,
}

/// Two-state frame scheduler
#[derive(Resource, Debug, Default)]
pub struct RenderLoop {
    state: LoopState,
    frames: u64,
}

impl RenderLoop {
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Explicit external shutdown; there is no way back to Running
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            info!("Render loop stopped after {} frames", self.frames);
        }
        self.state = LoopState::Stopped;
    }

    /// Run one frame; returns false once stopped
    pub fn tick<C, R>(&mut self, ctx: &mut OrreryContext, controls: &mut C, renderer: &mut R) -> bool
    where
        C: CameraController,
        R: Renderer,
    {
        if self.state == LoopState::Stopped {
            return false;
        }

        controls.sync(&mut ctx.camera);
        advance_frame(&mut ctx.scene);
        // Copy so the whole pass sees one viewport snapshot.
        let viewport = ctx.viewport;
        renderer.render(&ctx.scene.graph, &ctx.camera, viewport);
        self.frames += 1;
        true
    }
}

/// [`Renderer`] writing arena world transforms onto the mesh entities
///
/// Bevy reconfigures the window swapchain on its own after a resize; the
/// main camera's projection is kept on the same aspect here.
#[derive(SystemParam)]
pub struct SceneRenderer<'w, 's> {
    nodes: Query<'w, 's, (&'static SceneNode, &'static mut Transform), Without<MainCamera>>,
    projections: Query<'w, 's, &'static mut Projection, With<MainCamera>>,
}

impl SceneRenderer<'_, '_> {
    fn set_aspect(&mut self, aspect: f32) {
        for mut projection in &mut self.projections {
            if let Projection::Perspective(perspective) = &mut *projection {
                if perspective.aspect_ratio != aspect {
                    perspective.aspect_ratio = aspect;
                }
            }
        }
    }
}

impl Renderer for SceneRenderer<'_, '_> {
    fn render(&mut self, graph: &SceneGraph, camera: &CameraState, _viewport: ViewportState) {
        let world = graph.world_transforms();
        for (node, mut transform) in &mut self.nodes {
            if let Some(affine) = world.get(node.0.index()) {
                *transform = Transform::from_matrix(Mat4::from(*affine));
            }
        }
        self.set_aspect(camera.aspect);
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        self.set_aspect(width as f32 / height.max(1) as f32);
    }
}

/// Plugin driving the scene once per frame
pub struct RenderLoopPlugin;

impl Plugin for RenderLoopPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderLoop>()
            .add_systems(Update, stop_on_escape)
            .add_systems(
                PostUpdate,
                run_frame
                    .after(PanOrbitCameraSystemSet)
                    // The projection aspect is written here, so Bevy's camera
                    // update has to see it in the same frame.
                    .before(bevy::camera::CameraUpdateSystems)
                    // Mesh transforms must be final before Bevy propagates them.
                    .before(TransformSystems::Propagate),
            );
    }
}

fn run_frame(
    mut render_loop: ResMut<RenderLoop>,
    mut ctx: ResMut<OrreryContext>,
    mut controls: PanOrbitControls,
    mut renderer: SceneRenderer,
) {
    render_loop.tick(&mut ctx, &mut controls, &mut renderer);
}

fn stop_on_escape(
    keys: Res<ButtonInput<KeyCode>>,
    mut render_loop: ResMut<RenderLoop>,
    mut exit: MessageWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        render_loop.stop();
        exit.write(AppExit::Success);
    }
}
