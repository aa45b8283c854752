//! Camera rig: perspective camera driven by a pan-orbit controller
//!
//! The controller owns the camera's position and orientation; simulation
//! code only ever reads them back through [`CameraController::sync`].

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};
use serde::{Deserialize, Serialize};

use crate::context::OrreryContext;
use crate::viewport::ViewportState;

/// Marker for the camera the scene is rendered through
#[derive(Component)]
pub struct MainCamera;

/// Projection and initial framing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 50.0, 200.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Spherical camera pose around a focus point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPose {
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraSettings {
    /// Express the initial position as yaw/pitch/radius about the target
    ///
    /// Yaw is measured from +Z toward +X, pitch upward from the XZ plane.
    pub fn orbit_pose(&self) -> OrbitPose {
        let offset = Vec3::from(self.position) - Vec3::from(self.target);
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return OrbitPose {
                radius: 0.0,
                yaw: 0.0,
                pitch: 0.0,
            };
        }
        OrbitPose {
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
        }
    }
}

/// View state read by the render pass
///
/// `aspect` is always recomputed from the viewport, never set on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    pub aspect: f32,
}

impl CameraState {
    pub fn new(settings: &CameraSettings, viewport: ViewportState) -> Self {
        Self {
            position: Vec3::from(settings.position),
            target: Vec3::from(settings.target),
            aspect: viewport.aspect(),
        }
    }
}

/// Camera-control collaborator
pub trait CameraController {
    /// Reconcile controller-owned position and focus into `camera`
    fn sync(&mut self, camera: &mut CameraState);
}

/// [`CameraController`] backed by the main camera's pan-orbit component
#[derive(SystemParam)]
pub struct PanOrbitControls<'w, 's> {
    cameras: Query<'w, 's, (&'static Transform, &'static PanOrbitCamera), With<MainCamera>>,
}

impl CameraController for PanOrbitControls<'_, '_> {
    fn sync(&mut self, camera: &mut CameraState) {
        if let Ok((transform, pan_orbit)) = self.cameras.single() {
            camera.position = transform.translation;
            camera.target = pan_orbit.focus;
        }
    }
}

/// Plugin for the main camera and its controller
pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanOrbitCameraPlugin)
            .add_systems(Startup, spawn_main_camera);
    }
}

fn spawn_main_camera(mut commands: Commands, ctx: Res<OrreryContext>) {
    let settings = &ctx.camera_settings;
    let pose = settings.orbit_pose();

    let pan_orbit = PanOrbitCamera {
        focus: ctx.camera.target,
        radius: Some(pose.radius),
        yaw: Some(pose.yaw),
        pitch: Some(pose.pitch),
        force_update: true,
        ..default()
    };

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: settings.fov_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
            aspect_ratio: ctx.camera.aspect,
            ..default()
        }),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        pan_orbit,
        MainCamera,
        Transform::from_translation(ctx.camera.position).looking_at(ctx.camera.target, Vec3::Y),
        Name::new("Main Camera"),
    ));
}
