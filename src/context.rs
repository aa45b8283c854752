//! Application context shared by the scheduler, animation and viewport code

use bevy::prelude::*;

use crate::bodies::BodyTable;
use crate::camera::{CameraSettings, CameraState};
use crate::config::OrreryConfig;
use crate::error::ConfigResult;
use crate::scene::Scene;
use crate::viewport::ViewportState;

/// Simulation state (scene) and view state (camera, viewport) in one place
///
/// Only ever touched from the main schedule, one system at a time.
#[derive(Resource, Debug, Clone)]
pub struct OrreryContext {
    pub bodies: BodyTable,
    pub scene: Scene,
    pub camera_settings: CameraSettings,
    pub camera: CameraState,
    pub viewport: ViewportState,
}

impl OrreryContext {
    /// Validate the bodies and build the scene; fails before anything renders
    pub fn from_config(config: &OrreryConfig) -> ConfigResult<Self> {
        let bodies = BodyTable::from_config(&config.system, &mut config.phase_source())?;
        let scene = Scene::from_table(&bodies);
        let viewport = ViewportState::default();
        Ok(Self {
            camera: CameraState::new(&config.camera, viewport),
            camera_settings: config.camera.clone(),
            bodies,
            scene,
            viewport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_context_from_default_config() {
        let ctx = OrreryContext::from_config(&OrreryConfig::deterministic(2)).unwrap();
        assert_eq!(ctx.bodies.len(), 9);
        assert_eq!(ctx.scene.rigs().count(), 9);
        assert_eq!(ctx.camera.aspect, ctx.viewport.aspect());
        assert_eq!(ctx.camera.position, Vec3::new(0.0, 50.0, 200.0));
    }

    #[test]
    fn test_same_seed_gives_same_scene() {
        let a = OrreryContext::from_config(&OrreryConfig::deterministic(8)).unwrap();
        let b = OrreryContext::from_config(&OrreryConfig::deterministic(8)).unwrap();
        assert_eq!(a.scene.graph.world_transforms(), b.scene.graph.world_transforms());
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = OrreryConfig::deterministic(1);
        config.system.orbiting[0].radius = -2.0;
        let err = OrreryContext::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveRadius { .. }));
    }
}
