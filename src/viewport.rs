//! Viewport manager
//!
//! Keeps the output surface size, the camera aspect ratio and the renderer's
//! backing buffer in step whenever the host window is resized.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::context::OrreryContext;
use crate::render_loop::{Renderer, SceneRenderer};

/// Output surface dimensions in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
}

impl ViewportState {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Applied,
    /// Same size as before; nothing touched
    Unchanged,
    /// Zero-sized payload, dropped
    Rejected,
}

/// Apply a new surface size to the viewport, camera and renderer
///
/// Safe to call at any frequency. A repeated size is a no-op and a
/// zero-sized payload is dropped without effect.
pub fn on_resize<R: Renderer>(ctx: &mut OrreryContext, renderer: &mut R, width: u32, height: u32) -> ResizeOutcome {
    if width == 0 || height == 0 {
        debug!("Dropping resize to {}x{}", width, height);
        return ResizeOutcome::Rejected;
    }

    let viewport = ViewportState::new(width, height);
    if ctx.viewport == viewport && ctx.camera.aspect == viewport.aspect() {
        return ResizeOutcome::Unchanged;
    }

    ctx.viewport = viewport;
    ctx.camera.aspect = viewport.aspect();
    renderer.resize_surface(width, height);
    debug!("Viewport resized to {}x{}", width, height);
    ResizeOutcome::Applied
}

/// Plugin applying window resizes between frames
pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_viewport)
            .add_systems(Update, handle_window_resized);
    }
}

fn init_viewport(
    mut ctx: ResMut<OrreryContext>,
    mut renderer: SceneRenderer,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        warn!("init_viewport: primary window not found");
        return;
    };
    let (width, height) = (window.physical_width(), window.physical_height());
    on_resize(&mut ctx, &mut renderer, width, height);
}

/// Resize events queue up during a frame; only the latest per frame matters.
fn handle_window_resized(
    mut events: MessageReader<WindowResized>,
    mut ctx: ResMut<OrreryContext>,
    mut renderer: SceneRenderer,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(latest) = events.read().filter(|e| windows.contains(e.window)).last() else {
        return;
    };
    let Ok(window) = windows.get(latest.window) else {
        return;
    };
    on_resize(
        &mut ctx,
        &mut renderer,
        window.physical_width(),
        window.physical_height(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_loop::tests::RecordingRenderer;

    fn context() -> OrreryContext {
        OrreryContext::from_config(&crate::config::OrreryConfig::deterministic(1)).unwrap()
    }

    #[test]
    fn test_resize_updates_viewport_camera_and_surface() {
        let mut ctx = context();
        let mut renderer = RecordingRenderer::default();
        on_resize(&mut ctx, &mut renderer, 800, 600);

        let before = ctx.scene.graph.world_transforms();
        let outcome = on_resize(&mut ctx, &mut renderer, 1600, 900);

        assert_eq!(outcome, ResizeOutcome::Applied);
        assert_eq!(ctx.viewport, ViewportState::new(1600, 900));
        assert_eq!(ctx.camera.aspect, 1600.0 / 900.0);
        assert!((ctx.camera.aspect - 1.778).abs() < 1e-3);
        assert_eq!(renderer.surface, Some((1600, 900)));
        assert_eq!(ctx.scene.graph.world_transforms(), before);
    }

    #[test]
    fn test_repeated_resize_is_idempotent() {
        let mut ctx = context();
        let mut renderer = RecordingRenderer::default();

        assert_eq!(on_resize(&mut ctx, &mut renderer, 1024, 768), ResizeOutcome::Applied);
        let viewport = ctx.viewport;
        let aspect = ctx.camera.aspect;

        assert_eq!(on_resize(&mut ctx, &mut renderer, 1024, 768), ResizeOutcome::Unchanged);
        assert_eq!(ctx.viewport, viewport);
        assert_eq!(ctx.camera.aspect, aspect);
        assert_eq!(renderer.resizes, 1);
    }

    #[test]
    fn test_zero_sized_resize_is_dropped() {
        let mut ctx = context();
        let mut renderer = RecordingRenderer::default();
        on_resize(&mut ctx, &mut renderer, 640, 480);

        assert_eq!(on_resize(&mut ctx, &mut renderer, 0, 480), ResizeOutcome::Rejected);
        assert_eq!(on_resize(&mut ctx, &mut renderer, 640, 0), ResizeOutcome::Rejected);
        assert_eq!(ctx.viewport, ViewportState::new(640, 480));
        assert_eq!(renderer.surface, Some((640, 480)));
    }

    #[test]
    fn test_aspect_always_matches_last_resize() {
        let mut ctx = context();
        let mut renderer = RecordingRenderer::default();
        for (w, h) in [(1, 1), (1920, 1080), (333, 777), (3840, 1600), (1920, 1080)] {
            on_resize(&mut ctx, &mut renderer, w, h);
            assert_eq!(ctx.camera.aspect, w as f32 / h as f32);
            assert_eq!(renderer.surface, Some((w, h)));
        }
    }
}
