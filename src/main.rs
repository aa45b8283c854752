// Scale model of a star system: a luminous central body, orbiting bodies
// with their own spin and revolution rates, rings, and a starfield.

use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{RenderCreation, WgpuSettings};
use bevy::window::{PresentMode, Window, WindowPlugin};

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod animation;
mod bodies;
mod camera;
mod config;
mod context;
mod error;
mod render_loop;
mod scene;
mod starfield;
mod viewport;

use camera::CameraRigPlugin;
use config::OrreryConfig;
use context::OrreryContext;
use render_loop::RenderLoopPlugin;
use scene::ScenePlugin;
use starfield::StarfieldPlugin;
use viewport::ViewportPlugin;

fn main() -> anyhow::Result<()> {
    let (config, source) = OrreryConfig::load()?;
    // Invalid bodies abort here, before a window ever opens.
    let ctx = OrreryContext::from_config(&config)?;

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: config.window_title.clone(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(RenderPlugin {
                render_creation: RenderCreation::Automatic(WgpuSettings { ..default() }),
                ..default()
            }),
    );

    match &source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("Using built-in star system"),
    }
    info!(
        "{} bodies, {} orbiting",
        ctx.bodies.len(),
        ctx.bodies.orbiting().len()
    );

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    app.insert_resource(ctx);
    app.add_plugins(CameraRigPlugin);
    app.add_plugins(ScenePlugin);
    app.add_plugins(ViewportPlugin);
    app.add_plugins(RenderLoopPlugin);
    app.add_plugins(StarfieldPlugin {
        faces: config.starfield.clone(),
    });

    app.run();
    Ok(())
}
