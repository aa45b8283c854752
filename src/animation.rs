//! Per-frame animation step
//!
//! Increments are fixed per call, so apparent speed follows the achieved
//! frame rate rather than wall-clock time.

use crate::scene::Scene;

/// Advance every body by one frame
///
/// Spins each body node by its axial rate and turns each orbit pivot by its
/// revolution rate. Must be called exactly once per scheduled frame.
pub fn advance_frame(scene: &mut Scene) {
    let Scene {
        graph,
        central,
        orbiting,
    } = scene;

    for rig in central.iter().chain(orbiting.iter()) {
        if let Some(orbit) = rig.nodes.orbit {
            graph.rotate(orbit, rig.revolution_rate);
        }
        graph.rotate(rig.nodes.body, rig.axial_rate);
    }
}
