//! Scene graph construction from the body table

use std::f32::consts::FRAC_PI_2;

use bevy::math::{Quat, Vec3};

use crate::bodies::{BodyDescriptor, BodyTable};
use crate::scene::graph::{NodeId, NodeKind, SceneGraph};

/// Fixed tilt laying a ring into its body's equatorial plane
pub fn ring_tilt() -> Quat {
    Quat::from_rotation_x(FRAC_PI_2)
}

/// Nodes created for one body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyNodes {
    /// Absent only for the central body
    pub orbit: Option<NodeId>,
    pub body: NodeId,
    pub ring: Option<NodeId>,
}

/// A body's nodes plus the per-frame increments that drive them
#[derive(Debug, Clone)]
pub struct BodyRig {
    pub name: String,
    pub nodes: BodyNodes,
    pub axial_rate: f32,
    pub revolution_rate: f32,
}

/// The arena together with the rigs animating it
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub graph: SceneGraph,
    pub central: Option<BodyRig>,
    pub orbiting: Vec<BodyRig>,
}

impl Scene {
    /// Build the full hierarchy for a validated table
    pub fn from_table(table: &BodyTable) -> Self {
        let mut graph = SceneGraph::new();

        let central = table.central();
        let central_nodes = attach_central(&mut graph, &central.descriptor);
        let central = rig(&central.name, central_nodes, &central.descriptor);

        let orbiting = table
            .orbiting()
            .iter()
            .map(|entry| {
                let nodes = build_body(&mut graph, &entry.descriptor);
                rig(&entry.name, nodes, &entry.descriptor)
            })
            .collect();

        Self {
            graph,
            central: Some(central),
            orbiting,
        }
    }

    /// Central rig first, then orbiting rigs
    pub fn rigs(&self) -> impl Iterator<Item = &BodyRig> {
        self.central.iter().chain(self.orbiting.iter())
    }

    pub fn rig(&self, name: &str) -> Option<&BodyRig> {
        self.rigs().find(|rig| rig.name == name)
    }
}

fn rig(name: &str, nodes: BodyNodes, descriptor: &BodyDescriptor) -> BodyRig {
    BodyRig {
        name: name.to_string(),
        nodes,
        axial_rate: descriptor.axial_rate,
        revolution_rate: descriptor.revolution_rate,
    }
}

/// Body node and optional ring, hung directly under `parent`
fn attach_body(graph: &mut SceneGraph, parent: NodeId, descriptor: &BodyDescriptor) -> (NodeId, Option<NodeId>) {
    let body = graph.add_child(
        parent,
        NodeKind::Body,
        Vec3::new(descriptor.distance, 0.0, 0.0),
        Quat::IDENTITY,
    );
    let ring = descriptor
        .ring
        .as_ref()
        .map(|_| graph.add_child(body, NodeKind::Ring, Vec3::ZERO, ring_tilt()));
    (body, ring)
}

/// Central body: owned by the root directly, no orbit pivot
pub fn attach_central(graph: &mut SceneGraph, descriptor: &BodyDescriptor) -> BodyNodes {
    let root = graph.root();
    let (body, ring) = attach_body(graph, root, descriptor);
    BodyNodes {
        orbit: None,
        body,
        ring,
    }
}

/// Orbiting body: a fresh pivot at the origin carrying the body at
/// `(distance, 0, 0)`, turned once by the body's initial phase
///
/// Calling this twice for the same descriptor yields two independent
/// subtrees.
pub fn build_body(graph: &mut SceneGraph, descriptor: &BodyDescriptor) -> BodyNodes {
    let root = graph.root();
    let orbit = graph.add_child(root, NodeKind::Orbit, Vec3::ZERO, Quat::IDENTITY);
    let (body, ring) = attach_body(graph, orbit, descriptor);
    graph.rotate(orbit, descriptor.initial_phase);
    BodyNodes {
        orbit: Some(orbit),
        body,
        ring,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{BodyConfig, PhaseSource, RingDescriptor, SystemConfig, defaults};

    fn descriptor(distance: f32, ring: bool) -> BodyDescriptor {
        BodyDescriptor {
            radius: 1.0,
            distance,
            axial_rate: 0.02,
            revolution_rate: 0.05,
            ring: ring.then(|| RingDescriptor {
                inner_radius: 2.0,
                outer_radius: 3.0,
                tilt_rate: 0.0,
                texture: None,
            }),
            initial_phase: 0.0,
            texture: None,
        }
    }

    #[test]
    fn test_build_body_places_body_at_distance() {
        let mut graph = SceneGraph::new();
        let nodes = build_body(&mut graph, &descriptor(10.0, false));
        let orbit = nodes.orbit.expect("orbiting body has a pivot");

        assert_eq!(graph[orbit].kind(), NodeKind::Orbit);
        assert_eq!(graph[orbit].parent(), Some(graph.root()));
        assert_eq!(graph[orbit].offset(), Vec3::ZERO);
        assert_eq!(graph[nodes.body].parent(), Some(orbit));
        assert_eq!(graph[nodes.body].offset(), Vec3::new(10.0, 0.0, 0.0));
        assert!(nodes.ring.is_none());
    }

    #[test]
    fn test_build_body_applies_initial_phase_once() {
        let mut graph = SceneGraph::new();
        let mut desc = descriptor(10.0, false);
        desc.initial_phase = 1.25;
        let nodes = build_body(&mut graph, &desc);
        assert!((graph[nodes.orbit.unwrap()].angle() - 1.25).abs() < 1e-6);
        assert_eq!(graph[nodes.body].angle(), 0.0);
    }

    #[test]
    fn test_ring_is_child_of_body_with_fixed_tilt() {
        let mut graph = SceneGraph::new();
        let nodes = build_body(&mut graph, &descriptor(10.0, true));
        let ring = nodes.ring.expect("ring requested");

        assert_eq!(graph[ring].kind(), NodeKind::Ring);
        assert_eq!(graph[ring].parent(), Some(nodes.body));
        assert_eq!(graph[ring].tilt(), ring_tilt());
        assert_eq!(graph[ring].offset(), Vec3::ZERO);
    }

    #[test]
    fn test_building_twice_gives_independent_subtrees() {
        let mut graph = SceneGraph::new();
        let desc = descriptor(10.0, true);
        let a = build_body(&mut graph, &desc);
        let b = build_body(&mut graph, &desc);

        assert_ne!(a.orbit, b.orbit);
        assert_ne!(a.body, b.body);
        assert_ne!(a.ring, b.ring);
        assert_eq!(graph.count(NodeKind::Orbit), 2);
        assert_eq!(graph[graph.root()].children().len(), 2);
    }

    #[test]
    fn test_central_body_hangs_from_root() {
        let mut graph = SceneGraph::new();
        let nodes = attach_central(&mut graph, &descriptor(0.0, false));
        assert!(nodes.orbit.is_none());
        assert_eq!(graph[nodes.body].parent(), Some(graph.root()));
    }

    #[test]
    fn test_scene_is_tree_shaped() {
        let table = BodyTable::from_config(&defaults::solar_system(), &mut PhaseSource::seeded(3)).unwrap();
        let scene = Scene::from_table(&table);
        let graph = &scene.graph;

        assert_eq!(graph.count(NodeKind::Root), 1);
        assert_eq!(graph.count(NodeKind::Orbit), table.orbiting().len());
        assert_eq!(graph.count(NodeKind::Body), table.len());
        assert_eq!(graph.count(NodeKind::Ring), 2);

        // Exactly one body has no orbit parent: the central one.
        let unpivoted: Vec<_> = graph
            .iter()
            .filter(|(_, node)| node.kind() == NodeKind::Body)
            .filter(|(_, node)| node.parent().map(|p| graph[p].kind()) != Some(NodeKind::Orbit))
            .map(|(id, _)| id)
            .collect();
        assert_eq!(unpivoted, vec![scene.central.as_ref().unwrap().nodes.body]);

        // Every node other than the root is listed by exactly one parent.
        let mut listed = vec![0usize; graph.len()];
        for (_, node) in graph.iter() {
            for child in node.children() {
                listed[child.index()] += 1;
            }
        }
        for (id, node) in graph.iter() {
            let expected = if node.kind() == NodeKind::Root { 0 } else { 1 };
            assert_eq!(listed[id.index()], expected, "node {:?}", id);
        }
    }

    #[test]
    fn test_scene_rig_lookup() {
        let config = SystemConfig {
            central: BodyConfig::new("central", 1.0).spin(0.01),
            orbiting: vec![BodyConfig::new("body_a", 1.0).orbit(10.0, 0.05).spin(0.02)],
        };
        let table = BodyTable::from_config(&config, &mut PhaseSource::fixed(vec![0.0])).unwrap();
        let scene = Scene::from_table(&table);

        let rig = scene.rig("body_a").expect("rig exists");
        assert_eq!(rig.revolution_rate, 0.05);
        assert_eq!(rig.axial_rate, 0.02);
        assert!(scene.rig("central").unwrap().nodes.orbit.is_none());
        assert_eq!(scene.rigs().count(), 2);
    }
}
