//! Arena of transform nodes
//!
//! Nodes are addressed by integer handles and only ever gain children, so
//! the graph stays a tree rooted at [`SceneGraph::root`]. World transforms
//! are composed top-down by an explicit traversal.

use std::f64::consts::TAU;
use std::ops::Index;

use bevy::math::{Affine3A, Quat, Vec3};

/// Handle to a node inside one [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    /// Revolution pivot at its parent's origin
    Orbit,
    /// Body mesh, spinning about its local up axis
    Body,
    /// Ring mesh with a fixed tilt relative to its body
    Ring,
}

/// One transform in the arena
///
/// Local transform is `translate(offset) * rotate_y(angle) * tilt`. The
/// angle accumulates in `f64` so per-frame rounding stays below what a
/// long-running animation could ever show.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    offset: Vec3,
    angle: f64,
    tilt: Quat,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Accumulated rotation about the up axis, in `[0, 2π)`
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn tilt(&self) -> Quat {
        self.tilt
    }

    pub fn local_transform(&self) -> Affine3A {
        Affine3A::from_rotation_translation(
            Quat::from_rotation_y(self.angle as f32) * self.tilt,
            self.offset,
        )
    }
}

/// Wrap an angle into `[0, 2π)`
///
/// Wrapping by whole turns leaves the rendered orientation unchanged.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
                offset: Vec3::ZERO,
                angle: 0.0,
                tilt: Quat::IDENTITY,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new node under `parent` and return its handle
    pub fn add_child(&mut self, parent: NodeId, kind: NodeKind, offset: Vec3, tilt: Quat) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            offset,
            angle: 0.0,
            tilt,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Advance a node's rotation about the up axis by `delta` radians
    pub fn rotate(&mut self, id: NodeId, delta: f32) {
        let node = &mut self.nodes[id.0];
        node.angle = wrap_angle(node.angle + f64::from(delta));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// Compose every node's world transform, indexed by [`NodeId::index`]
    pub fn world_transforms(&self) -> Vec<Affine3A> {
        let mut world = vec![Affine3A::IDENTITY; self.nodes.len()];
        let mut stack = vec![(self.root(), Affine3A::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            let node_world = parent_world * node.local_transform();
            world[id.0] = node_world;
            for &child in &node.children {
                stack.push((child, node_world));
            }
        }
        world
    }

    /// World-space position of a node's origin
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        let mut transform = Affine3A::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            transform = node.local_transform() * transform;
            current = node.parent;
        }
        transform.translation.into()
    }
}

impl Index<NodeId> for SceneGraph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_new_graph_has_only_root() {
        let graph = SceneGraph::new();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph[graph.root()].kind(), NodeKind::Root);
        assert!(graph[graph.root()].parent().is_none());
    }

    #[test]
    fn test_add_child_links_both_directions() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let pivot = graph.add_child(root, NodeKind::Orbit, Vec3::ZERO, Quat::IDENTITY);
        let body = graph.add_child(pivot, NodeKind::Body, Vec3::X * 10.0, Quat::IDENTITY);

        assert_eq!(graph[pivot].parent(), Some(root));
        assert_eq!(graph[body].parent(), Some(pivot));
        assert_eq!(graph[root].children(), &[pivot]);
        assert_eq!(graph[pivot].children(), &[body]);
    }

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        assert!(wrap_angle(-1e-9) < TAU);
    }

    #[test]
    fn test_rotate_wraps_without_changing_orientation() {
        let mut graph = SceneGraph::new();
        let body = graph.add_child(graph.root(), NodeKind::Body, Vec3::ZERO, Quat::IDENTITY);
        graph.rotate(body, 3.0);
        graph.rotate(body, 3.0);
        graph.rotate(body, 3.0);
        let angle = graph[body].angle();
        assert!((0.0..TAU).contains(&angle));

        let expected = Quat::from_rotation_y(9.0);
        let actual = graph[body].local_transform().to_scale_rotation_translation().1;
        assert!(
            actual.angle_between(expected) < 1e-4,
            "wrapped rotation should match unwrapped rotation"
        );
    }

    #[test]
    fn test_many_small_rotations_do_not_drift() {
        let mut graph = SceneGraph::new();
        let body = graph.add_child(graph.root(), NodeKind::Body, Vec3::ZERO, Quat::IDENTITY);
        let rate = 0.5568_f32;
        let frames = 2_000_000_u32;
        for _ in 0..frames {
            graph.rotate(body, rate);
        }
        let expected = wrap_angle(f64::from(frames) * f64::from(rate));
        let gap = (graph[body].angle() - expected).abs();
        assert!(gap.min(TAU - gap) < 1e-6, "drifted by {} rad", gap);
    }

    #[test]
    fn test_world_transforms_compose_parent_first() {
        let mut graph = SceneGraph::new();
        let pivot = graph.add_child(graph.root(), NodeKind::Orbit, Vec3::ZERO, Quat::IDENTITY);
        let body = graph.add_child(pivot, NodeKind::Body, Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY);

        // Quarter turn about +Y carries +X onto -Z.
        graph.rotate(pivot, FRAC_PI_2);
        let world = graph.world_transforms();
        let position = Vec3::from(world[body.index()].translation);
        assert!(position.distance(Vec3::new(0.0, 0.0, -10.0)) < 1e-4, "got {}", position);
        assert!(graph.world_position(body).distance(position) < 1e-4);

        // Spinning the body itself never moves it.
        graph.rotate(body, PI);
        assert!(graph.world_position(body).distance(position) < 1e-4);
    }

    #[test]
    fn test_tilt_applies_after_spin() {
        let mut graph = SceneGraph::new();
        let body = graph.add_child(graph.root(), NodeKind::Body, Vec3::ZERO, Quat::IDENTITY);
        let ring = graph.add_child(body, NodeKind::Ring, Vec3::ZERO, Quat::from_rotation_x(FRAC_PI_2));

        graph.rotate(body, 1.0);
        let world = graph.world_transforms();
        // Ring's local +Z normal rotated 90° about X lands on -Y regardless of spin.
        let normal = world[ring.index()].transform_vector3(Vec3::Z);
        assert!(normal.distance(Vec3::NEG_Y) < 1e-5, "got {}", normal);
    }

    #[test]
    fn test_count_by_kind() {
        let mut graph = SceneGraph::new();
        let pivot = graph.add_child(graph.root(), NodeKind::Orbit, Vec3::ZERO, Quat::IDENTITY);
        graph.add_child(pivot, NodeKind::Body, Vec3::X, Quat::IDENTITY);
        graph.add_child(graph.root(), NodeKind::Body, Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(graph.count(NodeKind::Orbit), 1);
        assert_eq!(graph.count(NodeKind::Body), 2);
        assert_eq!(graph.count(NodeKind::Ring), 0);
    }
}
