use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use super::error::SceneError;
use super::node::{Node, NodeId, NodeKind, Transform};
use crate::camera::Camera;

/// Arena-backed scene tree.
///
/// Node 0 is an implicit root group. Nodes are only ever created as a child of
/// an existing group, so every node has exactly one parent and the structure
/// stays a tree. Nothing is removed for the lifetime of the graph.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    names: HashMap<String, NodeId>,
}

impl SceneGraph {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: None,
                transform: Transform::IDENTITY,
                kind: NodeKind::Group,
                parent: None,
                children: Vec::new(),
            }],
            names: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Creates a node under `parent`, which must be the root or a group
    pub fn add(
        &mut self,
        parent: NodeId,
        name: Option<String>,
        transform: Transform,
        kind: NodeKind,
    ) -> Result<NodeId, SceneError> {
        let parent_node = self
            .nodes
            .get(parent.0)
            .ok_or(SceneError::MissingNode(parent))?;
        if !parent_node.can_own_children() {
            return Err(SceneError::NotAGroup(parent));
        }
        if let Some(name) = &name {
            if self.names.contains_key(name) {
                return Err(SceneError::DuplicateName(name.clone()));
            }
        }

        let id = NodeId(self.nodes.len());
        if let Some(name) = &name {
            self.names.insert(name.clone(), id);
        }
        self.nodes.push(Node {
            name,
            transform,
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);

        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.get(id).map(|node| &node.transform)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.get_mut(id).map(|node| &mut node.transform)
    }

    pub fn camera(&self, id: NodeId) -> Option<&Camera> {
        match &self.get(id)?.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Camera payload and its transform, borrowed mutably together
    pub fn camera_parts_mut(&mut self, id: NodeId) -> Option<(&mut Camera, &mut Transform)> {
        let node = self.get_mut(id)?;
        match &mut node.kind {
            NodeKind::Camera(camera) => Some((camera, &mut node.transform)),
            _ => None,
        }
    }

    /// Composition of all transforms from the root down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = self.get(id);
        while let Some(node) = cursor {
            matrix = node.transform.matrix() * matrix;
            cursor = node.parent.and_then(|parent| self.get(parent));
        }
        matrix
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// World rotation of the node's parent (identity for root children)
    pub fn parent_world_rotation(&self, id: NodeId) -> Quat {
        match self.get(id).and_then(|node| node.parent) {
            Some(parent) => {
                let (_, rotation, _) = self.world_matrix(parent).to_scale_rotation_translation();
                rotation
            }
            None => Quat::IDENTITY,
        }
    }

    /// World matrices for every node, indexed by `NodeId::index`
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut out = vec![Mat4::IDENTITY; self.nodes.len()];
        for (id, _, world) in self.traverse() {
            out[id.0] = world;
        }
        out
    }

    /// Depth-first walk from the root yielding each node with its world matrix
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            graph: self,
            stack: vec![(Self::ROOT, Mat4::IDENTITY)],
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Traverse<'a> {
    graph: &'a SceneGraph,
    stack: Vec<(NodeId, Mat4)>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = (NodeId, &'a Node, Mat4);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, parent_world) = self.stack.pop()?;
        let node = &self.graph.nodes[id.0];
        let world = parent_world * node.transform.matrix();

        // Reverse so children come out in insertion order
        self.stack
            .extend(node.children.iter().rev().map(|&child| (child, world)));

        Some((id, node, world))
    }
}
