//! Scene graph: arena of nodes, primitive geometry, time-driven motions and
//! the one-shot builder that turns a [`crate::config::SceneConfig`] into a
//! [`BuiltScene`].

mod builder;
mod error;
mod geometry;
mod graph;
mod motion;
mod node;

pub use builder::{BuiltScene, CameraView, LookAt, SceneBuilder, SceneHandles, CAMERA_NAME};
pub use error::SceneError;
pub use geometry::{Geometry, MeshData, MAX_SEGMENTS};
pub use graph::{SceneGraph, Traverse};
pub use motion::{Animation, Motion, Oscillation};
pub use node::{Helper, Light, LightKind, Material, Mesh, Node, NodeId, NodeKind, Shading, Transform};
