use thiserror::Error;

use super::node::NodeId;

/// Invalid scene configuration, reported before the render loop starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("geometry of `{node}`: {reason}")]
    InvalidGeometry { node: String, reason: String },

    #[error("camera: {0}")]
    InvalidCamera(String),

    #[error("light `{node}`: {reason}")]
    InvalidLight { node: String, reason: String },

    #[error("motion on `{node}`: {reason}")]
    InvalidMotion { node: String, reason: String },

    #[error("orbit controls: {0}")]
    InvalidControls(String),

    #[error("helper `{node}`: {reason}")]
    InvalidHelper { node: String, reason: String },

    #[error("no node named `{0}`")]
    UnknownNode(String),

    #[error("node name `{0}` is used more than once")]
    DuplicateName(String),

    #[error("node {0:?} does not exist in this graph")]
    MissingNode(NodeId),

    #[error("node {0:?} cannot own children; only groups can")]
    NotAGroup(NodeId),
}
