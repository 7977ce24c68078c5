use thiserror::Error;

use crate::entities::transform::NodeId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse configuration: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("configuration not found")]
    NotFound,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("{0:?} is not part of the scene")]
    UnknownNode(NodeId),
    #[error("the ground plane cannot be removed or reparented")]
    GroundPlane,
    #[error("the world matrix above {0:?} is not invertible")]
    NotInvertible(NodeId),
    #[error("{0:?} already has a model bound to it")]
    AlreadyBound(NodeId),
    #[error("no joint is selected")]
    NothingSelected,
    #[error("the cursor does not reach the drag plane")]
    MissedDragPlane,
    #[error("a joint named '{0}' already exists")]
    NameTaken(String),
}

#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("could not access hierarchy file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("line {line}: parent '{parent}' is not defined before its child")]
    UnknownParent { line: usize, parent: String },
    #[error("line {line}: joint '{name}' is defined twice")]
    DuplicateName { line: usize, name: String },
    #[error("there is no root joint to save")]
    NoRoot,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("could not import model: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("{0} contains no triangle geometry")]
    NoGeometry(String),
}
