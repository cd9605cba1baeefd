//! Error types for the schema builder
//!
//! Builder mutations never fail: invalid arguments are dropped silently.
//! Errors only surface when a tree is rendered, checked, or when
//! configuration is loaded and saved.

use thiserror::Error;

use crate::arena::NodeId;

/// Result type for schema builder operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema builder errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unknown node {0}: handle belongs to another arena or was never allocated")]
    UnknownNode(NodeId),

    #[error("Cycle detected in node graph at node {node}")]
    Cycle { node: NodeId },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
