//! Graph construction error types

use thiserror::Error;

/// Errors surfaced while constructing a resource graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("External lookup failed for {query}: {reason}")]
    LookupFailed { query: String, reason: String },

    #[error("External resource not found: {0}")]
    NotFound(String),

    #[error("Duplicate resource node: {0}")]
    DuplicateNode(String),

    #[error("Node {node} is missing required attribute '{attribute}'")]
    MissingAttribute { node: String, attribute: String },

    #[error("Policy document assembly failed: {0}")]
    PolicyAssembly(String),

    #[error("Apply engine rejected {node}: {reason}")]
    Provisioning { node: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
