//! Apply-engine abstraction and external-reference lookups

use crate::error::{GraphError, Result};
use crate::node::{ResourceHandle, ResourceNode};
use crate::policy::PolicyStatement;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lookup query for a resource this system does not own
///
/// Resolution is read-only: it never creates or mutates the referenced
/// resource, and a missing resource fails the whole owning component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ExternalQuery {
    EcsCluster { name: String },
    AutoscalingGroup { name: String },
    LoadBalancer { name: String },
    LoadBalancerListener { load_balancer_arn: String, port: u16 },
    HostedZone { zone_id: String },
    Certificate { domain: String },
}

impl ExternalQuery {
    /// Stable key used for registries and error messages
    pub fn key(&self) -> String {
        match self {
            ExternalQuery::EcsCluster { name } => format!("ecs-cluster:{name}"),
            ExternalQuery::AutoscalingGroup { name } => format!("autoscaling-group:{name}"),
            ExternalQuery::LoadBalancer { name } => format!("load-balancer:{name}"),
            ExternalQuery::LoadBalancerListener {
                load_balancer_arn,
                port,
            } => format!("listener:{load_balancer_arn}:{port}"),
            ExternalQuery::HostedZone { zone_id } => format!("hosted-zone:{zone_id}"),
            ExternalQuery::Certificate { domain } => format!("certificate:{domain}"),
        }
    }
}

impl std::fmt::Display for ExternalQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Read-only handle to a pre-existing external resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalHandle {
    /// Provider-assigned ID of the referenced resource
    pub id: String,

    /// Attributes of the referenced resource (ARN, DNS name, etc.)
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ExternalHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn require<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.attribute(key).ok_or_else(|| GraphError::MissingAttribute {
            node: self.id.clone(),
            attribute: key.to_string(),
        })
    }

    pub fn arn(&self) -> Result<String> {
        self.require("arn")
    }
}

/// The external apply engine, seen from graph construction
///
/// Components declare nodes and resolve external references through this
/// trait; diffing, provisioning, retries, and state all live behind it.
/// Declaration returns once the node is registered and its identity is
/// known to downstream nodes.
#[async_trait]
pub trait ResourceEngine: Send + Sync {
    /// Register a declared node and return its identity/attribute bag
    async fn declare(&self, node: ResourceNode) -> Result<ResourceHandle>;

    /// Resolve a pre-existing external resource
    async fn lookup(&self, query: ExternalQuery) -> Result<ExternalHandle>;

    /// Resolve the caller account ID
    async fn caller_identity(&self) -> Result<String>;

    /// Assemble an IAM policy document from an ordered statement list
    ///
    /// Must accept an empty list and produce a valid empty document.
    async fn assemble_policy(&self, statements: &[PolicyStatement]) -> Result<String>;
}
