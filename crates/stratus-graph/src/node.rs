//! Declared resource nodes and the handles returned for them

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Provider resource types in the fixed catalog
///
/// Components only ever declare these types; the apply engine maps them to
/// concrete provider API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    SecurityGroup,
    SecurityGroupRule,
    Bucket,
    BucketPolicy,
    BucketPublicAccessBlock,
    OriginAccessIdentity,
    Distribution,
    LogGroup,
    Role,
    DbInstance,
    TargetGroup,
    ListenerRule,
    AutoscalingAttachment,
    EcsService,
    AppautoscalingTarget,
    AppautoscalingPolicy,
    MetricAlarm,
    ScheduledAction,
    Record,
}

impl ResourceType {
    /// Canonical `aws:<service>:<kind>` type string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::SecurityGroup => "aws:ec2:security-group",
            ResourceType::SecurityGroupRule => "aws:ec2:security-group-rule",
            ResourceType::Bucket => "aws:s3:bucket",
            ResourceType::BucketPolicy => "aws:s3:bucket-policy",
            ResourceType::BucketPublicAccessBlock => "aws:s3:bucket-public-access-block",
            ResourceType::OriginAccessIdentity => "aws:cloudfront:origin-access-identity",
            ResourceType::Distribution => "aws:cloudfront:distribution",
            ResourceType::LogGroup => "aws:cloudwatch:log-group",
            ResourceType::Role => "aws:iam:role",
            ResourceType::DbInstance => "aws:rds:instance",
            ResourceType::TargetGroup => "aws:lb:target-group",
            ResourceType::ListenerRule => "aws:lb:listener-rule",
            ResourceType::AutoscalingAttachment => "aws:autoscaling:attachment",
            ResourceType::EcsService => "aws:ecs:service",
            ResourceType::AppautoscalingTarget => "aws:appautoscaling:target",
            ResourceType::AppautoscalingPolicy => "aws:appautoscaling:policy",
            ResourceType::MetricAlarm => "aws:cloudwatch:metric-alarm",
            ResourceType::ScheduledAction => "aws:appautoscaling:scheduled-action",
            ResourceType::Record => "aws:route53:record",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single declared infrastructure resource
///
/// Nodes are immutable once declared: changes come from constructing a new
/// graph, never from mutating an existing node. `depends_on` is a
/// creation-order contract consumed by the apply engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Provider resource type
    pub resource_type: ResourceType,

    /// Composite node name (`<component-name>-<resource-suffix>`), unique
    /// within a graph
    pub name: String,

    /// Name of the owning component (lifecycle/output scoping)
    pub owner: String,

    /// Resource-specific configuration
    pub properties: serde_json::Value,

    /// Names of nodes that must exist before this one is created
    pub depends_on: Vec<String>,

    /// Property keys the apply engine must not reconcile on later runs
    /// (e.g. a desired count driven by external scaling actions)
    pub ignore_changes: Vec<String>,
}

impl ResourceNode {
    pub fn new(
        resource_type: ResourceType,
        name: impl Into<String>,
        owner: impl Into<String>,
        properties: serde_json::Value,
    ) -> Self {
        Self {
            resource_type,
            name: name.into(),
            owner: owner.into(),
            properties,
            depends_on: Vec::new(),
            ignore_changes: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, node_name: impl Into<String>) -> Self {
        self.depends_on.push(node_name.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, node_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(node_names.into_iter().map(Into::into));
        self
    }

    pub fn with_ignore_changes(mut self, property: impl Into<String>) -> Self {
        self.ignore_changes.push(property.into());
        self
    }
}

/// Identity and attributes of a declared node, as reported by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceHandle {
    /// Name of the node this handle belongs to
    pub node: String,

    /// Provider-assigned resource ID
    pub id: String,

    /// Resource attributes (ARN, domain name, etc.)
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ResourceHandle {
    pub fn new(node: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            id: id.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Get an attribute as a specific type
    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get an attribute that downstream nodes cannot be built without
    pub fn require<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.attribute(key).ok_or_else(|| GraphError::MissingAttribute {
            node: self.node.clone(),
            attribute: key.to_string(),
        })
    }

    /// ARN attribute, required by most downstream references
    pub fn arn(&self) -> Result<String> {
        self.require("arn")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_strings_are_namespaced() {
        assert_eq!(ResourceType::Bucket.as_str(), "aws:s3:bucket");
        assert_eq!(
            ResourceType::ScheduledAction.to_string(),
            "aws:appautoscaling:scheduled-action"
        );
    }

    #[test]
    fn handle_require_fails_loudly_on_missing_attribute() {
        let handle = ResourceHandle::new("web-bucket", "web-bucket-id");
        let err = handle.require::<String>("arn").unwrap_err();
        assert!(matches!(err, GraphError::MissingAttribute { .. }));
    }

    #[test]
    fn handle_attribute_deserializes_typed_values() {
        let handle = ResourceHandle::new("web-bucket", "web-bucket-id")
            .with_attribute("arn", serde_json::json!("arn:aws:s3:::web"))
            .with_attribute("port", serde_json::json!(443));
        assert_eq!(handle.arn().unwrap(), "arn:aws:s3:::web");
        assert_eq!(handle.attribute::<u16>("port"), Some(443));
    }
}
