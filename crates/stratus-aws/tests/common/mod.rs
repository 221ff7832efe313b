//! In-memory engine used by the component construction tests
//!
//! Declared nodes land in a [`ResourceGraph`]; handles echo the node's
//! properties as attributes and synthesize the provider-computed ones
//! (IDs, ARNs, domain names) the way the real provider would.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use stratus_graph::{
    document_json, ExternalHandle, ExternalQuery, GraphError, PolicyStatement, ResourceEngine,
    ResourceGraph, ResourceHandle, ResourceNode, ResourceType, Result,
};

pub struct MockEngine {
    graph: Mutex<ResourceGraph>,
    lookups: Mutex<HashMap<String, ExternalHandle>>,
    account_id: String,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            graph: Mutex::new(ResourceGraph::new()),
            lookups: Mutex::new(HashMap::new()),
            account_id: "123456789012".to_string(),
        }
    }

    pub fn with_lookup(self, query: ExternalQuery, handle: ExternalHandle) -> Self {
        self.lookups.lock().unwrap().insert(query.key(), handle);
        self
    }

    pub fn graph(&self) -> ResourceGraph {
        self.graph.lock().unwrap().clone()
    }

    pub fn node(&self, name: &str) -> ResourceNode {
        self.graph
            .lock()
            .unwrap()
            .get(name)
            .unwrap_or_else(|| panic!("node {name} was not declared"))
            .clone()
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    fn synthesize_handle(node: &ResourceNode) -> ResourceHandle {
        let id = format!("{}-id", node.name);
        let mut handle = ResourceHandle::new(&node.name, &id);

        if let Some(properties) = node.properties.as_object() {
            for (key, value) in properties {
                handle.attributes.insert(key.clone(), value.clone());
            }
        }
        handle
            .attributes
            .insert("arn".to_string(), json!(format!("arn:aws:mock:::{}", node.name)));

        match node.resource_type {
            ResourceType::Bucket => {
                let bucket_name = node.properties["bucket"].as_str().unwrap_or("bucket");
                handle.attributes.insert(
                    "regional_domain_name".to_string(),
                    json!(format!("{bucket_name}.s3.eu-west-1.amazonaws.com")),
                );
            }
            ResourceType::OriginAccessIdentity => {
                handle.attributes.insert(
                    "iam_arn".to_string(),
                    json!(format!("arn:aws:iam::cloudfront:user/{}", node.name)),
                );
                handle.attributes.insert(
                    "cloudfront_access_identity_path".to_string(),
                    json!(format!("origin-access-identity/cloudfront/{id}")),
                );
            }
            ResourceType::Distribution => {
                handle
                    .attributes
                    .insert("domain_name".to_string(), json!(format!("{id}.cloudfront.net")));
            }
            _ => {}
        }

        handle
    }
}

#[async_trait]
impl ResourceEngine for MockEngine {
    async fn declare(&self, node: ResourceNode) -> Result<ResourceHandle> {
        let handle = Self::synthesize_handle(&node);
        self.graph.lock().unwrap().insert(node)?;
        Ok(handle)
    }

    async fn lookup(&self, query: ExternalQuery) -> Result<ExternalHandle> {
        self.lookups
            .lock()
            .unwrap()
            .get(&query.key())
            .cloned()
            .ok_or_else(|| GraphError::NotFound(query.key()))
    }

    async fn caller_identity(&self) -> Result<String> {
        Ok(self.account_id.clone())
    }

    async fn assemble_policy(&self, statements: &[PolicyStatement]) -> Result<String> {
        document_json(statements)
    }
}

pub fn cluster_handle(name: &str) -> ExternalHandle {
    ExternalHandle::new(format!("{name}-cluster-id"))
        .with_attribute("arn", json!(format!("arn:aws:ecs:::cluster/{name}")))
}

pub fn autoscaling_group_handle(name: &str) -> ExternalHandle {
    ExternalHandle::new(format!("{name}-asg-id"))
        .with_attribute("arn", json!(format!("arn:aws:autoscaling:::{name}")))
}

pub fn load_balancer_handle(name: &str) -> ExternalHandle {
    ExternalHandle::new(format!("{name}-lb-id"))
        .with_attribute("arn", json!(format!("arn:aws:elasticloadbalancing:::{name}")))
        .with_attribute("dns_name", json!(format!("{name}.elb.amazonaws.com")))
}

pub fn listener_handle(load_balancer_arn: &str, port: u16) -> ExternalHandle {
    ExternalHandle::new(format!("listener-{port}-id")).with_attribute(
        "arn",
        json!(format!("{load_balancer_arn}/listener/{port}")),
    )
}

pub fn hosted_zone_handle(zone_id: &str) -> ExternalHandle {
    ExternalHandle::new(zone_id).with_attribute("name", json!("example.com."))
}

pub fn certificate_handle(domain: &str) -> ExternalHandle {
    ExternalHandle::new(format!("cert-{domain}"))
        .with_attribute("arn", json!(format!("arn:aws:acm:::certificate/{domain}")))
}
