//! Dry-run preview of a small topology
//!
//! Constructs components against an in-memory engine and prints the
//! declared resource graph as JSON, without touching any provider.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example preview
//! ```

use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use stratus_aws::{
    Bucket, BucketOptions, Naming, NamingOptions, RdsDatabase, RdsDatabaseOptions,
};
use stratus_graph::{
    document_json, ExternalHandle, ExternalQuery, GraphError, PolicyStatement, ResourceEngine,
    ResourceGraph, ResourceHandle, ResourceNode, Result,
};

/// Records declarations instead of provisioning them
struct PreviewEngine {
    graph: Mutex<ResourceGraph>,
}

impl PreviewEngine {
    fn new() -> Self {
        Self {
            graph: Mutex::new(ResourceGraph::new()),
        }
    }

    fn graph(&self) -> ResourceGraph {
        self.graph.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceEngine for PreviewEngine {
    async fn declare(&self, node: ResourceNode) -> Result<ResourceHandle> {
        let handle = ResourceHandle::new(&node.name, format!("preview-{}", node.name))
            .with_attribute("arn", json!(format!("arn:aws:preview:::{}", node.name)));
        self.graph.lock().unwrap().insert(node)?;
        Ok(handle)
    }

    async fn lookup(&self, query: ExternalQuery) -> Result<ExternalHandle> {
        Err(GraphError::NotFound(query.key()))
    }

    async fn caller_identity(&self) -> Result<String> {
        Ok("000000000000".to_string())
    }

    async fn assemble_policy(&self, statements: &[PolicyStatement]) -> Result<String> {
        document_json(statements)
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let engine = PreviewEngine::new();

    let naming = Naming::new(NamingOptions {
        env_name: "staging".to_string(),
        app_name: "demo".to_string(),
        purpose: None,
    });

    Bucket::create(
        &engine,
        &format!("{}-assets", naming.full_name),
        BucketOptions {
            bucket_name: format!("{}-assets", naming.full_name),
            tags: naming.default_tags.clone(),
            ..BucketOptions::default()
        },
    )
    .await?;

    RdsDatabase::create(
        &engine,
        &format!("{}-db", naming.full_name),
        RdsDatabaseOptions {
            name: format!("{}-db", naming.full_name),
            db_name: "demo".to_string(),
            username: "demo".to_string(),
            password: "change-me".to_string(),
            engine_version: None,
            tags: naming.default_tags,
        },
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&engine.graph())?);
    Ok(())
}
