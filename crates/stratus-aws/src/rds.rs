//! Managed database instance component

use serde::{Deserialize, Serialize};
use serde_json::json;
use stratus_graph::{
    ComponentName, ResourceEngine, ResourceHandle, ResourceNode, ResourceType, Result, Tags,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdsOptions {
    /// Database name inside the instance
    pub name: String,
    pub identifier: String,
    pub username: String,
    pub password: String,
    pub instance_class: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub parameter_group_name: Option<String>,
    pub storage_type: Option<String>,
    pub allocated_storage: Option<u32>,
    pub max_allocated_storage: Option<u32>,
    pub vpc_security_group_ids: Vec<String>,
    #[serde(default)]
    pub tags: Tags,
}

/// A single managed database instance
///
/// Defaults trade durability for cost: no multi-AZ, no backups, no final
/// snapshot, publicly accessible. Not a production posture.
#[derive(Debug, Clone)]
pub struct Rds {
    pub instance: ResourceHandle,
}

impl Rds {
    pub async fn create(engine: &dyn ResourceEngine, name: &str, options: RdsOptions) -> Result<Self> {
        let name = ComponentName::new(name);

        let instance = engine
            .declare(ResourceNode::new(
                ResourceType::DbInstance,
                name.child("instance"),
                name.as_str(),
                json!({
                    "engine": options.engine.as_deref().unwrap_or("postgres"),
                    "parameter_group_name": options
                        .parameter_group_name
                        .as_deref()
                        .unwrap_or("default.postgres12"),
                    "engine_version": options.engine_version.as_deref().unwrap_or("12.7"),
                    "identifier": options.identifier,
                    "username": options.username,
                    "password": options.password,
                    "instance_class": options.instance_class.as_deref().unwrap_or("db.t2.micro"),
                    "storage_type": options.storage_type.as_deref().unwrap_or("gp2"),
                    "allocated_storage": options.allocated_storage.unwrap_or(20),
                    "max_allocated_storage": options.max_allocated_storage.unwrap_or(21),
                    "vpc_security_group_ids": options.vpc_security_group_ids,
                    "db_name": options.name,
                    "multi_az": false,
                    "publicly_accessible": true,
                    "backup_retention_period": 0,
                    "skip_final_snapshot": true,
                    "final_snapshot_identifier": format!("{}-final-snapshot", options.identifier),
                    "tags": options.tags,
                }),
            ))
            .await?;

        Ok(Self { instance })
    }
}
