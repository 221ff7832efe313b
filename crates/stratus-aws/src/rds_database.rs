//! Database instance behind its own security group

use crate::rds::{Rds, RdsOptions};
use crate::security_group::{SecurityGroup, SecurityGroupOptions, SecurityGroupRuleOptions};
use serde::{Deserialize, Serialize};
use stratus_graph::{ComponentName, ResourceEngine, Result, Tags};

const POSTGRES_PORT: u16 = 5432;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdsDatabaseOptions {
    pub name: String,
    pub db_name: String,
    pub username: String,
    pub password: String,
    pub engine_version: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

/// A `SecurityGroup` scoped to the database port, wired into an `Rds`
/// instance
///
/// The group must resolve before the instance is declared: the instance's
/// security-group membership is exactly the group's id.
#[derive(Debug, Clone)]
pub struct RdsDatabase {
    pub security_group: SecurityGroup,
    pub rds: Rds,
}

impl RdsDatabase {
    pub async fn create(
        engine: &dyn ResourceEngine,
        name: &str,
        options: RdsDatabaseOptions,
    ) -> Result<Self> {
        let name = ComponentName::new(name);

        let security_group = SecurityGroup::create(
            engine,
            &name.child("db-sg"),
            SecurityGroupOptions {
                name: options.name.clone(),
                description: Some(format!("Security Group for {}", options.name)),
                vpc_id: None,
                ingress: SecurityGroupRuleOptions {
                    from_port: POSTGRES_PORT,
                    to_port: POSTGRES_PORT,
                    protocol: "tcp".to_string(),
                    cidr_blocks: None,
                },
                egress: SecurityGroupRuleOptions {
                    from_port: 0,
                    to_port: 0,
                    protocol: "-1".to_string(),
                    cidr_blocks: None,
                },
                tags: options.tags.clone(),
            },
        )
        .await?;

        let rds = Rds::create(
            engine,
            &name.child("rds"),
            RdsOptions {
                name: options.db_name,
                identifier: options.name,
                username: options.username,
                password: options.password,
                instance_class: None,
                engine: None,
                engine_version: Some(
                    options
                        .engine_version
                        .unwrap_or_else(|| "12.7".to_string()),
                ),
                parameter_group_name: None,
                storage_type: None,
                allocated_storage: None,
                max_allocated_storage: None,
                vpc_security_group_ids: vec![security_group.security_group.id.clone()],
                tags: options.tags,
            },
        )
        .await?;

        Ok(Self {
            security_group,
            rds,
        })
    }
}
