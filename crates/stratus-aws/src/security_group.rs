//! Network security group component

use serde::{Deserialize, Serialize};
use serde_json::json;
use stratus_graph::{
    ComponentName, ResourceEngine, ResourceHandle, ResourceNode, ResourceType, Result, Tags,
};

const OPEN_CIDR: &str = "0.0.0.0/0";

/// One direction of traffic; `cidr_blocks` defaults to the open CIDR, so
/// callers needing restriction must supply explicit blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityGroupRuleOptions {
    pub from_port: u16,
    pub to_port: u16,
    pub protocol: String,
    pub cidr_blocks: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityGroupOptions {
    pub name: String,
    pub description: Option<String>,
    pub vpc_id: Option<String>,
    pub ingress: SecurityGroupRuleOptions,
    pub egress: SecurityGroupRuleOptions,
    #[serde(default)]
    pub tags: Tags,
}

/// A security group plus exactly one ingress and one egress rule
#[derive(Debug, Clone)]
pub struct SecurityGroup {
    pub security_group: ResourceHandle,
    pub ingress_rule: ResourceHandle,
    pub egress_rule: ResourceHandle,
}

impl SecurityGroup {
    pub async fn create(
        engine: &dyn ResourceEngine,
        name: &str,
        options: SecurityGroupOptions,
    ) -> Result<Self> {
        let name = ComponentName::new(name);
        let description = options
            .description
            .clone()
            .unwrap_or_else(|| format!("{} SecurityGroup", options.name));

        let security_group = engine
            .declare(ResourceNode::new(
                ResourceType::SecurityGroup,
                name.child("security-group"),
                name.as_str(),
                json!({
                    "name": options.name,
                    "description": description,
                    "vpc_id": options.vpc_id,
                    "tags": options.tags,
                }),
            ))
            .await?;

        let ingress_rule = Self::declare_rule(
            engine,
            &name,
            "ingress",
            &security_group,
            &options.ingress,
        )
        .await?;
        let egress_rule =
            Self::declare_rule(engine, &name, "egress", &security_group, &options.egress).await?;

        Ok(Self {
            security_group,
            ingress_rule,
            egress_rule,
        })
    }

    async fn declare_rule(
        engine: &dyn ResourceEngine,
        name: &ComponentName,
        direction: &str,
        group: &ResourceHandle,
        rule: &SecurityGroupRuleOptions,
    ) -> Result<ResourceHandle> {
        let cidr_blocks = rule
            .cidr_blocks
            .clone()
            .unwrap_or_else(|| vec![OPEN_CIDR.to_string()]);

        engine
            .declare(
                ResourceNode::new(
                    ResourceType::SecurityGroupRule,
                    name.child(direction),
                    name.as_str(),
                    json!({
                        "type": direction,
                        "security_group_id": group.id,
                        "from_port": rule.from_port,
                        "to_port": rule.to_port,
                        "protocol": rule.protocol,
                        "cidr_blocks": cidr_blocks,
                    }),
                )
                .with_dependency(&group.node),
            )
            .await
    }
}
