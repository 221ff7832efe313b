//! Task execution role for the container orchestration service

use serde::{Deserialize, Serialize};
use serde_json::json;
use stratus_graph::{
    ComponentName, PolicyStatement, Principal, ResourceEngine, ResourceHandle, ResourceNode,
    ResourceType, Result, Tags,
};

const ECS_TASKS_SERVICE_PRINCIPAL: &str = "ecs-tasks.amazonaws.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcsTaskRoleOptions {
    pub name: String,
    #[serde(default)]
    pub tags: Tags,
}

/// An execution role trusted by the container task service principal
#[derive(Debug, Clone)]
pub struct EcsTaskRole {
    pub role: ResourceHandle,
}

impl EcsTaskRole {
    pub async fn create(
        engine: &dyn ResourceEngine,
        name: &str,
        options: EcsTaskRoleOptions,
    ) -> Result<Self> {
        let name = ComponentName::new(name);

        let trust_policy = engine.assemble_policy(&[Self::trust_statement()]).await?;

        let role = engine
            .declare(ResourceNode::new(
                ResourceType::Role,
                name.child("role"),
                name.as_str(),
                json!({
                    "name": format!("{}-task-role", options.name),
                    "assume_role_policy": trust_policy,
                    "tags": options.tags,
                }),
            ))
            .await?;

        Ok(Self { role })
    }

    fn trust_statement() -> PolicyStatement {
        PolicyStatement::new("ECSTrustPolicy")
            .with_action("sts:AssumeRole")
            .with_principal(Principal::service(ECS_TASKS_SERVICE_PRINCIPAL))
    }
}
