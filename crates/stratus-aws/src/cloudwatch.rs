//! Log group component

use serde::{Deserialize, Serialize};
use serde_json::json;
use stratus_graph::{
    ComponentName, GraphError, ResourceEngine, ResourceHandle, ResourceNode, ResourceType, Result,
    Tags,
};

/// Retention periods the provider accepts for log groups; 0 means never
/// expire.
const RETENTION_IN_DAYS: &[u32] = &[
    0, 1, 3, 5, 7, 14, 30, 60, 90, 120, 150, 180, 365, 400, 545, 731, 1827, 3653,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudWatchOptions {
    pub name: String,
    pub retention_in_days: Option<u32>,
    #[serde(default)]
    pub tags: Tags,
}

/// A log group with an optional retention policy
#[derive(Debug, Clone)]
pub struct CloudWatch {
    pub log_group: ResourceHandle,
}

impl CloudWatch {
    pub async fn create(
        engine: &dyn ResourceEngine,
        name: &str,
        options: CloudWatchOptions,
    ) -> Result<Self> {
        let name = ComponentName::new(name);

        if let Some(retention) = options.retention_in_days {
            if !RETENTION_IN_DAYS.contains(&retention) {
                return Err(GraphError::InvalidConfig(format!(
                    "log group retention of {retention} days is not an accepted value"
                )));
            }
        }

        let log_group = engine
            .declare(ResourceNode::new(
                ResourceType::LogGroup,
                name.child("log-group"),
                name.as_str(),
                json!({
                    "name": options.name,
                    "retention_in_days": options.retention_in_days,
                    "tags": options.tags,
                }),
            ))
            .await?;

        Ok(Self { log_group })
    }
}
