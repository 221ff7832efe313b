mod common;

use common::MockEngine;
use stratus_aws::{EcsTaskRole, EcsTaskRoleOptions};

#[tokio::test]
async fn role_is_trusted_by_the_task_service_principal() {
    let engine = MockEngine::new();
    EcsTaskRole::create(
        &engine,
        "api",
        EcsTaskRoleOptions {
            name: "prod-api".to_string(),
            tags: Default::default(),
        },
    )
    .await
    .unwrap();

    let node = engine.node("api-role");
    assert_eq!(node.properties["name"], "prod-api-task-role");

    let trust: serde_json::Value =
        serde_json::from_str(node.properties["assume_role_policy"].as_str().unwrap()).unwrap();
    let statement = &trust["Statement"][0];
    assert_eq!(statement["Sid"], "ECSTrustPolicy");
    assert_eq!(statement["Effect"], "Allow");
    assert_eq!(statement["Action"][0], "sts:AssumeRole");
    assert_eq!(statement["Principal"]["Service"][0], "ecs-tasks.amazonaws.com");
}
