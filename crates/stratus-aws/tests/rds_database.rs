mod common;

use common::MockEngine;
use stratus_aws::{RdsDatabase, RdsDatabaseOptions};
use stratus_graph::ResourceType;

fn options() -> RdsDatabaseOptions {
    RdsDatabaseOptions {
        name: "prod-app-db".to_string(),
        db_name: "app".to_string(),
        username: "app".to_string(),
        password: "hunter2".to_string(),
        engine_version: None,
        tags: Default::default(),
    }
}

#[tokio::test]
async fn database_sits_behind_its_own_security_group() {
    let engine = MockEngine::new();
    let database = RdsDatabase::create(&engine, "db", options()).await.unwrap();

    let graph = engine.graph();
    assert_eq!(graph.by_type(ResourceType::SecurityGroup).len(), 1);
    assert_eq!(graph.by_type(ResourceType::SecurityGroupRule).len(), 2);
    assert_eq!(graph.by_type(ResourceType::DbInstance).len(), 1);

    // Ingress is scoped to the database port; egress is wide open.
    let ingress = engine.node("db-db-sg-ingress");
    assert_eq!(ingress.properties["from_port"], 5432);
    assert_eq!(ingress.properties["to_port"], 5432);
    assert_eq!(ingress.properties["protocol"], "tcp");
    let egress = engine.node("db-db-sg-egress");
    assert_eq!(egress.properties["protocol"], "-1");

    let instance = engine.node("db-rds-instance");
    assert_eq!(
        instance.properties["vpc_security_group_ids"][0],
        database.security_group.security_group.id
    );
    assert_eq!(
        instance.properties["vpc_security_group_ids"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn instance_defaults_trade_durability_for_cost() {
    let engine = MockEngine::new();
    RdsDatabase::create(&engine, "db", options()).await.unwrap();

    let instance = engine.node("db-rds-instance");
    let props = &instance.properties;
    assert_eq!(props["engine"], "postgres");
    assert_eq!(props["engine_version"], "12.7");
    assert_eq!(props["parameter_group_name"], "default.postgres12");
    assert_eq!(props["instance_class"], "db.t2.micro");
    assert_eq!(props["storage_type"], "gp2");
    assert_eq!(props["allocated_storage"], 20);
    assert_eq!(props["max_allocated_storage"], 21);
    assert_eq!(props["multi_az"], false);
    assert_eq!(props["publicly_accessible"], true);
    assert_eq!(props["backup_retention_period"], 0);
    assert_eq!(props["skip_final_snapshot"], true);
    assert_eq!(props["identifier"], "prod-app-db");
    assert_eq!(props["db_name"], "app");
    assert_eq!(
        props["final_snapshot_identifier"],
        "prod-app-db-final-snapshot"
    );
}

#[tokio::test]
async fn engine_version_override_is_threaded_through() {
    let engine = MockEngine::new();
    let mut opts = options();
    opts.engine_version = Some("13.4".to_string());
    RdsDatabase::create(&engine, "db", opts).await.unwrap();

    let instance = engine.node("db-rds-instance");
    assert_eq!(instance.properties["engine_version"], "13.4");
}
