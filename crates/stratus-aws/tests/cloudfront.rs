mod common;

use common::MockEngine;
use serde_json::json;
use stratus_aws::{Cloudfront, CloudfrontOptions};

fn options() -> CloudfrontOptions {
    CloudfrontOptions {
        aliases: vec!["www.example.com".to_string()],
        origin_id: "s3Origin".to_string(),
        regional_domain_name: "assets.s3.eu-west-1.amazonaws.com".to_string(),
        origin_access_identity_path: "origin-access-identity/cloudfront/E123".to_string(),
        certificate_arn: None,
        origins: Vec::new(),
        ordered_cache_behaviors: Vec::new(),
        tags: Default::default(),
    }
}

#[tokio::test]
async fn storage_origin_is_always_first() {
    let engine = MockEngine::new();
    let mut opts = options();
    opts.origins = vec![json!({
        "domain_name": "api.example.com",
        "origin_id": "apiOrigin",
    })];
    Cloudfront::create(&engine, "cdn", opts).await.unwrap();

    let node = engine.node("cdn-distribution");
    let origins = node.properties["origins"].as_array().unwrap();
    assert_eq!(origins.len(), 2);
    assert_eq!(origins[0]["origin_id"], "s3Origin");
    assert_eq!(
        origins[0]["s3_origin_config"]["origin_access_identity"],
        "origin-access-identity/cloudfront/E123"
    );
    assert_eq!(origins[1]["origin_id"], "apiOrigin");
}

#[tokio::test]
async fn distribution_serves_spa_fallbacks_and_https() {
    let engine = MockEngine::new();
    Cloudfront::create(&engine, "cdn", options()).await.unwrap();

    let node = engine.node("cdn-distribution");
    assert_eq!(node.properties["enabled"], true);
    assert_eq!(node.properties["is_ipv6_enabled"], true);
    assert_eq!(node.properties["default_root_object"], "index.html");
    assert_eq!(node.properties["aliases"][0], "www.example.com");
    assert_eq!(
        node.properties["restrictions"]["geo_restriction"]["restriction_type"],
        "none"
    );

    let errors = node.properties["custom_error_responses"].as_array().unwrap();
    assert_eq!(errors.len(), 4);
    assert!(errors.iter().all(|e| e["response_page_path"] == "/index.html"));

    let behavior = &node.properties["default_cache_behavior"];
    assert_eq!(behavior["allowed_methods"], json!(["GET", "HEAD"]));
    assert_eq!(behavior["forwarded_values"]["cookies"]["forward"], "none");
}
