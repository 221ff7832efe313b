mod common;

use common::{certificate_handle, hosted_zone_handle, MockEngine};
use stratus_aws::{
    StaticWebsite, StaticWebsiteDomainOptions, StaticWebsiteOptions, StaticWebsiteRoute53Options,
};
use stratus_graph::{ExternalQuery, GraphError, ResourceType};

fn options(name: &str) -> StaticWebsiteOptions {
    StaticWebsiteOptions {
        name: name.to_string(),
        aliases: Vec::new(),
        domain_options: None,
        route53_options: None,
        tags: Default::default(),
    }
}

#[tokio::test]
async fn wires_bucket_identity_into_the_distribution() {
    let engine = MockEngine::new();
    let site = StaticWebsite::create(&engine, "site", options("prod-landing"))
        .await
        .unwrap();

    let oai = site.storage.oai.expect("storage bucket should have an oai");
    let distribution = engine.node("site-cdn-distribution");
    let origin = &distribution.properties["origins"][0];
    assert_eq!(origin["origin_id"], "s3Origin");
    assert_eq!(
        origin["domain_name"],
        "prod-landing.s3.eu-west-1.amazonaws.com"
    );
    assert_eq!(
        origin["s3_origin_config"]["origin_access_identity"],
        oai.attribute::<String>("cloudfront_access_identity_path")
            .unwrap()
    );

    // No custom domain: the platform certificate is used.
    assert_eq!(
        distribution.properties["viewer_certificate"]["cloudfront_default_certificate"],
        true
    );
    assert!(site.records.is_empty());
}

#[tokio::test]
async fn certificate_lookup_uses_wildcard_domain_by_default() {
    let engine = MockEngine::new().with_lookup(
        ExternalQuery::Certificate {
            domain: "*.example.com".to_string(),
        },
        certificate_handle("*.example.com"),
    );

    StaticWebsite::create(
        &engine,
        "site",
        StaticWebsiteOptions {
            domain_options: Some(StaticWebsiteDomainOptions {
                domain: "example.com".to_string(),
                prevent_adding_wildcard: false,
            }),
            ..options("prod-landing")
        },
    )
    .await
    .unwrap();

    let distribution = engine.node("site-cdn-distribution");
    let certificate = &distribution.properties["viewer_certificate"];
    assert_eq!(
        certificate["acm_certificate_arn"],
        "arn:aws:acm:::certificate/*.example.com"
    );
    assert_eq!(certificate["ssl_support_method"], "sni-only");
}

#[tokio::test]
async fn prevent_adding_wildcard_looks_up_the_bare_domain() {
    let engine = MockEngine::new().with_lookup(
        ExternalQuery::Certificate {
            domain: "example.com".to_string(),
        },
        certificate_handle("example.com"),
    );

    StaticWebsite::create(
        &engine,
        "site",
        StaticWebsiteOptions {
            domain_options: Some(StaticWebsiteDomainOptions {
                domain: "example.com".to_string(),
                prevent_adding_wildcard: true,
            }),
            ..options("prod-landing")
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn missing_certificate_fails_construction() {
    let engine = MockEngine::new();
    let err = StaticWebsite::create(
        &engine,
        "site",
        StaticWebsiteOptions {
            domain_options: Some(StaticWebsiteDomainOptions {
                domain: "example.com".to_string(),
                prevent_adding_wildcard: false,
            }),
            ..options("prod-landing")
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, GraphError::NotFound(_)));
    // Nothing was declared: the component fails as a unit.
    assert!(engine.graph().is_empty());
}

#[tokio::test]
async fn aliases_become_records_once_the_zone_resolves() {
    let engine = MockEngine::new().with_lookup(
        ExternalQuery::HostedZone {
            zone_id: "Z123".to_string(),
        },
        hosted_zone_handle("Z123"),
    );

    let site = StaticWebsite::create(
        &engine,
        "site",
        StaticWebsiteOptions {
            aliases: vec!["www.example.com".to_string(), "example.com".to_string()],
            route53_options: Some(StaticWebsiteRoute53Options {
                zone_id: "Z123".to_string(),
            }),
            ..options("prod-landing")
        },
    )
    .await
    .unwrap();

    assert_eq!(site.records.len(), 2);
    let graph = engine.graph();
    assert_eq!(graph.by_type(ResourceType::Record).len(), 2);

    let record = engine.node("site-record-0");
    assert_eq!(record.properties["zone_id"], "Z123");
    assert_eq!(record.properties["name"], "www.example.com");
    assert_eq!(record.properties["type"], "CNAME");
    assert_eq!(record.properties["ttl"], 5);
    assert_eq!(
        record.properties["records"][0],
        "site-cdn-distribution-id.cloudfront.net"
    );
    assert!(record
        .depends_on
        .contains(&"site-cdn-distribution".to_string()));
}

#[tokio::test]
async fn no_records_without_route53_options() {
    let engine = MockEngine::new();
    let site = StaticWebsite::create(
        &engine,
        "site",
        StaticWebsiteOptions {
            aliases: vec!["www.example.com".to_string()],
            ..options("prod-landing")
        },
    )
    .await
    .unwrap();

    assert!(site.records.is_empty());
    assert!(engine.graph().by_type(ResourceType::Record).is_empty());
}
