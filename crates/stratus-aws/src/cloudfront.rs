//! CDN distribution component

use serde::{Deserialize, Serialize};
use serde_json::json;
use stratus_graph::{
    ComponentName, ResourceEngine, ResourceHandle, ResourceNode, ResourceType, Result, Tags,
};

/// Error codes rewritten to the SPA fallback page
const SPA_FALLBACK_ERROR_CODES: &[u16] = &[400, 403, 404, 500];
const SPA_FALLBACK_CACHE_TTL: u32 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudfrontOptions {
    #[serde(default)]
    pub aliases: Vec<String>,
    pub origin_id: String,
    pub regional_domain_name: String,
    pub origin_access_identity_path: String,
    pub certificate_arn: Option<String>,
    /// Additional origins appended after the storage origin
    #[serde(default)]
    pub origins: Vec<serde_json::Value>,
    /// Caller-supplied cache behaviors; the default behavior never caches
    #[serde(default)]
    pub ordered_cache_behaviors: Vec<serde_json::Value>,
    #[serde(default)]
    pub tags: Tags,
}

/// A CDN distribution fronting a storage bucket
#[derive(Debug, Clone)]
pub struct Cloudfront {
    pub distribution: ResourceHandle,
}

impl Cloudfront {
    pub async fn create(
        engine: &dyn ResourceEngine,
        name: &str,
        options: CloudfrontOptions,
    ) -> Result<Self> {
        let name = ComponentName::new(name);

        let mut origins = vec![Self::storage_origin(&options)];
        origins.extend(options.origins.iter().cloned());

        let distribution = engine
            .declare(ResourceNode::new(
                ResourceType::Distribution,
                name.child("distribution"),
                name.as_str(),
                json!({
                    "enabled": true,
                    "is_ipv6_enabled": true,
                    "wait_for_deployment": true,
                    "default_root_object": "index.html",
                    "ordered_cache_behaviors": options.ordered_cache_behaviors,
                    "aliases": options.aliases,
                    "origins": origins,
                    "restrictions": Self::restrictions(),
                    "viewer_certificate": Self::viewer_certificate(options.certificate_arn.as_deref()),
                    "default_cache_behavior": Self::default_cache_behavior(&options.origin_id),
                    "custom_error_responses": Self::error_responses(),
                    "tags": options.tags,
                }),
            ))
            .await?;

        Ok(Self { distribution })
    }

    fn storage_origin(options: &CloudfrontOptions) -> serde_json::Value {
        json!({
            "domain_name": options.regional_domain_name,
            "origin_id": options.origin_id,
            "s3_origin_config": {
                "origin_access_identity": options.origin_access_identity_path,
            },
        })
    }

    fn error_responses() -> Vec<serde_json::Value> {
        SPA_FALLBACK_ERROR_CODES
            .iter()
            .map(|&error_code| {
                json!({
                    "error_code": error_code,
                    "error_caching_min_ttl": SPA_FALLBACK_CACHE_TTL,
                    "response_code": 200,
                    "response_page_path": "/index.html",
                })
            })
            .collect()
    }

    fn viewer_certificate(certificate_arn: Option<&str>) -> serde_json::Value {
        match certificate_arn {
            Some(arn) => json!({
                "acm_certificate_arn": arn,
                "cloudfront_default_certificate": false,
                "ssl_support_method": "sni-only",
                "minimum_protocol_version": "TLSv1.2_2021",
            }),
            None => json!({ "cloudfront_default_certificate": true }),
        }
    }

    fn restrictions() -> serde_json::Value {
        json!({ "geo_restriction": { "restriction_type": "none" } })
    }

    // No caching by default; callers opt in via ordered_cache_behaviors.
    fn default_cache_behavior(origin_id: &str) -> serde_json::Value {
        json!({
            "target_origin_id": origin_id,
            "viewer_protocol_policy": "redirect-to-https",
            "allowed_methods": ["GET", "HEAD"],
            "cached_methods": ["GET", "HEAD"],
            "forwarded_values": {
                "query_string": false,
                "cookies": { "forward": "none" },
            },
            "min_ttl": 0,
            "max_ttl": 0,
            "default_ttl": 0,
            "compress": true,
        })
    }
}
