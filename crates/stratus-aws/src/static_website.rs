//! Static website: bucket + CDN + optional DNS aliases

use crate::bucket::{Bucket, BucketOptions};
use crate::cloudfront::{Cloudfront, CloudfrontOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use stratus_graph::{
    ComponentName, ExternalQuery, GraphError, ResourceEngine, ResourceHandle, ResourceNode,
    ResourceType, Result, Tags,
};

const STORAGE_ORIGIN_ID: &str = "s3Origin";
const RECORD_TTL: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticWebsiteDomainOptions {
    pub domain: String,
    /// Look up the certificate for the apex domain instead of `*.<domain>`
    #[serde(default)]
    pub prevent_adding_wildcard: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticWebsiteRoute53Options {
    pub zone_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticWebsiteOptions {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub domain_options: Option<StaticWebsiteDomainOptions>,
    pub route53_options: Option<StaticWebsiteRoute53Options>,
    #[serde(default)]
    pub tags: Tags,
}

/// A private bucket fronted by a CDN, optionally aliased in DNS
///
/// When a custom domain is configured the TLS certificate must already
/// exist; a failed certificate lookup fails the whole component rather
/// than falling back to the platform certificate.
#[derive(Debug, Clone)]
pub struct StaticWebsite {
    pub storage: Bucket,
    pub cdn: Cloudfront,
    pub records: Vec<ResourceHandle>,
}

impl StaticWebsite {
    pub async fn create(
        engine: &dyn ResourceEngine,
        name: &str,
        options: StaticWebsiteOptions,
    ) -> Result<Self> {
        let name = ComponentName::new(name);

        let certificate_arn = match &options.domain_options {
            Some(domain_options) => {
                let domain = Self::certificate_domain(domain_options);
                let certificate = engine
                    .lookup(ExternalQuery::Certificate { domain: domain.clone() })
                    .await?;
                tracing::debug!(%domain, "resolved TLS certificate");
                Some(certificate.arn()?)
            }
            None => None,
        };

        let storage = Bucket::create(
            engine,
            &name.child("storage"),
            BucketOptions {
                bucket_name: options.name.clone(),
                create_origin_access_identity: true,
                tags: options.tags.clone(),
                ..BucketOptions::default()
            },
        )
        .await?;

        let oai = storage.oai.as_ref().ok_or_else(|| {
            GraphError::InvalidConfig("storage bucket produced no origin access identity".into())
        })?;

        let cdn = Cloudfront::create(
            engine,
            &name.child("cdn"),
            CloudfrontOptions {
                origin_access_identity_path: oai.require("cloudfront_access_identity_path")?,
                origin_id: STORAGE_ORIGIN_ID.to_string(),
                regional_domain_name: storage.bucket.require("regional_domain_name")?,
                aliases: options.aliases.clone(),
                certificate_arn,
                origins: Vec::new(),
                ordered_cache_behaviors: Vec::new(),
                tags: options.tags.clone(),
            },
        )
        .await?;

        let mut records = Vec::new();
        if let (Some(route53_options), false) = (&options.route53_options, options.aliases.is_empty())
        {
            // Record creation is gated on zone resolution.
            let zone = engine
                .lookup(ExternalQuery::HostedZone {
                    zone_id: route53_options.zone_id.clone(),
                })
                .await?;
            let distribution_domain: String = cdn.distribution.require("domain_name")?;

            for (idx, alias) in options.aliases.iter().enumerate() {
                let record = engine
                    .declare(
                        ResourceNode::new(
                            ResourceType::Record,
                            name.child(&format!("record-{idx}")),
                            name.as_str(),
                            json!({
                                "zone_id": zone.id,
                                "name": alias,
                                "type": "CNAME",
                                "ttl": RECORD_TTL,
                                "records": [distribution_domain],
                            }),
                        )
                        .with_dependency(&cdn.distribution.node),
                    )
                    .await?;
                records.push(record);
            }
        }

        Ok(Self {
            storage,
            cdn,
            records,
        })
    }

    fn certificate_domain(options: &StaticWebsiteDomainOptions) -> String {
        if options.prevent_adding_wildcard {
            options.domain.clone()
        } else {
            format!("*.{}", options.domain)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_domain_gets_wildcard_by_default() {
        let domain = StaticWebsite::certificate_domain(&StaticWebsiteDomainOptions {
            domain: "example.com".to_string(),
            prevent_adding_wildcard: false,
        });
        assert_eq!(domain, "*.example.com");
    }

    #[test]
    fn certificate_domain_stays_bare_when_wildcard_prevented() {
        let domain = StaticWebsite::certificate_domain(&StaticWebsiteDomainOptions {
            domain: "example.com".to_string(),
            prevent_adding_wildcard: true,
        });
        assert_eq!(domain, "example.com");
    }
}
