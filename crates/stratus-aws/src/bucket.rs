//! Object-storage bucket with policy and public-access defaults

use serde::{Deserialize, Serialize};
use serde_json::json;
use stratus_graph::{
    ComponentName, Effect, PolicyStatement, Principal, ResourceEngine, ResourceHandle,
    ResourceNode, ResourceType, Result, Tags,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketOptions {
    pub bucket_name: String,
    #[serde(default)]
    pub disable_server_side_encryption: bool,
    #[serde(default)]
    pub disable_ssl_requests_only: bool,
    #[serde(default)]
    pub create_origin_access_identity: bool,
    #[serde(default)]
    pub disable_public_access_block: bool,
    #[serde(default)]
    pub tags: Tags,
}

/// A bucket with encryption on, SSL-only access, and public access blocked
/// unless explicitly disabled
///
/// The policy document is the ordered concatenation of the statements whose
/// triggering configuration is set; a document with zero statements is
/// still attached.
#[derive(Debug, Clone)]
pub struct Bucket {
    pub bucket: ResourceHandle,
    pub oai: Option<ResourceHandle>,
    pub bucket_policy: ResourceHandle,
    pub public_access_block: Option<ResourceHandle>,
}

impl Bucket {
    pub async fn create(
        engine: &dyn ResourceEngine,
        name: &str,
        options: BucketOptions,
    ) -> Result<Self> {
        let name = ComponentName::new(name);

        // The access identity comes first: the policy statement builder
        // below needs its IAM ARN.
        let oai = if options.create_origin_access_identity {
            Some(
                engine
                    .declare(ResourceNode::new(
                        ResourceType::OriginAccessIdentity,
                        name.child("oai"),
                        name.as_str(),
                        json!({ "comment": options.bucket_name }),
                    ))
                    .await?,
            )
        } else {
            None
        };

        let server_side_encryption_configuration = if options.disable_server_side_encryption {
            serde_json::Value::Null
        } else {
            json!({
                "rule": {
                    "apply_server_side_encryption_by_default": { "sse_algorithm": "AES256" }
                }
            })
        };

        let bucket = engine
            .declare(ResourceNode::new(
                ResourceType::Bucket,
                name.child("bucket"),
                name.as_str(),
                json!({
                    "bucket": options.bucket_name,
                    "force_destroy": true,
                    "server_side_encryption_configuration": server_side_encryption_configuration,
                    "tags": options.tags,
                }),
            ))
            .await?;

        let bucket_arn = bucket.arn()?;

        let mut statements = Vec::new();
        if let Some(oai) = &oai {
            statements.push(Self::oai_read_statement(&bucket_arn, oai)?);
        }
        if !options.disable_ssl_requests_only {
            statements.push(Self::ssl_requests_only_statement(&bucket_arn));
        }

        let policy = engine.assemble_policy(&statements).await?;

        let mut policy_node = ResourceNode::new(
            ResourceType::BucketPolicy,
            name.child("bucket-policy"),
            name.as_str(),
            json!({
                "bucket": bucket.id,
                "policy": policy,
            }),
        )
        .with_dependency(&bucket.node);
        if let Some(oai) = &oai {
            policy_node = policy_node.with_dependency(&oai.node);
        }
        let bucket_policy = engine.declare(policy_node).await?;

        let public_access_block = if options.disable_public_access_block {
            None
        } else {
            Some(
                engine
                    .declare(
                        ResourceNode::new(
                            ResourceType::BucketPublicAccessBlock,
                            name.child("public-access-block"),
                            name.as_str(),
                            json!({
                                "bucket": bucket.id,
                                "block_public_acls": true,
                                "block_public_policy": true,
                                "ignore_public_acls": true,
                                "restrict_public_buckets": true,
                            }),
                        )
                        .with_dependency(&bucket.node),
                    )
                    .await?,
            )
        };

        Ok(Self {
            bucket,
            oai,
            bucket_policy,
            public_access_block,
        })
    }

    fn oai_read_statement(bucket_arn: &str, oai: &ResourceHandle) -> Result<PolicyStatement> {
        let iam_arn: String = oai.require("iam_arn")?;
        Ok(PolicyStatement::new("CloudfrontOriginAccessIdentity")
            .with_action("s3:GetObject")
            .with_resource(format!("{bucket_arn}/*"))
            .with_principal(Principal::aws(iam_arn)))
    }

    fn ssl_requests_only_statement(bucket_arn: &str) -> PolicyStatement {
        PolicyStatement::new("AllowSSLRequestsOnly")
            .with_effect(Effect::Deny)
            .with_action("s3:*")
            .with_resource(bucket_arn)
            .with_resource(format!("{bucket_arn}/*"))
            .with_condition("Bool", "aws:SecureTransport", vec!["false".to_string()])
            .with_principal(Principal::any())
    }
}
