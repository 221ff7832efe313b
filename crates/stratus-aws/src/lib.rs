//! Stratus AWS component catalog
//!
//! Composable infrastructure components that expand a typed configuration
//! into the full graph of dependent AWS resources, with security and
//! operational defaults baked in: encryption on, public access blocked,
//! SSL-only bucket access, rollback-capable deployments, scheduled
//! capacity.
//!
//! Components never provision anything themselves; they declare
//! [`stratus_graph::ResourceNode`]s and resolve external references through
//! a [`stratus_graph::ResourceEngine`], and the apply engine behind that
//! trait does the rest.
//!
//! # Example
//!
//! ```ignore
//! use stratus_aws::{Naming, NamingOptions, StaticWebsite, StaticWebsiteOptions};
//!
//! let naming = Naming::new(NamingOptions {
//!     env_name: "production".to_string(),
//!     app_name: "landing".to_string(),
//!     purpose: None,
//! });
//!
//! let site = StaticWebsite::create(
//!     &engine,
//!     &naming.full_name,
//!     StaticWebsiteOptions {
//!         name: naming.full_name.clone(),
//!         aliases: vec!["www.example.com".to_string()],
//!         domain_options: None,
//!         route53_options: None,
//!         tags: naming.default_tags.clone(),
//!     },
//! )
//! .await?;
//! ```

pub mod bucket;
pub mod cloudfront;
pub mod cloudwatch;
pub mod ecs_ec2;
pub mod ecs_task_role;
pub mod naming;
pub mod rds;
pub mod rds_database;
pub mod security_group;
pub mod static_website;

// Re-exports
pub use bucket::{Bucket, BucketOptions};
pub use cloudfront::{Cloudfront, CloudfrontOptions};
pub use cloudwatch::{CloudWatch, CloudWatchOptions};
pub use ecs_ec2::{
    EcsEc2, EcsEc2HealthCheckOptions, EcsEc2LoadBalancerOptions, EcsEc2Options,
    EcsEc2Route53Options, EcsEc2ScheduleOptions, EcsEc2ScheduleWindowOptions, ScalingAlarm,
};
pub use ecs_task_role::{EcsTaskRole, EcsTaskRoleOptions};
pub use naming::{Naming, NamingOptions};
pub use rds::{Rds, RdsOptions};
pub use rds_database::{RdsDatabase, RdsDatabaseOptions};
pub use security_group::{SecurityGroup, SecurityGroupOptions, SecurityGroupRuleOptions};
pub use static_website::{
    StaticWebsite, StaticWebsiteDomainOptions, StaticWebsiteOptions, StaticWebsiteRoute53Options,
};
