//! Canonical resource naming and default tags

use serde::{Deserialize, Serialize};
use stratus_graph::Tags;

/// Identifiers a canonical name is computed from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingOptions {
    pub env_name: String,
    pub app_name: String,
    pub purpose: Option<String>,
}

/// Canonical resource name and default tag set
///
/// `full_name` joins the non-empty parts of environment, application, and
/// purpose with `-`. The tag set always carries `Name`, `Environment`,
/// `Application`, `Description`, and `Pulumi`; `Purpose` is present only
/// when a purpose was supplied. Pure computation, no failure modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Naming {
    pub full_name: String,
    pub default_tags: Tags,
}

impl Naming {
    pub fn new(options: NamingOptions) -> Self {
        let full_name = [
            Some(options.env_name.as_str()),
            Some(options.app_name.as_str()),
            options.purpose.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

        let mut default_tags = Tags::new();
        default_tags.insert("Name".to_string(), full_name.clone());
        default_tags.insert("Environment".to_string(), options.env_name);
        default_tags.insert("Application".to_string(), options.app_name);
        default_tags.insert(
            "Description".to_string(),
            format!("Resource made with Pulumi for {full_name}"),
        );
        default_tags.insert("Pulumi".to_string(), "true".to_string());
        if let Some(purpose) = options.purpose {
            if !purpose.is_empty() {
                default_tags.insert("Purpose".to_string(), purpose);
            }
        }

        Self {
            full_name,
            default_tags,
        }
    }
}
