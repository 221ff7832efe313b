//! Component naming and tagging helpers

use std::collections::BTreeMap;

/// Resource tags, ordered so rendered output is stable
pub type Tags = BTreeMap<String, String>;

/// Name of a composite component, used to derive child node names
///
/// Every node a component declares is named `<component>-<suffix>`; together
/// with graph-level duplicate rejection this gives each node a
/// deterministic, unique identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentName(String);

impl ComponentName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a child node name
    pub fn child(&self, suffix: &str) -> String {
        format!("{}-{}", self.0, suffix)
    }
}

impl std::fmt::Display for ComponentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ComponentName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
