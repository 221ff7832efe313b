//! Stratus resource graph
//!
//! This crate provides the data model shared by all Stratus components:
//! declared resource nodes, the graph they form, and the abstraction over
//! the external apply engine that provisions them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 stratus-aws                      │
//! │   (component catalog: Bucket, EcsEc2, ...)       │
//! └─────────────────┬───────────────────────────────┘
//!                   │ declares nodes / resolves lookups
//! ┌─────────────────▼───────────────────────────────┐
//! │               stratus-graph                      │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        Engine abstraction                 │   │
//! │  │  trait ResourceEngine { ... }             │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ ResourceGraph│  │ IAM policies │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────────────────┬─────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────┐
//! │        external apply engine (out of scope)      │
//! │        diffing / provisioning / retries          │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Components construct their node set exactly once per run; a node absent
//! from a newly constructed graph is eligible for removal by the apply
//! engine. This crate performs no provisioning and no retries of its own.

pub mod component;
pub mod engine;
pub mod error;
pub mod graph;
pub mod node;
pub mod policy;

// Re-exports
pub use component::{ComponentName, Tags};
pub use engine::{ExternalHandle, ExternalQuery, ResourceEngine};
pub use error::{GraphError, Result};
pub use graph::ResourceGraph;
pub use node::{ResourceHandle, ResourceNode, ResourceType};
pub use policy::{document_json, Condition, Effect, PolicyStatement, Principal};
