//! IAM policy statements and document rendering

use crate::error::Result;
use serde::{Deserialize, Serialize};

const POLICY_VERSION: &str = "2012-10-17";

/// Statement effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

/// A principal entry in a policy statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Principal type (`AWS`, `Service`, `*`)
    #[serde(rename = "type")]
    pub principal_type: String,
    pub identifiers: Vec<String>,
}

impl Principal {
    pub fn new(principal_type: impl Into<String>, identifiers: Vec<String>) -> Self {
        Self {
            principal_type: principal_type.into(),
            identifiers,
        }
    }

    /// The anonymous `*` principal
    pub fn any() -> Self {
        Self::new("*", vec!["*".to_string()])
    }

    pub fn service(identifier: impl Into<String>) -> Self {
        Self::new("Service", vec![identifier.into()])
    }

    pub fn aws(identifier: impl Into<String>) -> Self {
        Self::new("AWS", vec![identifier.into()])
    }
}

/// A condition entry in a policy statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    /// Condition operator (`Bool`, `StringEquals`, ...)
    pub test: String,
    pub variable: String,
    pub values: Vec<String>,
}

/// One statement of an access-policy document
///
/// Statements are independently optional; components include a statement
/// only when its triggering configuration is set, and the document is the
/// ordered concatenation of whatever was included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub sid: String,
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
    #[serde(default)]
    pub principals: Vec<Principal>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl PolicyStatement {
    pub fn new(sid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            effect: Effect::Allow,
            actions: Vec::new(),
            resources: Vec::new(),
            principals: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.push(resource.into());
        self
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principals.push(principal);
        self
    }

    pub fn with_condition(
        mut self,
        test: impl Into<String>,
        variable: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        self.conditions.push(Condition {
            test: test.into(),
            variable: variable.into(),
            values,
        });
        self
    }
}

/// Render an ordered statement list into a policy document JSON string
///
/// An empty statement list is a valid document with an empty `Statement`
/// array. Engines back `assemble_policy` with this when they have no
/// provider-side assembler of their own.
pub fn document_json(statements: &[PolicyStatement]) -> Result<String> {
    let rendered: Vec<serde_json::Value> = statements.iter().map(render_statement).collect();
    let document = serde_json::json!({
        "Version": POLICY_VERSION,
        "Statement": rendered,
    });
    Ok(serde_json::to_string(&document)?)
}

fn render_statement(statement: &PolicyStatement) -> serde_json::Value {
    let mut out = serde_json::Map::new();
    out.insert("Sid".into(), statement.sid.clone().into());
    out.insert(
        "Effect".into(),
        match statement.effect {
            Effect::Allow => "Allow".into(),
            Effect::Deny => "Deny".into(),
        },
    );
    out.insert("Action".into(), statement.actions.clone().into());
    out.insert("Resource".into(), statement.resources.clone().into());

    if statement.principals.iter().any(|p| p.principal_type == "*") {
        out.insert("Principal".into(), "*".into());
    } else if !statement.principals.is_empty() {
        let mut principal = serde_json::Map::new();
        for p in &statement.principals {
            principal.insert(p.principal_type.clone(), p.identifiers.clone().into());
        }
        out.insert("Principal".into(), principal.into());
    }

    if !statement.conditions.is_empty() {
        let mut condition = serde_json::Map::new();
        for c in &statement.conditions {
            let entry = condition
                .entry(c.test.clone())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if let serde_json::Value::Object(map) = entry {
                map.insert(c.variable.clone(), c.values.clone().into());
            }
        }
        out.insert("Condition".into(), condition.into());
    }

    serde_json::Value::Object(out)
}
