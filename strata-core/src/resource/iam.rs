//! IAM policy declarations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::arn::ArnRef;
use crate::error::Result;

/// A single allow statement scoping a set of actions to a set of resources
///
/// Each build project carries the statements its one external action needs,
/// and nothing broader. Statements render into the project role's inline
/// policy at synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub actions: Vec<String>,
    pub resources: Vec<ArnRef>,
}

impl PolicyStatement {
    /// Allow `actions` on `resources`
    pub fn allow(actions: &[&str], resources: Vec<ArnRef>) -> Self {
        Self {
            actions: actions.iter().map(|a| a.to_string()).collect(),
            resources,
        }
    }

    pub(crate) fn render(&self, ids: &BTreeMap<String, String>) -> Result<Value> {
        let resources = self
            .resources
            .iter()
            .map(|r| r.render(ids))
            .collect::<Result<Vec<_>>>()?;
        Ok(json!({
            "Effect": "Allow",
            "Action": self.actions,
            "Resource": resources,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_statement() {
        let statement = PolicyStatement::allow(
            &["secretsmanager:GetSecretValue"],
            vec![ArnRef::literal("arn:aws:secretsmanager:us-east-1:1:secret:tok").unwrap()],
        );

        let rendered = statement.render(&BTreeMap::new()).unwrap();
        assert_eq!(rendered["Effect"], "Allow");
        assert_eq!(rendered["Action"][0], "secretsmanager:GetSecretValue");
        assert_eq!(rendered["Resource"][0], "arn:aws:secretsmanager:us-east-1:1:secret:tok");
    }
}
