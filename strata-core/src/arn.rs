//! ARN references
//!
//! Grants need to name resources. Some are known at declare time (the token
//! secret lives in a fixed account), others are co-declared in the same
//! stack and only get a concrete ARN after provisioning. `ArnRef` covers
//! both: literals are shape-checked up front, deferred references resolve to
//! an `Fn::GetAtt` during synthesis.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Result, SynthError};

/// Reference to a resource ARN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArnRef {
    /// A fully specified ARN string
    Literal(String),
    /// The ARN of a resource declared in the same stack, addressed by its
    /// construct path
    Deferred { path: String },
}

impl ArnRef {
    /// Create a literal ARN reference, rejecting malformed ARN strings
    ///
    /// An ARN has six colon-separated parts: `arn:partition:service:region:account:resource`.
    pub fn literal(arn: impl Into<String>) -> Result<Self> {
        let arn = arn.into();
        if !arn.starts_with("arn:") || arn.splitn(6, ':').count() != 6 {
            return Err(SynthError::validation(format!("malformed ARN: {arn}")));
        }
        Ok(Self::Literal(arn))
    }

    /// Reference the ARN of the resource at `path` in the same stack
    pub fn deferred(path: impl Into<String>) -> Self {
        Self::Deferred { path: path.into() }
    }

    /// Render to template JSON, resolving deferred references through the
    /// stack's construct-path -> logical-id map
    pub(crate) fn render(&self, ids: &BTreeMap<String, String>) -> Result<Value> {
        match self {
            Self::Literal(arn) => Ok(json!(arn)),
            Self::Deferred { path } => {
                let id = ids.get(path).ok_or_else(|| {
                    SynthError::validation(format!(
                        "ARN reference to undeclared resource: {path}"
                    ))
                })?;
                Ok(json!({ "Fn::GetAtt": [id, "Arn"] }))
            }
        }
    }
}

impl fmt::Display for ArnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(arn) => write!(f, "{arn}"),
            Self::Deferred { path } => write!(f, "arn-of({path})"),
        }
    }
}
