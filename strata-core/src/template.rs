//! Synthesized templates

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// A synthesized stack template
///
/// Resources are keyed by logical id in a `BTreeMap`, so a given stack
/// always serializes to byte-identical output.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, Value>,
}

impl Template {
    pub(crate) fn new(description: Option<String>) -> Self {
        Self {
            format_version: "2010-09-09".to_string(),
            description,
            resources: BTreeMap::new(),
        }
    }
}
