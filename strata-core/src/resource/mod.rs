//! Resource records
//!
//! The declarative records a stack can hold. These are plain configuration
//! values shared between the constructs that compose them and the
//! synthesizer that renders them; nothing here talks to a provider.

pub mod buildspec;
pub mod function;
pub mod iam;
pub mod pipeline;
pub mod project;
pub mod table;

use serde::{Deserialize, Serialize};

/// Any resource a stack can declare
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Resource {
    Function(function::Function),
    Table(table::Table),
    Project(project::BuildProject),
    Pipeline(pipeline::Pipeline),
}

impl Resource {
    /// Human-readable resource kind, for listings and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Table(_) => "table",
            Self::Project(_) => "build project",
            Self::Pipeline(_) => "pipeline",
        }
    }
}
