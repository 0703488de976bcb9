//! Constructs
//!
//! Reusable declarative compositions. A construct takes a props record,
//! assembles resource declarations, and exposes handles so callers can read
//! identities or attach further permissions.

pub mod lambda_pipeline;

pub use lambda_pipeline::{LambdaPipeline, LambdaPipelineProps};
