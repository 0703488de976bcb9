//! Strata Core
//!
//! Declarative model for the Strata infrastructure toolkit.
//!
//! This crate contains:
//! - Resource records: the cloud resources a stack can declare
//! - Constructs: reusable compositions of resources
//! - Synthesis: turning a declared stack into a JSON template
//!
//! Everything here is single-pass, side-effect-free composition. Execution
//! (source polling, builds, deploys) belongs to the managed services the
//! declarations reference, never to this crate.

pub mod arn;
pub mod construct;
pub mod duration;
pub mod error;
pub mod resource;
pub mod stack;
pub mod template;

pub use error::{Result, SynthError};
