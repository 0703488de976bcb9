//! Durations for timeout declarations

use serde::{Deserialize, Serialize};

/// A whole-second duration
///
/// Used for the deployable unit's invocation timeout and for pipeline-level
/// timeout overrides. Serializes as a bare number of seconds, which is how
/// templates express timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration {
    secs: u64,
}

impl Duration {
    /// A duration of `secs` seconds
    pub const fn seconds(secs: u64) -> Self {
        Self { secs }
    }

    /// A duration of `mins` minutes
    pub const fn minutes(mins: u64) -> Self {
        Self::seconds(mins * 60)
    }

    /// The duration in whole seconds
    pub const fn as_secs(&self) -> u64 {
        self.secs
    }
}
