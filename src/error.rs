//! Error types for policy resolution
//!
//! Every error here indicates a configuration authored incorrectly by the
//! operator's user. None are retryable: the reconciler surfaces them as a
//! status condition and waits for the configuration to be fixed.

use thiserror::Error;

/// Main error type for policy resolution
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Certificate validity/refresh window ordering violated
    #[error("invalid duration pair: {0}")]
    InvalidDurationPair(String),

    /// More than one public-facing component resolved from the topology
    #[error("topology conflict: {0}")]
    TopologyConflict(String),

    /// Mutually exclusive flags asserted together
    #[error("configuration conflict: {0}")]
    ConfigurationConflict(String),
}

impl Error {
    /// Create an invalid-duration-pair error with the given message
    pub fn invalid_duration_pair(msg: impl Into<String>) -> Self {
        Self::InvalidDurationPair(msg.into())
    }

    /// Create a topology-conflict error with the given message
    pub fn topology_conflict(msg: impl Into<String>) -> Self {
        Self::TopologyConflict(msg.into())
    }

    /// Create a configuration-conflict error with the given message
    pub fn configuration_conflict(msg: impl Into<String>) -> Self {
        Self::ConfigurationConflict(msg.into())
    }
}
