//! SpanStack operator configuration and mTLS policy core
//!
//! This crate resolves the operator's feature-gate configuration into the
//! immutable transport-security policy consumed by the reconciler. It decides
//! which internal component-to-component links of a SpanStack instance must
//! be encrypted, which single link is the public ingress, and when the
//! built-in certificate facility should rotate its CA and leaf certificates.
//!
//! # Architecture
//!
//! Policy resolution is a single synchronous call chain over immutable
//! inputs:
//!
//! 1. [`certs`] validates the certificate validity/refresh windows and builds
//!    the [`certs::CertificateLifecyclePolicy`].
//! 2. [`resolver`] walks the fixed [`topology::ComponentTopology`] and marks
//!    every active link as encrypted or not, designating exactly one public
//!    ingress.
//! 3. [`gates`] composes both with the platform gates into a
//!    [`gates::FeatureGatePolicy`] snapshot.
//!
//! The reconciler that turns the snapshot into Secrets, ConfigMaps, and
//! Routes lives outside this crate, as does the certificate generator. A
//! snapshot is rebuilt from scratch on every reconciliation pass and never
//! mutated in place.
//!
//! # Modules
//!
//! - [`config`] - Raw serialized configuration surface (feature gates)
//! - [`certs`] - Certificate validity/refresh validation and rotation policy
//! - [`topology`] - The fixed SpanStack component topology
//! - [`resolver`] - Per-link encryption resolution
//! - [`gates`] - The aggregate feature-gate policy snapshot
//! - [`error`] - Error types for policy resolution

#![deny(missing_docs)]

pub mod certs;
pub mod config;
pub mod error;
pub mod gates;
pub mod resolver;
pub mod topology;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
