//! Certificate validity/refresh validation and rotation policy
//!
//! The built-in certificate facility works with (total validity, refresh
//! before expiry) pairs, one for the CA and one shared by all leaf
//! certificates. This module validates those windows and answers "when
//! should the next rotation happen" - it starts no timers and generates no
//! certificates; scheduling and issuance belong to the reconciler and its
//! certificate collaborator.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::config::BuiltInCertManagement;
use crate::{Error, Result};

/// Upper bound on any certificate validity (100 years)
///
/// Keeps rotation arithmetic comfortably inside an i64 of seconds.
pub const MAX_CERT_VALIDITY: Duration = Duration::from_secs(100 * 8_766 * 3600);

/// A validated (total validity, refresh before expiry) window pair
///
/// Constructed once from configuration via [`DurationPair::new`] and
/// immutable thereafter. Holding a value of this type is proof that
/// `0 < refresh_before <= total_validity <= MAX_CERT_VALIDITY`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DurationPair {
    total_validity: Duration,
    refresh_before: Duration,
}

impl DurationPair {
    /// Validate and construct a duration pair
    ///
    /// Fails when either duration is zero, when the refresh exceeds the
    /// total validity, or when the validity exceeds [`MAX_CERT_VALIDITY`].
    ///
    /// A refresh above 80% of the validity is legal but discouraged and
    /// logged at warning level - unless it equals the validity exactly,
    /// which is the sanctioned "rotate only once expired" setting.
    pub fn new(total_validity: Duration, refresh_before: Duration) -> Result<Self> {
        if total_validity.is_zero() {
            return Err(Error::invalid_duration_pair(
                "total validity must be greater than zero",
            ));
        }
        if refresh_before.is_zero() {
            return Err(Error::invalid_duration_pair(
                "refresh duration must be greater than zero",
            ));
        }
        if refresh_before > total_validity {
            return Err(Error::invalid_duration_pair(format!(
                "refresh {} exceeds total validity {}",
                humantime::format_duration(refresh_before),
                humantime::format_duration(total_validity),
            )));
        }
        if total_validity > MAX_CERT_VALIDITY {
            return Err(Error::invalid_duration_pair(format!(
                "total validity {} exceeds the {} maximum",
                humantime::format_duration(total_validity),
                humantime::format_duration(MAX_CERT_VALIDITY),
            )));
        }

        // 80% guidance, integer math on whole seconds
        if refresh_before != total_validity
            && refresh_before.as_secs() * 5 > total_validity.as_secs() * 4
        {
            warn!(
                total_validity = %humantime::format_duration(total_validity),
                refresh_before = %humantime::format_duration(refresh_before),
                "certificate refresh exceeds 80% of validity; rotation will happen close to expiry"
            );
        }

        Ok(Self {
            total_validity,
            refresh_before,
        })
    }

    /// Total duration of the certificate validity
    pub fn total_validity(&self) -> Duration {
        self.total_validity
    }

    /// Duration of validity elapsed before a rotation should happen
    pub fn refresh_before(&self) -> Duration {
        self.refresh_before
    }

    /// The span from issuance until the rotation deadline
    pub fn rotation_window(&self) -> Duration {
        self.total_validity - self.refresh_before
    }

    /// Deadline for the next rotation of a certificate issued at `now`
    pub fn next_rotation(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        // rotation_window is bounded by MAX_CERT_VALIDITY at construction,
        // so the seconds always fit in an i64.
        now + chrono::Duration::seconds(self.rotation_window().as_secs() as i64)
    }
}

/// The validated rotation schedule of the built-in certificate facility
///
/// Built eagerly from configuration even when the facility is disabled, so
/// that flipping `enabled` later can never surface a latent invalid window.
/// When disabled, the user supplies certificates and CA bundles out of band;
/// the encryption resolver still reports which links need them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CertificateLifecyclePolicy {
    ca: DurationPair,
    leaf: DurationPair,
    enabled: bool,
}

impl CertificateLifecyclePolicy {
    /// Compose a policy from already-validated pairs
    pub fn build(ca: DurationPair, leaf: DurationPair, enabled: bool) -> Self {
        Self { ca, leaf, enabled }
    }

    /// Validate the configured windows and build the policy
    ///
    /// Both pairs are validated unconditionally, including when
    /// `cfg.enabled` is false.
    pub fn from_config(cfg: &BuiltInCertManagement) -> Result<Self> {
        let ca = DurationPair::new(cfg.ca_validity, cfg.ca_refresh)?;
        let leaf = DurationPair::new(cfg.cert_validity, cfg.cert_refresh)?;
        Ok(Self::build(ca, leaf, cfg.enabled))
    }

    /// Whether the built-in certificate facility is enabled
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The CA certificate validity/refresh pair
    pub fn ca(&self) -> DurationPair {
        self.ca
    }

    /// The leaf certificate validity/refresh pair
    pub fn leaf(&self) -> DurationPair {
        self.leaf
    }

    /// Deadline for rotating a CA certificate issued at `now`
    pub fn next_ca_rotation(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.ca.next_rotation(now)
    }

    /// Deadline for rotating leaf certificates issued at `now`
    pub fn next_leaf_rotation(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.leaf.next_rotation(now)
    }
}
