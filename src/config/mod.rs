//! Raw serialized configuration surface for the operator
//!
//! These types mirror the operator's configuration file one to one: plain
//! fields, camelCase JSON names, durations as human-readable strings
//! (`"2160h"`, `"90days"`). They carry no invariants of their own; the
//! validated, immutable policy values are built from them by
//! [`crate::certs`] and [`crate::gates`].

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default total validity of the built-in CA certificate (5 years)
pub const DEFAULT_CA_CERT_VALIDITY: Duration = Duration::from_secs(43_830 * 3600);

/// Default CA validity elapsed before rotation (4 years, 80% of validity)
pub const DEFAULT_CA_CERT_REFRESH: Duration = Duration::from_secs(35_064 * 3600);

/// Default total validity of leaf certificates (90 days)
pub const DEFAULT_CERT_VALIDITY: Duration = Duration::from_secs(2_160 * 3600);

/// Default leaf validity elapsed before rotation (72 days, 80% of validity)
pub const DEFAULT_CERT_REFRESH: Duration = Duration::from_secs(1_728 * 3600);

/// TLS security profile based on the Mozilla server-side TLS definitions
///
/// Enforced on every encrypted link when HTTP or GRPC encryption is enabled.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsProfile {
    /// Backward-compatible cipher set for legacy clients
    Old,
    /// Recommended default cipher set
    #[default]
    Intermediate,
    /// Modern clients only, TLS 1.3
    Modern,
}

impl std::str::FromStr for TlsProfile {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "old" => Ok(Self::Old),
            "intermediate" => Ok(Self::Intermediate),
            "modern" => Ok(Self::Modern),
            _ => Err(crate::Error::configuration_conflict(format!(
                "invalid TLS profile: {s}, expected one of: Old, Intermediate, Modern"
            ))),
        }
    }
}

impl std::fmt::Display for TlsProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Old => write!(f, "Old"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Modern => write!(f, "Modern"),
        }
    }
}

/// Configuration for the built-in facility that issues and rotates TLS
/// client and serving certificates for all SpanStack components
///
/// When disabled, the user supplies the per-component `-mtls` secrets and
/// the `-ca-bundle` configmap out of band; the resolved policy still reports
/// which of them each link requires.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuiltInCertManagement {
    /// Total duration of the CA certificate validity
    #[serde(default = "default_ca_validity", with = "humantime_serde")]
    #[schemars(with = "String")]
    pub ca_validity: Duration,

    /// Duration of CA validity elapsed before a rotation should happen.
    /// Up to 80% of the CA validity, or exactly equal to it to rotate
    /// only once expired.
    #[serde(default = "default_ca_refresh", with = "humantime_serde")]
    #[schemars(with = "String")]
    pub ca_refresh: Duration,

    /// Total duration of the validity for all SpanStack leaf certificates
    #[serde(default = "default_cert_validity", with = "humantime_serde")]
    #[schemars(with = "String")]
    pub cert_validity: Duration,

    /// Duration of leaf validity elapsed before a rotation should happen.
    /// Applied to all leaf certificates at once. Same 80%/equality rule as
    /// the CA refresh.
    #[serde(default = "default_cert_refresh", with = "humantime_serde")]
    #[schemars(with = "String")]
    pub cert_refresh: Duration,

    /// Whether the built-in certificate management facility is enabled
    #[serde(default)]
    pub enabled: bool,
}

fn default_ca_validity() -> Duration {
    DEFAULT_CA_CERT_VALIDITY
}

fn default_ca_refresh() -> Duration {
    DEFAULT_CA_CERT_REFRESH
}

fn default_cert_validity() -> Duration {
    DEFAULT_CERT_VALIDITY
}

fn default_cert_refresh() -> Duration {
    DEFAULT_CERT_REFRESH
}

impl Default for BuiltInCertManagement {
    fn default() -> Self {
        Self {
            ca_validity: DEFAULT_CA_CERT_VALIDITY,
            ca_refresh: DEFAULT_CA_CERT_REFRESH,
            cert_validity: DEFAULT_CERT_VALIDITY,
            cert_refresh: DEFAULT_CERT_REFRESH,
            enabled: false,
        }
    }
}

/// Feature gates supported only on OpenShift
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OpenShiftFeatureGates {
    /// Annotate the gateway service for the in-platform service CA so the
    /// platform issues its serving cert/key pair
    #[serde(default)]
    pub serving_certs_service: bool,

    /// Create OpenShift Route objects for the public ingress
    #[serde(default)]
    pub openshift_route: bool,

    /// Base domain for gateway redirect URLs; derived from the cluster
    /// when empty
    #[serde(default)]
    pub base_domain: String,

    /// Take the TLS profile from the API Server TLS policy instead of the
    /// user-supplied value
    #[serde(default)]
    pub cluster_tls_policy: bool,
}

/// Metrics and alerting gates of the operator itself
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsFeatureGates {
    /// Install ServiceMonitors to scrape operator metrics
    #[serde(default)]
    pub create_service_monitors: bool,

    /// Install PrometheusRules to alert on operator health
    #[serde(default)]
    pub create_prometheus_rules: bool,
}

/// Observability gates of the operator
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObservabilityFeatureGates {
    /// Metrics configuration of the operator
    #[serde(default)]
    pub metrics: MetricsFeatureGates,
}

/// The supported set of all operator feature gates
///
/// This is the raw configuration value handed to
/// [`crate::gates::FeatureGatePolicy::resolve`]. Nothing is validated at
/// deserialization time; resolution validates eagerly and fails fast.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGates {
    /// Feature gates supported only on OpenShift
    #[serde(default)]
    pub openshift: OpenShiftFeatureGates,

    /// Built-in certificate issuance and rotation facility
    #[serde(default)]
    pub built_in_cert_management: BuiltInCertManagement,

    /// Encrypt all internal HTTP links between SpanStack components
    #[serde(default)]
    pub http_encryption: bool,

    /// Encrypt all internal GRPC links between SpanStack components
    #[serde(default)]
    pub grpc_encryption: bool,

    /// TLS security profile applied to encrypted links
    #[serde(default)]
    pub tls_profile: TlsProfile,

    /// Whether the Prometheus Operator CRDs exist in the cluster
    #[serde(default)]
    pub prometheus_operator: bool,

    /// Observability gates of the operator
    #[serde(default)]
    pub observability: ObservabilityFeatureGates,
}
