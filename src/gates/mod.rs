//! The aggregate feature-gate policy snapshot
//!
//! [`FeatureGatePolicy::resolve`] composes the certificate lifecycle policy,
//! the per-link encryption decisions, and the platform gates into one
//! immutable snapshot. The reconciler reads the snapshot to decide which
//! `-mtls` Secrets and the `-ca-bundle` ConfigMap to require or generate and
//! which OpenShift resources to create, then throws it away; the next
//! reconciliation pass resolves a fresh one.
//!
//! Resolution short-circuits on the first failure and never returns a
//! partial policy.

use tracing::info;

use crate::certs::CertificateLifecyclePolicy;
use crate::config::{FeatureGates, MetricsFeatureGates, OpenShiftFeatureGates, TlsProfile};
use crate::resolver::{self, EncryptionFlags, LinkEncryptionDecision};
use crate::topology::{Component, ComponentTopology, LinkSource};
use crate::Result;

/// Suffix of the per-component secret holding `tls.crt`/`tls.key`
const MTLS_SECRET_SUFFIX: &str = "mtls";

/// Suffix of the per-instance configmap holding `service-ca.crt`
const CA_BUNDLE_SUFFIX: &str = "ca-bundle";

/// Cluster facts observed by the operator at startup
///
/// Not user configuration: these describe the platform the operator runs
/// on and feed the policy-selection rules of [`FeatureGatePolicy::resolve`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlatformStatus {
    /// The TLS profile configured on the platform API Server, when the
    /// platform exposes one
    pub api_server_tls_profile: Option<TlsProfile>,
}

/// The resolved, immutable policy snapshot handed to the reconciler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureGatePolicy {
    openshift: OpenShiftFeatureGates,
    cert_management: CertificateLifecyclePolicy,
    tls_profile: TlsProfile,
    metrics: MetricsFeatureGates,
    link_encryption: Vec<LinkEncryptionDecision>,
}

impl FeatureGatePolicy {
    /// Resolve the raw feature gates into a policy snapshot
    ///
    /// Runs the duration validation, the encryption resolver, and the
    /// policy-selection rules in order, failing fast on the first error:
    ///
    /// - `clusterTlsPolicy` takes the effective TLS profile from the
    ///   platform API Server instead of the user-supplied value. This is
    ///   selection, not validation: having both set is fine, the platform
    ///   wins, and an absent platform profile falls back to the configured
    ///   one.
    /// - Without the Prometheus Operator CRDs, the ServiceMonitor and
    ///   PrometheusRule gates are forced off whatever their configured
    ///   values, since the resources could not be applied. Logged as an
    ///   informational adjustment, not an error.
    pub fn resolve(
        gates: &FeatureGates,
        flags: &EncryptionFlags,
        platform: &PlatformStatus,
        topology: &ComponentTopology,
    ) -> Result<Self> {
        let cert_management =
            CertificateLifecyclePolicy::from_config(&gates.built_in_cert_management)?;
        let link_encryption = resolver::resolve(flags, topology)?;

        let tls_profile = if gates.openshift.cluster_tls_policy {
            platform.api_server_tls_profile.unwrap_or(flags.tls_profile)
        } else {
            flags.tls_profile
        };

        let mut metrics = gates.observability.metrics.clone();
        if !gates.prometheus_operator
            && (metrics.create_service_monitors || metrics.create_prometheus_rules)
        {
            info!(
                "Prometheus Operator CRDs not present, disabling ServiceMonitor and PrometheusRule creation"
            );
            metrics = MetricsFeatureGates::default();
        }

        Ok(Self {
            openshift: gates.openshift.clone(),
            cert_management,
            tls_profile,
            metrics,
            link_encryption,
        })
    }

    /// The OpenShift-only gates, passed through for the reconciler
    pub fn openshift(&self) -> &OpenShiftFeatureGates {
        &self.openshift
    }

    /// The validated certificate rotation schedule
    pub fn cert_management(&self) -> &CertificateLifecyclePolicy {
        &self.cert_management
    }

    /// The effective TLS profile for encrypted links
    pub fn tls_profile(&self) -> TlsProfile {
        self.tls_profile
    }

    /// The effective operator metrics gates, after dependency downgrades
    pub fn metrics(&self) -> &MetricsFeatureGates {
        &self.metrics
    }

    /// The per-link encryption decisions, in topology order
    pub fn link_encryption(&self) -> &[LinkEncryptionDecision] {
        &self.link_encryption
    }

    /// Components on at least one encrypted link, in topology order
    ///
    /// Each of these serves or dials mTLS and therefore needs both its
    /// `-mtls` secret and the CA trust bundle.
    pub fn components_needing_ca_bundle(&self) -> Vec<Component> {
        Component::ALL
            .into_iter()
            .filter(|&c| {
                self.link_encryption
                    .iter()
                    .any(|d| d.encrypted && d.link.touches(c))
            })
            .collect()
    }

    /// Names of the per-component mTLS secrets the instance requires
    ///
    /// One `<instance>-<component>-mtls` secret per component on at least
    /// one encrypted link, holding `tls.crt` and `tls.key`. Generated by
    /// the built-in facility when it is enabled, supplied by the user
    /// otherwise.
    pub fn mtls_secret_names(&self, instance: &str) -> Vec<String> {
        self.components_needing_ca_bundle()
            .into_iter()
            .map(|c| format!("{instance}-{c}-{MTLS_SECRET_SUFFIX}"))
            .collect()
    }

    /// Name of the instance configmap carrying `service-ca.crt`
    pub fn ca_bundle_name(&self, instance: &str) -> String {
        format!("{instance}-{CA_BUNDLE_SUFFIX}")
    }

    /// Whether any link requires encryption at all
    pub fn any_link_encrypted(&self) -> bool {
        self.link_encryption.iter().any(|d| d.encrypted)
    }

    /// The single public ingress decision
    ///
    /// The resolver guarantees exactly one exists in any snapshot it built.
    pub fn public_ingress(&self) -> Option<&LinkEncryptionDecision> {
        self.link_encryption.iter().find(|d| d.public_facing)
    }

    /// The component behind the public ingress
    pub fn public_component(&self) -> Option<Component> {
        self.public_ingress().map(|d| d.link.to)
    }

    /// Components dialing or serving encrypted links from inside the mesh,
    /// paired with whether they serve the public ingress
    ///
    /// Convenience for reconcilers that template per-component TLS args.
    pub fn encrypted_components(&self) -> Vec<(Component, bool)> {
        let public = self.public_component();
        self.components_needing_ca_bundle()
            .into_iter()
            .map(|c| (c, Some(c) == public))
            .collect()
    }
}

/// Iterate the internal (non-ingress) decisions of a snapshot
///
/// Used by reconcilers that only template the mesh links.
pub fn internal_links(
    policy: &FeatureGatePolicy,
) -> impl Iterator<Item = &LinkEncryptionDecision> + '_ {
    policy
        .link_encryption()
        .iter()
        .filter(|d| !matches!(d.link.from, LinkSource::External))
}
