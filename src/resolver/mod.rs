//! Per-link encryption resolution
//!
//! Given the encryption flags of a SpanStack instance and the fixed
//! [`ComponentTopology`], this module decides for every active link whether
//! it must be encrypted and which single link is the public ingress.
//!
//! The rules:
//!
//! 1. Every active link starts with the encryption setting of its protocol
//!    class: `http_encryption` for HTTP links, `grpc_encryption` for GRPC
//!    links. Enabling mesh encryption is a single global switch per class.
//! 2. Exactly one component faces the public, by priority: the gateway when
//!    enabled, else the query UI when enabled, else the bare query-frontend
//!    HTTP API. Its ingress link is never wrapped in the internal mTLS mesh -
//!    certificates there would have to be trusted by external clients,
//!    defeating the internal-only CA - so it is forced unencrypted. Ingress
//!    links of the remaining enabled components are downgraded to internal
//!    links and keep their class encryption.
//! 3. Links strictly between internal components keep their class value
//!    untouched: that is the mesh mTLS protects.
//! 4. The single-ingress invariant is re-checked on the result; a violation
//!    is a hard error, never resolved by silently picking a winner.

use serde::Serialize;

use crate::config::{FeatureGates, TlsProfile};
use crate::topology::{Component, ComponentTopology, Link, LinkSource, Protocol};
use crate::{Error, Result};

/// Per-instance transport security flags consumed by the resolver
///
/// Collapses the relevant feature gates and instance toggles into explicit
/// parameters instead of reaching into the nested configuration tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncryptionFlags {
    /// Encrypt internal HTTP links
    pub http_encryption: bool,
    /// Encrypt internal GRPC links
    pub grpc_encryption: bool,
    /// The instance deploys the gateway component
    pub gateway_enabled: bool,
    /// The instance deploys the query UI component
    pub ui_enabled: bool,
    /// TLS security profile applied to encrypted links
    pub tls_profile: TlsProfile,
}

impl EncryptionFlags {
    /// Combine the global feature gates with the per-instance toggles
    pub fn from_gates(gates: &FeatureGates, gateway_enabled: bool, ui_enabled: bool) -> Self {
        Self {
            http_encryption: gates.http_encryption,
            grpc_encryption: gates.grpc_encryption,
            gateway_enabled,
            ui_enabled,
            tls_profile: gates.tls_profile,
        }
    }
}

/// The resolved transport security of a single link
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct LinkEncryptionDecision {
    /// The link this decision applies to
    pub link: Link,
    /// Whether the link must be encrypted
    pub encrypted: bool,
    /// Whether this link is the public ingress
    pub public_facing: bool,
}

/// Resolve the encryption decision for every active link of the topology
///
/// Pure and deterministic: identical inputs yield identical decision
/// vectors. Returns [`Error::ConfigurationConflict`] when a flag enables a
/// component the topology does not contain, and [`Error::TopologyConflict`]
/// when the resolved decisions violate the single-ingress invariant.
pub fn resolve(
    flags: &EncryptionFlags,
    topology: &ComponentTopology,
) -> Result<Vec<LinkEncryptionDecision>> {
    if flags.gateway_enabled && !topology.has_component(Component::Gateway) {
        return Err(Error::configuration_conflict(
            "gateway enabled but the topology has no gateway links",
        ));
    }
    if flags.ui_enabled && !topology.has_component(Component::QueryUi) {
        return Err(Error::configuration_conflict(
            "query UI enabled but the topology has no query-ui links",
        ));
    }

    let public = public_component(flags);

    let mut decisions = Vec::with_capacity(topology.links().len());
    for link in topology.links() {
        if !link_active(link, flags) {
            continue;
        }

        let mut encrypted = match link.protocol {
            Protocol::Http => flags.http_encryption,
            Protocol::Grpc => flags.grpc_encryption,
        };
        let mut public_facing = false;

        if link.is_ingress() && link.to == public {
            // the public entry is never part of the internal mesh
            public_facing = true;
            encrypted = false;
        }

        decisions.push(LinkEncryptionDecision {
            link: *link,
            encrypted,
            public_facing,
        });
    }

    enforce_single_ingress(&decisions)?;
    Ok(decisions)
}

/// The single public-facing component, by priority
fn public_component(flags: &EncryptionFlags) -> Component {
    if flags.gateway_enabled {
        Component::Gateway
    } else if flags.ui_enabled {
        Component::QueryUi
    } else {
        Component::QueryFrontend
    }
}

/// Whether a link participates given the enabled flags
fn link_active(link: &Link, flags: &EncryptionFlags) -> bool {
    let component_enabled = |c: Component| match c {
        Component::Gateway => flags.gateway_enabled,
        Component::QueryUi => flags.ui_enabled,
        _ => true,
    };
    let from_active = match link.from {
        LinkSource::External => true,
        LinkSource::Component(c) => component_enabled(c),
    };
    from_active && component_enabled(link.to)
}

/// The system has exactly one public ingress. With a single public link no
/// component can be touched by more than one, so the count check covers the
/// whole invariant.
fn enforce_single_ingress(decisions: &[LinkEncryptionDecision]) -> Result<()> {
    let public = decisions.iter().filter(|d| d.public_facing).count();
    if public != 1 {
        return Err(Error::topology_conflict(format!(
            "{public} public-facing links resolved, expected exactly 1"
        )));
    }
    Ok(())
}
