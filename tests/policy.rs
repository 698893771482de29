//! End-to-end policy resolution over a deserialized operator configuration
//!
//! These tests walk the full chain the reconciler uses: raw JSON feature
//! gates -> encryption flags -> resolved `FeatureGatePolicy` snapshot.

use spanstack_operator::config::{FeatureGates, TlsProfile};
use spanstack_operator::gates::{FeatureGatePolicy, PlatformStatus};
use spanstack_operator::resolver::EncryptionFlags;
use spanstack_operator::topology::{Component, ComponentTopology};
use spanstack_operator::Error;

fn resolve_from_json(
    json: &str,
    gateway: bool,
    ui: bool,
    platform: PlatformStatus,
) -> Result<FeatureGatePolicy, Error> {
    let gates: FeatureGates = serde_json::from_str(json).expect("valid gates json");
    let flags = EncryptionFlags::from_gates(&gates, gateway, ui);
    FeatureGatePolicy::resolve(&gates, &flags, &platform, &ComponentTopology::product())
}

/// A production-shaped configuration: full encryption behind a gateway,
/// built-in certificates, OpenShift cluster TLS policy.
const FULL_CONFIG: &str = r#"{
    "httpEncryption": true,
    "grpcEncryption": true,
    "tlsProfile": "Modern",
    "prometheusOperator": true,
    "builtInCertManagement": {
        "caValidity": "43830h",
        "caRefresh": "35064h",
        "certValidity": "2160h",
        "certRefresh": "1728h",
        "enabled": true
    },
    "openshift": {
        "servingCertsService": true,
        "openshiftRoute": true,
        "clusterTlsPolicy": true
    },
    "observability": {
        "metrics": {
            "createServiceMonitors": true,
            "createPrometheusRules": true
        }
    }
}"#;

#[test]
fn full_config_resolves_to_gateway_guarded_mesh() {
    let platform = PlatformStatus {
        api_server_tls_profile: Some(TlsProfile::Intermediate),
    };
    let policy = resolve_from_json(FULL_CONFIG, true, true, platform).unwrap();

    // the gateway is the sole public entry; everything else is in the mesh
    assert_eq!(policy.public_component(), Some(Component::Gateway));
    for decision in policy.link_encryption() {
        if decision.public_facing {
            assert!(!decision.encrypted);
        } else {
            assert!(decision.encrypted);
        }
    }

    // clusterTlsPolicy: the platform profile overrides the configured Modern
    assert_eq!(policy.tls_profile(), TlsProfile::Intermediate);

    // metrics gates survive since the Prometheus Operator CRDs exist
    assert!(policy.metrics().create_service_monitors);
    assert!(policy.metrics().create_prometheus_rules);

    // the built-in facility handles all six components
    assert!(policy.cert_management().enabled());
    assert_eq!(
        policy.mtls_secret_names("spanstack-prod"),
        vec![
            "spanstack-prod-distributor-mtls",
            "spanstack-prod-ingester-mtls",
            "spanstack-prod-querier-mtls",
            "spanstack-prod-query-frontend-mtls",
            "spanstack-prod-gateway-mtls",
            "spanstack-prod-query-ui-mtls",
        ]
    );
    assert_eq!(
        policy.ca_bundle_name("spanstack-prod"),
        "spanstack-prod-ca-bundle"
    );
}

#[test]
fn resolution_is_deterministic_across_passes() {
    let platform = PlatformStatus::default();
    let first = resolve_from_json(FULL_CONFIG, true, true, platform).unwrap();
    let second = resolve_from_json(FULL_CONFIG, true, true, platform).unwrap();
    assert_eq!(first, second);
}

#[test]
fn ui_without_gateway_stays_publicly_reachable() {
    let policy = resolve_from_json(FULL_CONFIG, false, true, PlatformStatus::default()).unwrap();

    assert_eq!(policy.public_component(), Some(Component::QueryUi));
    let ingress = policy.public_ingress().unwrap();
    // public UI endpoint is forced unencrypted despite httpEncryption=true
    assert!(!ingress.encrypted);
}

#[test]
fn invalid_refresh_window_fails_the_whole_resolution() {
    let json = r#"{
        "grpcEncryption": true,
        "builtInCertManagement": {
            "caValidity": "24h",
            "caRefresh": "48h",
            "enabled": false
        }
    }"#;
    // enabled=false still validates: the error must not lie dormant until
    // someone flips the flag
    let result = resolve_from_json(json, false, false, PlatformStatus::default());
    match result {
        Err(Error::InvalidDurationPair(msg)) => {
            assert!(msg.contains("exceeds total validity"), "got: {msg}");
        }
        other => panic!("expected InvalidDurationPair, got {other:?}"),
    }
}

#[test]
fn prometheus_gates_downgrade_without_the_crd() {
    let json = r#"{
        "prometheusOperator": false,
        "observability": {
            "metrics": {"createServiceMonitors": true, "createPrometheusRules": true}
        }
    }"#;
    let policy = resolve_from_json(json, false, false, PlatformStatus::default()).unwrap();
    assert!(!policy.metrics().create_service_monitors);
    assert!(!policy.metrics().create_prometheus_rules);
}

#[test]
fn defaults_resolve_to_an_unencrypted_bare_api() {
    let policy = resolve_from_json("{}", false, false, PlatformStatus::default()).unwrap();

    assert_eq!(policy.public_component(), Some(Component::QueryFrontend));
    assert!(!policy.any_link_encrypted());
    assert!(policy.mtls_secret_names("spanstack-dev").is_empty());
    assert!(!policy.cert_management().enabled());
    assert_eq!(policy.tls_profile(), TlsProfile::Intermediate);
}
