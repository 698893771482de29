//! The fixed SpanStack component topology
//!
//! A SpanStack instance is always composed of the same components wired the
//! same way: spans enter through the distributor and are persisted by the
//! ingesters; queries fan out from the query-frontend through the queriers
//! back to the ingesters. The gateway and the query UI are optional and only
//! participate when their flags enable them.
//!
//! The topology is a constant versioned with the product, not user input.
//! The encryption resolver consumes it together with the per-instance flags.

use serde::Serialize;

/// A SpanStack component
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Component {
    /// Receives spans and distributes them across ingesters
    Distributor,
    /// Batches spans and writes blocks to storage
    Ingester,
    /// Executes queries against ingesters and storage
    Querier,
    /// Splits and schedules queries, serves the HTTP trace API
    QueryFrontend,
    /// Optional multi-tenant auth gateway, the preferred public entry
    Gateway,
    /// Optional query UI served next to the query-frontend
    QueryUi,
}

impl Component {
    /// All components in topology order
    pub const ALL: [Component; 6] = [
        Component::Distributor,
        Component::Ingester,
        Component::Querier,
        Component::QueryFrontend,
        Component::Gateway,
        Component::QueryUi,
    ];

    /// Whether this component only exists when a flag enables it
    pub fn is_optional(self) -> bool {
        matches!(self, Self::Gateway | Self::QueryUi)
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Distributor => write!(f, "distributor"),
            Self::Ingester => write!(f, "ingester"),
            Self::Querier => write!(f, "querier"),
            Self::QueryFrontend => write!(f, "query-frontend"),
            Self::Gateway => write!(f, "gateway"),
            Self::QueryUi => write!(f, "query-ui"),
        }
    }
}

/// Protocol class of a link; encryption is negotiated per class
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Protocol {
    /// HTTP/1.1 or HTTP/2 without gRPC framing
    Http,
    /// gRPC over HTTP/2
    Grpc,
}

/// The origin of a link: another component, or clients outside the mesh
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LinkSource {
    /// Traffic from outside the cluster-internal mesh
    External,
    /// Traffic from another SpanStack component
    Component(Component),
}

/// A directed link in the component topology
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
pub struct Link {
    /// Where the connection originates
    pub from: LinkSource,
    /// The component accepting the connection
    pub to: Component,
    /// Protocol class of the link
    pub protocol: Protocol,
}

impl Link {
    const fn internal(from: Component, to: Component, protocol: Protocol) -> Self {
        Self {
            from: LinkSource::Component(from),
            to,
            protocol,
        }
    }

    const fn ingress(to: Component) -> Self {
        Self {
            from: LinkSource::External,
            to,
            protocol: Protocol::Http,
        }
    }

    /// Whether this link enters the system from outside the mesh
    pub fn is_ingress(&self) -> bool {
        matches!(self.from, LinkSource::External)
    }

    /// Whether this link starts or ends at the given component
    pub fn touches(&self, component: Component) -> bool {
        self.to == component || self.from == LinkSource::Component(component)
    }
}

/// The fixed, ordered set of links between SpanStack components
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentTopology {
    links: Vec<Link>,
}

impl ComponentTopology {
    /// The product topology this operator version ships with
    ///
    /// Ingress candidates come last; the resolver decides which one of them
    /// is the public entry based on the enabled flags.
    pub fn product() -> Self {
        use Component::*;
        use Protocol::*;

        Self {
            links: vec![
                // write path
                Link::internal(Distributor, Ingester, Grpc),
                // read path
                Link::internal(QueryFrontend, Querier, Grpc),
                Link::internal(Querier, Ingester, Grpc),
                Link::internal(Querier, QueryFrontend, Http),
                // optional components
                Link::internal(Gateway, Distributor, Http),
                Link::internal(Gateway, QueryFrontend, Http),
                Link::internal(QueryUi, QueryFrontend, Http),
                // ingress candidates, one per possible public entry
                Link::ingress(Gateway),
                Link::ingress(QueryUi),
                Link::ingress(QueryFrontend),
            ],
        }
    }

    /// Build a topology from an explicit link set
    ///
    /// Only used by tests and forward-compatibility shims; production code
    /// goes through [`ComponentTopology::product`].
    pub fn from_links(links: Vec<Link>) -> Self {
        Self { links }
    }

    /// The links in fixed order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Whether any link touches the given component
    pub fn has_component(&self, component: Component) -> bool {
        self.links.iter().any(|l| l.touches(component))
    }
}
