//! Core model entities: trust boundaries, elements, and dataflows.
//!
//! Security attributes default to their conservative "insecure" value, so an
//! undeclared property surfaces as a potential finding rather than being
//! silently assumed safe.

use crate::model::identifiers::{BoundaryId, ElementId, FlowId};
use serde::{Deserialize, Serialize};

/// Trust level of a boundary, ordered from least to most trusted.
///
/// The ordering drives crossing direction: a flow toward a higher trust
/// level is an ingress, toward a lower one an egress.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Internet,
    Dmz,
    Internal,
    Cloud,
}

impl TrustLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustLevel::Internet => "internet",
            TrustLevel::Dmz => "dmz",
            TrustLevel::Internal => "internal",
            TrustLevel::Cloud => "cloud",
        }
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A labeled region within which all elements share a trust level.
///
/// Boundaries may nest via `parent`; crossings are only recorded between
/// boundaries that share no ancestor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub id: BoundaryId,
    pub name: String,
    pub trust: TrustLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<BoundaryId>,
}

impl Boundary {
    pub fn new(id: impl Into<BoundaryId>, name: impl Into<String>, trust: TrustLevel) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trust,
            parent: None,
        }
    }

    /// Nest this boundary inside another.
    pub fn with_parent(mut self, parent: impl Into<BoundaryId>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Variant tag of an element, without its attribute payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementVariant {
    Actor,
    Process,
    Datastore,
    ExternalEntity,
}

impl ElementVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementVariant::Actor => "actor",
            ElementVariant::Process => "process",
            ElementVariant::Datastore => "datastore",
            ElementVariant::ExternalEntity => "external_entity",
        }
    }
}

impl std::fmt::Display for ElementVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Security attributes of an active element (process or server).
///
/// Every flag defaults to `false`: an undeclared property is treated as
/// absent, which is the insecure reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessAttributes {
    #[serde(default)]
    pub is_hardened: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default)]
    pub implements_authentication_scheme: bool,
    #[serde(default)]
    pub authorizes_source: bool,
    #[serde(default)]
    pub sanitizes_input: bool,
    #[serde(default)]
    pub validates_input: bool,
    #[serde(default)]
    pub encodes_output: bool,
}

impl ProcessAttributes {
    pub fn hardened(mut self, value: bool) -> Self {
        self.is_hardened = value;
        self
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn implements_authentication_scheme(mut self, value: bool) -> Self {
        self.implements_authentication_scheme = value;
        self
    }

    pub fn authorizes_source(mut self, value: bool) -> Self {
        self.authorizes_source = value;
        self
    }

    pub fn sanitizes_input(mut self, value: bool) -> Self {
        self.sanitizes_input = value;
        self
    }

    pub fn validates_input(mut self, value: bool) -> Self {
        self.validates_input = value;
        self
    }

    pub fn encodes_output(mut self, value: bool) -> Self {
        self.encodes_output = value;
        self
    }
}

/// Security attributes of a datastore. All flags default to `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatastoreAttributes {
    #[serde(default)]
    pub is_encrypted: bool,
    #[serde(default)]
    pub is_sql: bool,
    #[serde(default)]
    pub stores_pii: bool,
    #[serde(default)]
    pub stores_sensitive_data: bool,
    #[serde(default)]
    pub stores_log_data: bool,
}

impl DatastoreAttributes {
    pub fn encrypted(mut self, value: bool) -> Self {
        self.is_encrypted = value;
        self
    }

    pub fn sql(mut self, value: bool) -> Self {
        self.is_sql = value;
        self
    }

    pub fn stores_pii(mut self, value: bool) -> Self {
        self.stores_pii = value;
        self
    }

    pub fn stores_sensitive_data(mut self, value: bool) -> Self {
        self.stores_sensitive_data = value;
        self
    }

    pub fn stores_log_data(mut self, value: bool) -> Self {
        self.stores_log_data = value;
        self
    }
}

/// Element variant with its typed attribute payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ElementKind {
    Actor,
    Process(ProcessAttributes),
    Datastore(DatastoreAttributes),
    ExternalEntity,
}

impl ElementKind {
    pub fn variant(&self) -> ElementVariant {
        match self {
            ElementKind::Actor => ElementVariant::Actor,
            ElementKind::Process(_) => ElementVariant::Process,
            ElementKind::Datastore(_) => ElementVariant::Datastore,
            ElementKind::ExternalEntity => ElementVariant::ExternalEntity,
        }
    }
}

/// A node of the model graph: actor, process/server, datastore, or external
/// entity. Every element belongs to exactly one boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub boundary: BoundaryId,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    pub fn new(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        boundary: impl Into<BoundaryId>,
        kind: ElementKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            boundary: boundary.into(),
            kind,
        }
    }

    pub fn actor(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        boundary: impl Into<BoundaryId>,
    ) -> Self {
        Self::new(id, name, boundary, ElementKind::Actor)
    }

    pub fn process(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        boundary: impl Into<BoundaryId>,
        attributes: ProcessAttributes,
    ) -> Self {
        Self::new(id, name, boundary, ElementKind::Process(attributes))
    }

    pub fn datastore(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        boundary: impl Into<BoundaryId>,
        attributes: DatastoreAttributes,
    ) -> Self {
        Self::new(id, name, boundary, ElementKind::Datastore(attributes))
    }

    pub fn external_entity(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        boundary: impl Into<BoundaryId>,
    ) -> Self {
        Self::new(id, name, boundary, ElementKind::ExternalEntity)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn variant(&self) -> ElementVariant {
        self.kind.variant()
    }

    pub fn as_process(&self) -> Option<&ProcessAttributes> {
        match &self.kind {
            ElementKind::Process(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_datastore(&self) -> Option<&DatastoreAttributes> {
        match &self.kind {
            ElementKind::Datastore(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Shared attribute lookup across variants.
    ///
    /// Attributes a variant does not carry read as `None`; boolean attributes
    /// missing here are treated as `false` by rule predicates (the
    /// conservative default).
    pub fn attribute(&self, name: &str) -> Option<bool> {
        match &self.kind {
            ElementKind::Process(a) => match name {
                "is_hardened" => Some(a.is_hardened),
                "implements_authentication_scheme" => Some(a.implements_authentication_scheme),
                "authorizes_source" => Some(a.authorizes_source),
                "sanitizes_input" => Some(a.sanitizes_input),
                "validates_input" => Some(a.validates_input),
                "encodes_output" => Some(a.encodes_output),
                _ => None,
            },
            ElementKind::Datastore(a) => match name {
                "is_encrypted" => Some(a.is_encrypted),
                "is_sql" => Some(a.is_sql),
                "stores_pii" => Some(a.stores_pii),
                "stores_sensitive_data" => Some(a.stores_sensitive_data),
                "stores_log_data" => Some(a.stores_log_data),
                _ => None,
            },
            ElementKind::Actor | ElementKind::ExternalEntity => None,
        }
    }
}

/// A directed dataflow between two registered elements.
///
/// The sequence position is assigned by the builder in declaration order and
/// is unique; the boundary crossing is always derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataflow {
    pub id: FlowId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub source: ElementId,
    pub destination: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default)]
    pub is_encrypted: bool,
    #[serde(default)]
    pub authenticated_with: bool,
    pub(crate) position: usize,
}

impl Dataflow {
    pub fn new(
        id: impl Into<FlowId>,
        name: impl Into<String>,
        source: impl Into<ElementId>,
        destination: impl Into<ElementId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            source: source.into(),
            destination: destination.into(),
            protocol: None,
            is_encrypted: false,
            authenticated_with: false,
            position: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn encrypted(mut self, value: bool) -> Self {
        self.is_encrypted = value;
        self
    }

    pub fn authenticated(mut self, value: bool) -> Self {
        self.authenticated_with = value;
        self
    }

    /// Position among all declared flows, assigned at registration.
    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_level_ordering() {
        assert!(TrustLevel::Internet < TrustLevel::Dmz);
        assert!(TrustLevel::Dmz < TrustLevel::Internal);
        assert!(TrustLevel::Internal < TrustLevel::Cloud);
    }

    #[test]
    fn test_trust_level_as_str() {
        assert_eq!(TrustLevel::Internet.as_str(), "internet");
        assert_eq!(TrustLevel::Dmz.as_str(), "dmz");
        assert_eq!(TrustLevel::Internal.as_str(), "internal");
        assert_eq!(TrustLevel::Cloud.as_str(), "cloud");
    }

    #[test]
    fn test_process_attributes_default_insecure() {
        let attrs = ProcessAttributes::default();
        assert!(!attrs.is_hardened);
        assert!(!attrs.implements_authentication_scheme);
        assert!(!attrs.authorizes_source);
        assert!(!attrs.sanitizes_input);
        assert!(!attrs.validates_input);
        assert!(!attrs.encodes_output);
        assert!(attrs.protocol.is_none());
    }

    #[test]
    fn test_datastore_attributes_default_insecure() {
        let attrs = DatastoreAttributes::default();
        assert!(!attrs.is_encrypted);
        assert!(!attrs.stores_pii);
        assert!(!attrs.stores_sensitive_data);
        assert!(!attrs.stores_log_data);
        assert!(!attrs.is_sql);
    }

    #[test]
    fn test_element_variant_tags() {
        let actor = Element::actor("user", "User", "internet");
        let process = Element::process("api", "API", "internal", ProcessAttributes::default());
        let store = Element::datastore("db", "DB", "cloud", DatastoreAttributes::default());
        let external = Element::external_entity("exchange", "Exchange API", "internet");

        assert_eq!(actor.variant(), ElementVariant::Actor);
        assert_eq!(process.variant(), ElementVariant::Process);
        assert_eq!(store.variant(), ElementVariant::Datastore);
        assert_eq!(external.variant(), ElementVariant::ExternalEntity);
    }

    #[test]
    fn test_element_attribute_lookup() {
        let process = Element::process(
            "api",
            "API",
            "internal",
            ProcessAttributes::default().sanitizes_input(true),
        );
        assert_eq!(process.attribute("sanitizes_input"), Some(true));
        assert_eq!(process.attribute("validates_input"), Some(false));
        assert_eq!(process.attribute("is_encrypted"), None);

        let actor = Element::actor("user", "User", "internet");
        assert_eq!(actor.attribute("sanitizes_input"), None);
    }

    #[test]
    fn test_dataflow_builder_chain() {
        let flow = Dataflow::new("f1", "API Request", "frontend", "api")
            .with_protocol("HTTPS")
            .encrypted(true)
            .authenticated(true)
            .with_description("Frontend makes API calls to backend");

        assert_eq!(flow.protocol.as_deref(), Some("HTTPS"));
        assert!(flow.is_encrypted);
        assert!(flow.authenticated_with);
        assert_eq!(flow.position(), 0);
    }

    #[test]
    fn test_boundary_nesting() {
        let boundary = Boundary::new("pci", "PCI Zone", TrustLevel::Internal).with_parent("internal");
        assert_eq!(boundary.parent, Some(BoundaryId::new("internal")));
    }

    #[test]
    fn test_element_kind_serde_tagging() {
        let store = Element::datastore(
            "db",
            "Firestore",
            "cloud",
            DatastoreAttributes::default().encrypted(true).stores_pii(true),
        );
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["variant"], "datastore");
        assert_eq!(json["is_encrypted"], true);
        assert_eq!(json["stores_pii"], true);
    }
}
