//! Structural views of the model graph for external renderers.
//!
//! Both views are plain data projections of the frozen registry: restartable,
//! side-effect-free, and computable without a live renderer.

use crate::crossing;
use crate::model::{BoundaryId, ElementVariant, Registry};
use serde::{Deserialize, Serialize};

/// What a data-flow diagram node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Boundary,
    Actor,
    Process,
    Datastore,
    ExternalEntity,
}

impl From<ElementVariant> for NodeKind {
    fn from(variant: ElementVariant) -> Self {
        match variant {
            ElementVariant::Actor => NodeKind::Actor,
            ElementVariant::Process => NodeKind::Process,
            ElementVariant::Datastore => NodeKind::Datastore,
            ElementVariant::ExternalEntity => NodeKind::ExternalEntity,
        }
    }
}

/// A node of the data-flow view: a boundary or an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    /// Containing boundary for elements, parent boundary for nested
    /// boundaries, `None` for top-level boundaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<BoundaryId>,
}

/// An edge of the data-flow view: one declared flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub flow: String,
    pub label: String,
    pub source: String,
    pub destination: String,
    pub crosses_boundary: bool,
}

/// One step of the sequence view: a flow at its declared position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub position: usize,
    pub source: String,
    pub destination: String,
    pub message: String,
}

/// Data-flow view of a model: boundaries and elements as nodes, flows as
/// edges annotated with their crossing status.
pub struct DataFlowDiagram<'a> {
    registry: &'a Registry,
}

impl<'a> DataFlowDiagram<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Boundary nodes first, then element nodes, each in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = DiagramNode> + '_ {
        let boundaries = self.registry.boundaries().iter().map(|b| DiagramNode {
            id: b.id.to_string(),
            label: b.name.clone(),
            kind: NodeKind::Boundary,
            boundary: b.parent.clone(),
        });
        let elements = self.registry.elements().iter().map(|e| DiagramNode {
            id: e.id.to_string(),
            label: e.name.clone(),
            kind: e.variant().into(),
            boundary: Some(e.boundary.clone()),
        });
        boundaries.chain(elements)
    }

    /// Flow edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = DiagramEdge> + '_ {
        self.registry.flows().iter().map(|flow| DiagramEdge {
            flow: flow.id.to_string(),
            label: flow.name.clone(),
            source: flow.source.to_string(),
            destination: flow.destination.to_string(),
            crosses_boundary: crossing::classify(self.registry, flow).is_some(),
        })
    }
}

/// Sequence view: flows sorted strictly by their declared position.
///
/// Positions are assigned at construction and unique, so ties are
/// impossible.
pub fn sequence_view(registry: &Registry) -> Vec<SequenceStep> {
    let mut steps: Vec<SequenceStep> = registry
        .flows()
        .iter()
        .map(|flow| {
            let name_of = |id| {
                registry
                    .element(id)
                    .map_or_else(|| id.to_string(), |e| e.name.clone())
            };
            SequenceStep {
                position: flow.position(),
                source: name_of(&flow.source),
                destination: name_of(&flow.destination),
                message: flow.name.clone(),
            }
        })
        .collect();
    steps.sort_by_key(|step| step.position);
    steps
}
