//! Boundary-crossing detection and classification.
//!
//! A flow is a crossing when its endpoints lie in boundaries that share no
//! ancestor. Flows inside one boundary, or between boundaries nested under a
//! common ancestor, are not crossings: the shared enclosure is the trust
//! umbrella.

use crate::model::{BoundaryId, Dataflow, FlowId, Registry, TrustLevel};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Direction of a crossing relative to the trust-level ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossingDirection {
    /// Destination is more trusted than the source.
    Ingress,
    /// Destination is less trusted than the source.
    Egress,
    /// Both boundaries share a trust level.
    Lateral,
}

impl CrossingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrossingDirection::Ingress => "ingress",
            CrossingDirection::Egress => "egress",
            CrossingDirection::Lateral => "lateral",
        }
    }
}

impl std::fmt::Display for CrossingDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A flow whose endpoints lie in different, unrelated trust boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crossing {
    pub flow: FlowId,
    pub source_boundary: BoundaryId,
    pub destination_boundary: BoundaryId,
    pub direction: CrossingDirection,
    /// The lower of the two endpoint trust levels. Crossings touching the
    /// Internet are the most exposed.
    pub exposure: TrustLevel,
}

/// All crossings of a model, indexed by flow for constant-time lookup.
#[derive(Debug)]
pub struct CrossingAnalysis {
    crossings: Vec<Crossing>,
    by_flow: FxHashMap<FlowId, usize>,
}

impl CrossingAnalysis {
    /// Classify every flow of the registry, in declaration order.
    pub fn of(registry: &Registry) -> Self {
        let crossings: Vec<Crossing> = registry
            .flows()
            .iter()
            .filter_map(|flow| classify(registry, flow))
            .collect();

        debug!(
            flows = registry.flows().len(),
            crossings = crossings.len(),
            "Classified boundary crossings"
        );

        let by_flow = crossings
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.flow.clone(), idx))
            .collect();

        Self { crossings, by_flow }
    }

    /// All crossings, in flow declaration order.
    pub fn all(&self) -> &[Crossing] {
        &self.crossings
    }

    pub fn for_flow(&self, flow: &FlowId) -> Option<&Crossing> {
        self.by_flow.get(flow).map(|&i| &self.crossings[i])
    }

    pub fn is_crossing(&self, flow: &FlowId) -> bool {
        self.by_flow.contains_key(flow)
    }

    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }
}

/// Classify a single flow, or `None` when it does not cross.
///
/// Self-loop flows cannot occur here: the builder rejects them before the
/// registry is frozen.
pub fn classify(registry: &Registry, flow: &Dataflow) -> Option<Crossing> {
    let source = registry.boundary_of(&flow.source)?;
    let destination = registry.boundary_of(&flow.destination)?;

    if source.id == destination.id {
        return None;
    }

    // Nested boundaries: any shared ancestor makes the flow internal.
    let source_chain = registry.boundary_chain(&source.id);
    let destination_chain = registry.boundary_chain(&destination.id);
    let shared = source_chain
        .iter()
        .any(|a| destination_chain.iter().any(|b| a.id == b.id));
    if shared {
        return None;
    }

    let direction = match destination.trust.cmp(&source.trust) {
        std::cmp::Ordering::Greater => CrossingDirection::Ingress,
        std::cmp::Ordering::Less => CrossingDirection::Egress,
        std::cmp::Ordering::Equal => CrossingDirection::Lateral,
    };

    Some(Crossing {
        flow: flow.id.clone(),
        source_boundary: source.id.clone(),
        destination_boundary: destination.id.clone(),
        direction,
        exposure: source.trust.min(destination.trust),
    })
}
