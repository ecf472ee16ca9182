//! Model construction and the frozen registry.
//!
//! `ModelBuilder` enforces referential integrity while the model is being
//! declared; `build()` freezes it into an immutable `Registry` whose lookups
//! are pure. Nothing can mutate the graph after the freeze.

use crate::error::{ModelError, Result};
use crate::model::identifiers::{BoundaryId, ElementId, FlowId};
use crate::model::types::{Boundary, Dataflow, Element};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Staged model under construction.
///
/// Construction order matters: boundaries before the elements they contain,
/// elements before the flows that reference them.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    name: String,
    description: String,
    boundaries: Vec<Boundary>,
    elements: Vec<Element>,
    flows: Vec<Dataflow>,
    boundary_index: FxHashMap<BoundaryId, usize>,
    element_index: FxHashMap<ElementId, usize>,
    flow_index: FxHashMap<FlowId, usize>,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Register a trust boundary.
    ///
    /// Fails with `DuplicateIdentifier` on a reused id or name, and with
    /// `UnknownReference` if the parent boundary is not yet registered.
    pub fn add_boundary(&mut self, boundary: Boundary) -> Result<&mut Self> {
        if self.boundary_index.contains_key(&boundary.id) {
            return Err(ModelError::DuplicateIdentifier {
                kind: "boundary",
                id: boundary.id.to_string(),
            });
        }
        if self.boundaries.iter().any(|b| b.name == boundary.name) {
            return Err(ModelError::DuplicateIdentifier {
                kind: "boundary name",
                id: boundary.name.clone(),
            });
        }
        if let Some(parent) = &boundary.parent {
            if !self.boundary_index.contains_key(parent) {
                return Err(ModelError::UnknownReference {
                    kind: "boundary",
                    id: parent.to_string(),
                    referrer: format!("boundary '{}'", boundary.id),
                });
            }
        }

        self.boundary_index
            .insert(boundary.id.clone(), self.boundaries.len());
        self.boundaries.push(boundary);
        Ok(self)
    }

    /// Register an element. Its containing boundary must already exist.
    pub fn add_element(&mut self, element: Element) -> Result<&mut Self> {
        if self.element_index.contains_key(&element.id) {
            return Err(ModelError::DuplicateIdentifier {
                kind: "element",
                id: element.id.to_string(),
            });
        }
        if !self.boundary_index.contains_key(&element.boundary) {
            return Err(ModelError::UnknownReference {
                kind: "boundary",
                id: element.boundary.to_string(),
                referrer: format!("element '{}'", element.id),
            });
        }

        self.element_index
            .insert(element.id.clone(), self.elements.len());
        self.elements.push(element);
        Ok(self)
    }

    /// Register a dataflow. Both endpoints must already exist and differ;
    /// the flow's sequence position is assigned here, in declaration order.
    pub fn add_flow(&mut self, mut flow: Dataflow) -> Result<&mut Self> {
        if self.flow_index.contains_key(&flow.id) {
            return Err(ModelError::DuplicateIdentifier {
                kind: "flow",
                id: flow.id.to_string(),
            });
        }
        for endpoint in [&flow.source, &flow.destination] {
            if !self.element_index.contains_key(endpoint) {
                return Err(ModelError::UnknownReference {
                    kind: "element",
                    id: endpoint.to_string(),
                    referrer: format!("flow '{}'", flow.id),
                });
            }
        }
        if flow.source == flow.destination {
            return Err(ModelError::SelfLoopFlow {
                flow: flow.id.to_string(),
                element: flow.source.to_string(),
            });
        }

        flow.position = self.flows.len();
        self.flow_index.insert(flow.id.clone(), self.flows.len());
        self.flows.push(flow);
        Ok(self)
    }

    /// Freeze the model into an immutable registry.
    pub fn build(self) -> Registry {
        debug!(
            model = %self.name,
            boundaries = self.boundaries.len(),
            elements = self.elements.len(),
            flows = self.flows.len(),
            "Freezing model registry"
        );

        let mut flows_from: FxHashMap<ElementId, Vec<usize>> = FxHashMap::default();
        let mut flows_to: FxHashMap<ElementId, Vec<usize>> = FxHashMap::default();
        for (idx, flow) in self.flows.iter().enumerate() {
            flows_from.entry(flow.source.clone()).or_default().push(idx);
            flows_to
                .entry(flow.destination.clone())
                .or_default()
                .push(idx);
        }

        Registry {
            name: self.name,
            description: self.description,
            boundaries: self.boundaries,
            elements: self.elements,
            flows: self.flows,
            boundary_index: self.boundary_index,
            element_index: self.element_index,
            flow_index: self.flow_index,
            flows_from,
            flows_to,
        }
    }
}

/// The frozen, immutable model graph.
///
/// All lookups are pure and side-effect-free; iteration follows declaration
/// order, which downstream components rely on for deterministic output.
#[derive(Debug)]
pub struct Registry {
    name: String,
    description: String,
    boundaries: Vec<Boundary>,
    elements: Vec<Element>,
    flows: Vec<Dataflow>,
    boundary_index: FxHashMap<BoundaryId, usize>,
    element_index: FxHashMap<ElementId, usize>,
    flow_index: FxHashMap<FlowId, usize>,
    flows_from: FxHashMap<ElementId, Vec<usize>>,
    flows_to: FxHashMap<ElementId, Vec<usize>>,
}

impl Registry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All boundaries in declaration order.
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// All elements in declaration order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// All flows in declaration order (equal to sequence-position order).
    pub fn flows(&self) -> &[Dataflow] {
        &self.flows
    }

    pub fn boundary(&self, id: &BoundaryId) -> Option<&Boundary> {
        self.boundary_index.get(id).map(|&i| &self.boundaries[i])
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.element_index.get(id).map(|&i| &self.elements[i])
    }

    pub fn flow(&self, id: &FlowId) -> Option<&Dataflow> {
        self.flow_index.get(id).map(|&i| &self.flows[i])
    }

    /// The immediate boundary containing an element.
    pub fn boundary_of(&self, element: &ElementId) -> Option<&Boundary> {
        self.element(element).and_then(|e| self.boundary(&e.boundary))
    }

    pub fn elements_in_boundary<'a>(
        &'a self,
        boundary: &'a BoundaryId,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| &e.boundary == boundary)
    }

    pub fn flows_from<'a>(
        &'a self,
        element: &ElementId,
    ) -> impl Iterator<Item = &'a Dataflow> + 'a {
        self.flows_from
            .get(element)
            .into_iter()
            .flatten()
            .map(|&i| &self.flows[i])
    }

    pub fn flows_to<'a>(&'a self, element: &ElementId) -> impl Iterator<Item = &'a Dataflow> + 'a {
        self.flows_to
            .get(element)
            .into_iter()
            .flatten()
            .map(|&i| &self.flows[i])
    }

    /// The boundary and its ancestors, innermost first.
    ///
    /// Parent links are validated at construction, so the chain always
    /// resolves; a missing parent simply terminates the walk.
    pub fn boundary_chain<'a>(&'a self, id: &BoundaryId) -> Vec<&'a Boundary> {
        let mut chain = Vec::new();
        let mut current = self.boundary(id);
        while let Some(boundary) = current {
            chain.push(boundary);
            current = boundary.parent.as_ref().and_then(|p| self.boundary(p));
        }
        chain
    }
}
