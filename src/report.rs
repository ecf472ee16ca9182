//! The structured report value handed to external exporters.
//!
//! Building a report is a pure projection of the registry, the crossing
//! analysis, and the merged findings; writing it anywhere is the exporter's
//! job. The serde shape is the interface.

use crate::crossing::{Crossing, CrossingAnalysis, CrossingDirection};
use crate::diagram::{DataFlowDiagram, DiagramEdge, DiagramNode, SequenceStep, sequence_view};
use crate::error::Result;
use crate::model::{ElementVariant, Registry, TrustLevel};
use crate::rules::{Finding, SeveritySummary};
use serde::Serialize;
use tracing::debug;

/// Element, flow, and boundary counts of the analyzed model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub boundaries: usize,
    pub elements: usize,
    pub actors: usize,
    pub processes: usize,
    pub datastores: usize,
    pub external_entities: usize,
    pub flows: usize,
    pub crossings: usize,
}

/// One row of the boundary-crossing table, with boundary names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossingRow {
    pub flow: String,
    pub flow_name: String,
    pub source_boundary: String,
    pub destination_boundary: String,
    pub direction: CrossingDirection,
    pub exposure: TrustLevel,
}

/// The data-flow diagram description: nodes and edges, renderer-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataFlowSection {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

/// The complete analysis report: named sections, stable ordering throughout.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub model: String,
    pub description: String,
    pub generated_at: String,
    pub summary: ModelSummary,
    pub severity_summary: SeveritySummary,
    pub crossings: Vec<CrossingRow>,
    pub findings: Vec<Finding>,
    pub dataflow_diagram: DataFlowSection,
    pub sequence_diagram: Vec<SequenceStep>,
}

impl Report {
    /// Assemble a report from the analysis artifacts.
    ///
    /// `findings` must already be merged and canonically ordered; the report
    /// preserves them as given.
    pub fn build(registry: &Registry, crossings: &CrossingAnalysis, findings: Vec<Finding>) -> Self {
        debug!(
            model = registry.name(),
            findings = findings.len(),
            crossings = crossings.len(),
            "Assembling report"
        );

        let severity_summary = SeveritySummary::from_findings(&findings);
        let diagram = DataFlowDiagram::new(registry);

        Self {
            model: registry.name().to_string(),
            description: registry.description().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: model_summary(registry, crossings),
            severity_summary,
            crossings: crossings
                .all()
                .iter()
                .map(|c| crossing_row(registry, c))
                .collect(),
            findings,
            dataflow_diagram: DataFlowSection {
                nodes: diagram.nodes().collect(),
                edges: diagram.edges().collect(),
            },
            sequence_diagram: sequence_view(registry),
        }
    }

    /// Serialize the report for an external exporter.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn model_summary(registry: &Registry, crossings: &CrossingAnalysis) -> ModelSummary {
    let count = |variant: ElementVariant| {
        registry
            .elements()
            .iter()
            .filter(|e| e.variant() == variant)
            .count()
    };
    ModelSummary {
        boundaries: registry.boundaries().len(),
        elements: registry.elements().len(),
        actors: count(ElementVariant::Actor),
        processes: count(ElementVariant::Process),
        datastores: count(ElementVariant::Datastore),
        external_entities: count(ElementVariant::ExternalEntity),
        flows: registry.flows().len(),
        crossings: crossings.len(),
    }
}

fn crossing_row(registry: &Registry, crossing: &Crossing) -> CrossingRow {
    let boundary_name = |id| {
        registry
            .boundary(id)
            .map_or_else(|| id.to_string(), |b| b.name.clone())
    };
    CrossingRow {
        flow: crossing.flow.to_string(),
        flow_name: registry
            .flow(&crossing.flow)
            .map_or_else(String::new, |f| f.name.clone()),
        source_boundary: boundary_name(&crossing.source_boundary),
        destination_boundary: boundary_name(&crossing.destination_boundary),
        direction: crossing.direction,
        exposure: crossing.exposure,
    }
}
