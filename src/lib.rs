pub mod crossing;
pub mod dedup;
pub mod diagram;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod rules;

pub use crossing::{Crossing, CrossingAnalysis, CrossingDirection};
pub use dedup::FindingMerger;
pub use diagram::{DataFlowDiagram, SequenceStep, sequence_view};
pub use error::{ModelError, Result};
pub use model::{
    Boundary, Dataflow, DatastoreAttributes, Element, ModelBuilder, ProcessAttributes, Registry,
    TrustLevel,
};
pub use pipeline::{analyze, analyze_parallel};
pub use report::Report;
pub use rules::{
    AnalysisContext, Category, Evidence, Finding, RuleEngine, Severity, SeveritySummary,
};
