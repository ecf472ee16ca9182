//! End-to-end analysis pipeline.
//!
//! Registry -> crossing analysis -> rule evaluation -> merge -> report, all
//! CPU-bound and free of suspension points. A failure is deterministic, so
//! there is no retry path.

use crate::crossing::CrossingAnalysis;
use crate::dedup::FindingMerger;
use crate::model::Registry;
use crate::report::Report;
use crate::rules::{AnalysisContext, RuleEngine};
use tracing::debug;

/// Run the full pipeline over a frozen model.
pub fn analyze(registry: &Registry) -> Report {
    run(registry, false)
}

/// Run the pipeline with rule evaluation spread over rayon workers.
///
/// Candidate emission order differs from the sequential path; the merger's
/// canonical sort makes the final report identical.
pub fn analyze_parallel(registry: &Registry) -> Report {
    run(registry, true)
}

fn run(registry: &Registry, parallel: bool) -> Report {
    let crossings = CrossingAnalysis::of(registry);
    let ctx = AnalysisContext::new(registry, &crossings);

    let engine = RuleEngine::new();
    let candidates = if parallel {
        engine.evaluate_parallel(&ctx)
    } else {
        engine.evaluate(&ctx)
    };
    debug!(candidates = candidates.len(), "Rule evaluation complete");

    let mut merger = FindingMerger::new();
    merger.add_all(candidates);
    let findings = merger.into_sorted();
    debug!(findings = findings.len(), "Findings merged");

    Report::build(registry, &crossings, findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Boundary, Dataflow, DatastoreAttributes, Element, ModelBuilder, ProcessAttributes,
        TrustLevel,
    };

    fn insecure_registry() -> Registry {
        let mut builder = ModelBuilder::new("pipeline test");
        builder
            .add_boundary(Boundary::new("internet", "Internet", TrustLevel::Internet))
            .unwrap()
            .add_boundary(Boundary::new("cloud", "Cloud", TrustLevel::Cloud))
            .unwrap()
            .add_element(Element::actor("user", "User", "internet"))
            .unwrap()
            .add_element(Element::process(
                "app",
                "App",
                "cloud",
                ProcessAttributes::default(),
            ))
            .unwrap()
            .add_element(Element::datastore(
                "db",
                "DB",
                "cloud",
                DatastoreAttributes::default().stores_sensitive_data(true),
            ))
            .unwrap()
            .add_flow(Dataflow::new("req", "Request", "user", "app"))
            .unwrap()
            .add_flow(Dataflow::new("save", "Save", "app", "db"))
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let registry = insecure_registry();
        let first = analyze(&registry);
        let second = analyze(&registry);

        let strip_timestamp = |report: &Report| {
            let mut value = serde_json::to_value(report).unwrap();
            value["generated_at"] = serde_json::Value::Null;
            value
        };
        assert_eq!(strip_timestamp(&first), strip_timestamp(&second));
    }

    #[test]
    fn test_parallel_pipeline_matches_sequential() {
        let registry = insecure_registry();
        let sequential = analyze(&registry);
        let parallel = analyze_parallel(&registry);

        assert_eq!(
            serde_json::to_value(&sequential.findings).unwrap(),
            serde_json::to_value(&parallel.findings).unwrap()
        );
        assert_eq!(sequential.severity_summary, parallel.severity_summary);
    }

    #[test]
    fn test_pipeline_surfaces_expected_findings() {
        let registry = insecure_registry();
        let report = analyze(&registry);

        assert!(!report.severity_summary.passed);
        assert!(report.findings.iter().any(|f| f.rule_id == "DS-001"));
        assert!(report.findings.iter().any(|f| f.rule_id == "DF-002"));
        assert_eq!(report.summary.crossings, 1);
    }
}
