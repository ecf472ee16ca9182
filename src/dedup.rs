//! Finding deduplication and canonical ordering.
//!
//! Two candidate findings are equivalent iff they share the same
//! (rule id, target id) pair. Equivalence is decided by that key alone,
//! never by comparing rendered descriptions.

use crate::rules::{Finding, Severity};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// Collapses equivalent candidate findings into one finding each.
///
/// Merging keeps the first-seen description, unions evidence in first-seen
/// order, and keeps the highest severity observed. The merge is idempotent:
/// feeding an already-merged set back in yields the same set.
#[derive(Debug, Default)]
pub struct FindingMerger {
    merged: Vec<Finding>,
    index: FxHashMap<(String, String), usize>,
}

impl FindingMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, finding: Finding) {
        let key = (finding.rule_id.clone(), finding.target.id().to_string());
        match self.index.get(&key) {
            Some(&idx) => {
                let existing = &mut self.merged[idx];
                existing.severity = existing.severity.max(finding.severity);
                for evidence in finding.evidence {
                    if !existing.evidence.contains(&evidence) {
                        existing.evidence.push(evidence);
                    }
                }
            }
            None => {
                self.index.insert(key, self.merged.len());
                self.merged.push(finding);
            }
        }
    }

    pub fn add_all(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.add(finding);
        }
    }

    pub fn len(&self) -> usize {
        self.merged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// The highest severity among merged findings.
    pub fn highest_severity(&self) -> Option<Severity> {
        self.merged.iter().map(|f| f.severity).max()
    }

    /// Consume the merger and return findings in canonical order.
    pub fn into_sorted(self) -> Vec<Finding> {
        let mut findings = self.merged;
        findings.sort_by(canonical_order);
        findings
    }
}

/// Canonical finding order: severity descending, then target identifier,
/// then rule identifier.
pub fn canonical_order(a: &Finding, b: &Finding) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| a.target.id().cmp(b.target.id()))
        .then_with(|| a.rule_id.cmp(&b.rule_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Category, Evidence, TargetRef};

    fn finding(rule_id: &str, target: &str, severity: Severity, evidence: Vec<Evidence>) -> Finding {
        Finding {
            rule_id: rule_id.to_string(),
            severity,
            category: Category::InformationDisclosure,
            target: TargetRef::Element(target.into()),
            target_name: target.to_string(),
            name: "Test".to_string(),
            message: "test".to_string(),
            recommendation: "fix".to_string(),
            evidence,
        }
    }

    #[test]
    fn test_equivalent_findings_merge() {
        let mut merger = FindingMerger::new();
        merger.add(finding("R1", "db", Severity::High, vec![Evidence::new("a", 1)]));
        merger.add(finding("R1", "db", Severity::Critical, vec![Evidence::new("b", 2)]));

        assert_eq!(merger.len(), 1);
        let merged = merger.into_sorted();
        assert_eq!(merged[0].severity, Severity::Critical);
        let attrs: Vec<_> = merged[0].evidence.iter().map(|e| e.attribute.as_str()).collect();
        assert_eq!(attrs, vec!["a", "b"]);
    }

    #[test]
    fn test_evidence_union_preserves_first_seen_order() {
        let mut merger = FindingMerger::new();
        merger.add(finding(
            "R1",
            "db",
            Severity::High,
            vec![Evidence::new("a", 1), Evidence::new("b", 2)],
        ));
        merger.add(finding(
            "R1",
            "db",
            Severity::High,
            vec![Evidence::new("b", 2), Evidence::new("c", 3)],
        ));

        let merged = merger.into_sorted();
        let attrs: Vec<_> = merged[0].evidence.iter().map(|e| e.attribute.as_str()).collect();
        assert_eq!(attrs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_distinct_keys_never_merge() {
        let mut merger = FindingMerger::new();
        // Identical rendered content, different targets: stays separate.
        merger.add(finding("R1", "db1", Severity::High, vec![]));
        merger.add(finding("R1", "db2", Severity::High, vec![]));
        // Same target, different rule: stays separate.
        merger.add(finding("R2", "db1", Severity::High, vec![]));

        assert_eq!(merger.len(), 3);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut merger = FindingMerger::new();
        merger.add(finding("R1", "db", Severity::Critical, vec![Evidence::new("a", 1)]));
        merger.add(finding("R2", "api", Severity::High, vec![]));
        let first_pass = merger.into_sorted();

        let mut again = FindingMerger::new();
        again.add_all(first_pass.clone());
        again.add_all(first_pass.clone());
        let second_pass = again.into_sorted();

        assert_eq!(first_pass.len(), second_pass.len());
        for (a, b) in first_pass.iter().zip(&second_pass) {
            assert_eq!(a.rule_id, b.rule_id);
            assert_eq!(a.severity, b.severity);
            assert_eq!(a.evidence, b.evidence);
        }
    }

    #[test]
    fn test_canonical_order() {
        let mut merger = FindingMerger::new();
        merger.add(finding("R2", "beta", Severity::High, vec![]));
        merger.add(finding("R1", "beta", Severity::High, vec![]));
        merger.add(finding("R1", "alpha", Severity::High, vec![]));
        merger.add(finding("R1", "zulu", Severity::Critical, vec![]));
        merger.add(finding("R1", "gamma", Severity::Informational, vec![]));

        let sorted = merger.into_sorted();
        let keys: Vec<_> = sorted
            .iter()
            .map(|f| (f.severity, f.target.id().to_string(), f.rule_id.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Severity::Critical, "zulu".to_string(), "R1".to_string()),
                (Severity::High, "alpha".to_string(), "R1".to_string()),
                (Severity::High, "beta".to_string(), "R1".to_string()),
                (Severity::High, "beta".to_string(), "R2".to_string()),
                (Severity::Informational, "gamma".to_string(), "R1".to_string()),
            ]
        );
    }

    #[test]
    fn test_highest_severity() {
        let mut merger = FindingMerger::new();
        assert_eq!(merger.highest_severity(), None);
        merger.add(finding("R1", "a", Severity::Low, vec![]));
        merger.add(finding("R2", "b", Severity::Critical, vec![]));
        assert_eq!(merger.highest_severity(), Some(Severity::Critical));
    }
}
