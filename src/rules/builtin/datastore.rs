//! Data-at-rest rules over datastores.

use crate::model::ElementVariant;
use crate::rules::types::{Applicability, Category, Evidence, Rule, RuleCheck, Severity};

const DATASTORES: &[ElementVariant] = &[ElementVariant::Datastore];

pub fn rules() -> Vec<Rule> {
    vec![ds_001(), ds_002(), ds_003()]
}

fn ds_001() -> Rule {
    Rule {
        id: "DS-001",
        name: "Sensitive data at rest unencrypted",
        description: "A datastore holding PII or sensitive data without encryption at rest",
        severity: Severity::Critical,
        category: Category::InformationDisclosure,
        applies_to: Applicability::Elements(DATASTORES),
        check: RuleCheck::Element(|element, _ctx| {
            let attrs = element.as_datastore()?;
            if attrs.is_encrypted || !(attrs.stores_pii || attrs.stores_sensitive_data) {
                return None;
            }
            let mut evidence = Vec::new();
            if attrs.stores_pii {
                evidence.push(Evidence::new("stores_pii", true));
            }
            if attrs.stores_sensitive_data {
                evidence.push(Evidence::new("stores_sensitive_data", true));
            }
            evidence.push(Evidence::new("is_encrypted", false));
            Some(evidence)
        }),
        message: "Datastore holds sensitive data without encryption at rest",
        recommendation: "Enable encryption at rest for any store of PII or sensitive data",
    }
}

fn ds_002() -> Rule {
    Rule {
        id: "DS-002",
        name: "SQL store written by unsanitized source",
        description: "A SQL datastore receives flows from a source that does not sanitize its input",
        severity: Severity::High,
        category: Category::Tampering,
        applies_to: Applicability::Elements(DATASTORES),
        check: RuleCheck::Element(|element, ctx| {
            let attrs = element.as_datastore()?;
            if !attrs.is_sql {
                return None;
            }
            // Non-process sources have no sanitization attribute; the
            // conservative default treats them as unsanitized.
            let offenders: Vec<Evidence> = ctx
                .registry()
                .flows_to(&element.id)
                .filter(|flow| {
                    ctx.registry()
                        .element(&flow.source)
                        .and_then(|source| source.as_process())
                        .map_or(true, |attrs| !attrs.sanitizes_input)
                })
                .map(|flow| Evidence::new("unsanitized_source", flow.source.as_str()))
                .collect();
            if offenders.is_empty() {
                None
            } else {
                Some(offenders)
            }
        }),
        message: "SQL datastore is written by sources without input sanitization",
        recommendation: "Use parameterized queries and sanitize input in every writer",
    }
}

fn ds_003() -> Rule {
    Rule {
        id: "DS-003",
        name: "Log data stored unencrypted",
        description: "A datastore holding log data without encryption at rest",
        severity: Severity::Low,
        category: Category::Repudiation,
        applies_to: Applicability::Elements(DATASTORES),
        check: RuleCheck::Element(|element, _ctx| {
            let attrs = element.as_datastore()?;
            if attrs.is_encrypted || !attrs.stores_log_data {
                return None;
            }
            Some(vec![
                Evidence::new("stores_log_data", true),
                Evidence::new("is_encrypted", false),
            ])
        }),
        message: "Log datastore is not encrypted at rest",
        recommendation: "Encrypt log stores; audit trails are tampering and disclosure targets",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossing::CrossingAnalysis;
    use crate::model::{
        Boundary, Dataflow, DatastoreAttributes, Element, ModelBuilder, ProcessAttributes,
        Registry, TrustLevel,
    };
    use crate::rules::engine::{AnalysisContext, RuleEngine};
    use crate::rules::types::Finding;

    fn registry_with_store(attrs: DatastoreAttributes, writer: ProcessAttributes) -> Registry {
        let mut builder = ModelBuilder::new("datastore rules");
        builder
            .add_boundary(Boundary::new("internal", "Internal", TrustLevel::Internal))
            .unwrap()
            .add_element(Element::process("api", "API", "internal", writer))
            .unwrap()
            .add_element(Element::datastore("db", "DB", "internal", attrs))
            .unwrap()
            .add_flow(Dataflow::new("write", "Write", "api", "db"))
            .unwrap();
        builder.build()
    }

    fn findings_for(registry: &Registry) -> Vec<Finding> {
        let crossings = CrossingAnalysis::of(registry);
        let ctx = AnalysisContext::new(registry, &crossings);
        RuleEngine::new().evaluate(&ctx)
    }

    #[test]
    fn test_ds_001_fires_on_unencrypted_pii() {
        let registry = registry_with_store(
            DatastoreAttributes::default().stores_pii(true),
            ProcessAttributes::default(),
        );
        let findings = findings_for(&registry);
        let finding = findings.iter().find(|f| f.rule_id == "DS-001").unwrap();
        assert_eq!(finding.severity, Severity::Critical);
        assert!(finding
            .evidence
            .iter()
            .any(|e| e.attribute == "stores_pii" && e.value == "true"));
        assert!(finding
            .evidence
            .iter()
            .any(|e| e.attribute == "is_encrypted" && e.value == "false"));
    }

    #[test]
    fn test_ds_001_fires_regardless_of_other_attributes() {
        // Rule soundness: stores_pii + unencrypted always fires.
        let registry = registry_with_store(
            DatastoreAttributes::default()
                .stores_pii(true)
                .sql(true)
                .stores_log_data(true),
            ProcessAttributes::default().sanitizes_input(true),
        );
        let findings = findings_for(&registry);
        assert_eq!(
            findings.iter().filter(|f| f.rule_id == "DS-001").count(),
            1
        );
    }

    #[test]
    fn test_ds_001_quiet_when_encrypted() {
        let registry = registry_with_store(
            DatastoreAttributes::default()
                .stores_pii(true)
                .stores_sensitive_data(true)
                .encrypted(true),
            ProcessAttributes::default(),
        );
        let findings = findings_for(&registry);
        assert!(!findings.iter().any(|f| f.rule_id == "DS-001"));
    }

    #[test]
    fn test_ds_001_quiet_without_sensitive_content() {
        let registry = registry_with_store(
            DatastoreAttributes::default(),
            ProcessAttributes::default(),
        );
        let findings = findings_for(&registry);
        assert!(!findings.iter().any(|f| f.rule_id == "DS-001"));
    }

    #[test]
    fn test_ds_002_fires_on_unsanitized_writer() {
        let registry = registry_with_store(
            DatastoreAttributes::default().sql(true),
            ProcessAttributes::default(),
        );
        let findings = findings_for(&registry);
        let finding = findings.iter().find(|f| f.rule_id == "DS-002").unwrap();
        assert_eq!(finding.evidence[0].attribute, "unsanitized_source");
        assert_eq!(finding.evidence[0].value, "api");
    }

    #[test]
    fn test_ds_002_quiet_on_sanitizing_writer() {
        let registry = registry_with_store(
            DatastoreAttributes::default().sql(true),
            ProcessAttributes::default().sanitizes_input(true),
        );
        let findings = findings_for(&registry);
        assert!(!findings.iter().any(|f| f.rule_id == "DS-002"));
    }

    #[test]
    fn test_ds_002_quiet_on_non_sql_store() {
        let registry = registry_with_store(
            DatastoreAttributes::default(),
            ProcessAttributes::default(),
        );
        let findings = findings_for(&registry);
        assert!(!findings.iter().any(|f| f.rule_id == "DS-002"));
    }

    #[test]
    fn test_ds_003_log_data() {
        let registry = registry_with_store(
            DatastoreAttributes::default().stores_log_data(true),
            ProcessAttributes::default(),
        );
        let findings = findings_for(&registry);
        let finding = findings.iter().find(|f| f.rule_id == "DS-003").unwrap();
        assert_eq!(finding.severity, Severity::Low);

        let encrypted = registry_with_store(
            DatastoreAttributes::default().stores_log_data(true).encrypted(true),
            ProcessAttributes::default(),
        );
        assert!(!findings_for(&encrypted).iter().any(|f| f.rule_id == "DS-003"));
    }
}
