//! Model-hygiene rules: issues with the model itself, not the system.

use crate::model::ElementVariant;
use crate::rules::types::{Applicability, Category, Evidence, Rule, RuleCheck, Severity};

pub fn rules() -> Vec<Rule> {
    vec![hy_001(), hy_002()]
}

fn hy_001() -> Rule {
    Rule {
        id: "HY-001",
        name: "Unreferenced external dependency",
        description: "An external entity declared in the model but connected to no flow",
        severity: Severity::Informational,
        category: Category::ModelHygiene,
        applies_to: Applicability::Elements(&[ElementVariant::ExternalEntity]),
        check: RuleCheck::Element(|element, ctx| {
            if !ctx.is_isolated(&element.id) {
                return None;
            }
            Some(vec![Evidence::new("flows", 0)])
        }),
        message: "External entity participates in no dataflow",
        recommendation: "Connect the entity to its flows or remove it from the model",
    }
}

fn hy_002() -> Rule {
    Rule {
        id: "HY-002",
        name: "Isolated element",
        description: "An actor, process, or datastore connected to no flow",
        severity: Severity::Informational,
        category: Category::ModelHygiene,
        applies_to: Applicability::Elements(&[
            ElementVariant::Actor,
            ElementVariant::Process,
            ElementVariant::Datastore,
        ]),
        check: RuleCheck::Element(|element, ctx| {
            if !ctx.is_isolated(&element.id) {
                return None;
            }
            Some(vec![Evidence::new("flows", 0)])
        }),
        message: "Element participates in no dataflow",
        recommendation: "Model the element's flows or remove it",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossing::CrossingAnalysis;
    use crate::model::{
        Boundary, Dataflow, Element, ModelBuilder, ProcessAttributes, TrustLevel,
    };
    use crate::rules::engine::{AnalysisContext, RuleEngine};
    use crate::rules::types::TargetRef;

    #[test]
    fn test_hygiene_rules_flag_isolated_elements_only() {
        let mut builder = ModelBuilder::new("hygiene");
        builder
            .add_boundary(Boundary::new("internet", "Internet", TrustLevel::Internet))
            .unwrap()
            .add_boundary(Boundary::new("internal", "Internal", TrustLevel::Internal))
            .unwrap()
            .add_element(Element::actor("user", "User", "internet"))
            .unwrap()
            .add_element(Element::process(
                "api",
                "API",
                "internal",
                ProcessAttributes::default(),
            ))
            .unwrap()
            .add_element(Element::external_entity("ghost", "Unused Service", "internet"))
            .unwrap()
            .add_element(Element::actor("admin", "Admin", "internet"))
            .unwrap()
            .add_flow(Dataflow::new("req", "Request", "user", "api"))
            .unwrap();
        let registry = builder.build();

        let crossings = CrossingAnalysis::of(&registry);
        let ctx = AnalysisContext::new(&registry, &crossings);
        let findings = RuleEngine::new().evaluate(&ctx);

        let hy_001: Vec<_> = findings.iter().filter(|f| f.rule_id == "HY-001").collect();
        assert_eq!(hy_001.len(), 1);
        assert_eq!(hy_001[0].target, TargetRef::Element("ghost".into()));
        assert_eq!(hy_001[0].severity, Severity::Informational);

        let hy_002: Vec<_> = findings.iter().filter(|f| f.rule_id == "HY-002").collect();
        assert_eq!(hy_002.len(), 1);
        assert_eq!(hy_002[0].target, TargetRef::Element("admin".into()));
    }
}
