//! Rules over processes and servers receiving flows from other boundaries.

use crate::model::{ElementKind, ElementVariant, TrustLevel};
use crate::rules::types::{Applicability, Category, Evidence, Rule, RuleCheck, Severity};

const PROCESSES: &[ElementVariant] = &[ElementVariant::Process];

pub fn rules() -> Vec<Rule> {
    vec![pr_001(), pr_002(), pr_003(), pr_004(), pr_005()]
}

fn pr_001() -> Rule {
    Rule {
        id: "PR-001",
        name: "Missing authentication",
        description: "A process without an authentication scheme receives flows from outside its own boundary",
        severity: Severity::High,
        category: Category::Spoofing,
        applies_to: Applicability::Elements(PROCESSES),
        check: RuleCheck::Element(|element, ctx| {
            let attrs = element.as_process()?;
            if attrs.implements_authentication_scheme
                || !ctx.receives_external_input(&element.id)
            {
                return None;
            }
            Some(vec![Evidence::new("implements_authentication_scheme", false)])
        }),
        message: "Process receives cross-boundary traffic without an authentication scheme",
        recommendation: "Implement an authentication scheme for externally reachable processes",
    }
}

fn pr_002() -> Rule {
    Rule {
        id: "PR-002",
        name: "Injection risk",
        description: "A process that neither fully sanitizes nor validates its input receives external input",
        severity: Severity::Medium,
        category: Category::Tampering,
        applies_to: Applicability::Elements(PROCESSES),
        check: RuleCheck::Element(|element, ctx| {
            let attrs = element.as_process()?;
            if !ctx.receives_external_input(&element.id) {
                return None;
            }
            let mut evidence = Vec::new();
            if !attrs.sanitizes_input {
                evidence.push(Evidence::new("sanitizes_input", false));
            }
            if !attrs.validates_input {
                evidence.push(Evidence::new("validates_input", false));
            }
            if evidence.is_empty() {
                None
            } else {
                Some(evidence)
            }
        }),
        message: "Process handles external input without full sanitization and validation",
        recommendation: "Sanitize and validate all input arriving from other trust boundaries",
    }
}

fn pr_003() -> Rule {
    Rule {
        id: "PR-003",
        name: "Unhardened internet-facing process",
        description: "A process without hardening is reachable through an Internet-exposed crossing",
        severity: Severity::Medium,
        category: Category::ElevationOfPrivilege,
        applies_to: Applicability::Elements(PROCESSES),
        check: RuleCheck::Element(|element, ctx| {
            let attrs = element.as_process()?;
            if attrs.is_hardened || ctx.inbound_exposure(&element.id) != Some(TrustLevel::Internet)
            {
                return None;
            }
            Some(vec![
                Evidence::new("is_hardened", false),
                Evidence::new("inbound_exposure", TrustLevel::Internet),
            ])
        }),
        message: "Internet-reachable process is not hardened",
        recommendation: "Harden the host (minimal services, patched OS, restricted accounts)",
    }
}

fn pr_004() -> Rule {
    Rule {
        id: "PR-004",
        name: "Source not authorized",
        description: "A process that does not authorize its sources receives cross-boundary flows",
        severity: Severity::Medium,
        category: Category::ElevationOfPrivilege,
        applies_to: Applicability::Elements(PROCESSES),
        check: RuleCheck::Element(|element, ctx| {
            let attrs = element.as_process()?;
            if attrs.authorizes_source || !ctx.receives_external_input(&element.id) {
                return None;
            }
            Some(vec![Evidence::new("authorizes_source", false)])
        }),
        message: "Process accepts cross-boundary flows without authorizing their source",
        recommendation: "Check caller authorization before acting on cross-boundary requests",
    }
}

fn pr_005() -> Rule {
    Rule {
        id: "PR-005",
        name: "Unencoded output to user agent",
        description: "A process replies to an actor without encoding its output, a cross-site-scripting vector",
        severity: Severity::Medium,
        category: Category::Tampering,
        applies_to: Applicability::Elements(PROCESSES),
        check: RuleCheck::Element(|element, ctx| {
            let attrs = element.as_process()?;
            if attrs.encodes_output {
                return None;
            }
            let serves_actor = ctx.registry().flows_from(&element.id).any(|flow| {
                ctx.registry()
                    .element(&flow.destination)
                    .is_some_and(|dest| matches!(dest.kind, ElementKind::Actor))
            });
            if !serves_actor {
                return None;
            }
            Some(vec![Evidence::new("encodes_output", false)])
        }),
        message: "Process serves content to an actor without output encoding",
        recommendation: "Encode all output rendered in a user agent to prevent script injection",
    }
}
