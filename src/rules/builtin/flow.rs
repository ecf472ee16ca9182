//! Data-in-transit rules, evaluated against flows and their crossing
//! classification.

use crate::crossing::CrossingDirection;
use crate::rules::types::{Applicability, Category, Evidence, Rule, RuleCheck, Severity};

pub fn rules() -> Vec<Rule> {
    vec![df_001(), df_002(), df_003()]
}

/// Protocols that provide transport encryption by themselves.
fn is_encrypted_protocol(protocol: &str) -> bool {
    matches!(
        protocol.to_ascii_uppercase().as_str(),
        "HTTPS" | "TLS" | "SSH" | "SFTP" | "WSS" | "GRPCS" | "MTLS"
    )
}

fn df_001() -> Rule {
    Rule {
        id: "DF-001",
        name: "Data exposed in transit",
        description: "An unencrypted flow crossing into a lower-trust boundary exposes its payload to the less trusted zone",
        severity: Severity::High,
        category: Category::InformationDisclosure,
        applies_to: Applicability::Flows,
        check: RuleCheck::Flow(|flow, ctx| {
            let crossing = ctx.crossings().for_flow(&flow.id)?;
            if crossing.direction != CrossingDirection::Egress || flow.is_encrypted {
                return None;
            }
            Some(vec![
                Evidence::new("is_encrypted", false),
                Evidence::new(
                    "crossing",
                    format!(
                        "{} -> {}",
                        crossing.source_boundary, crossing.destination_boundary
                    ),
                ),
            ])
        }),
        message: "Unencrypted data crosses into a lower-trust boundary",
        recommendation: "Encrypt the flow (TLS or equivalent) before it leaves the trusted zone",
    }
}

fn df_002() -> Rule {
    Rule {
        id: "DF-002",
        name: "Unauthenticated cross-boundary access",
        description: "A flow crossing any trust boundary without an authentication mechanism",
        severity: Severity::High,
        category: Category::Spoofing,
        applies_to: Applicability::Flows,
        check: RuleCheck::Flow(|flow, ctx| {
            let crossing = ctx.crossings().for_flow(&flow.id)?;
            if flow.authenticated_with {
                return None;
            }
            Some(vec![
                Evidence::new("authenticated_with", false),
                Evidence::new("direction", crossing.direction),
            ])
        }),
        message: "Flow crosses a trust boundary without authentication",
        recommendation: "Authenticate the flow (tokens, mutual TLS, or signed requests)",
    }
}

fn df_003() -> Rule {
    Rule {
        id: "DF-003",
        name: "Cleartext protocol across trust boundary",
        description: "A crossing flow whose declared protocol provides no transport encryption",
        severity: Severity::Medium,
        category: Category::Tampering,
        applies_to: Applicability::Flows,
        check: RuleCheck::Flow(|flow, ctx| {
            ctx.crossings().for_flow(&flow.id)?;
            match flow.protocol.as_deref() {
                Some(protocol) if is_encrypted_protocol(protocol) => None,
                Some(protocol) => Some(vec![Evidence::new("protocol", protocol)]),
                // Undeclared protocol reads as its conservative default.
                None => Some(vec![Evidence::new("protocol", "unset")]),
            }
        }),
        message: "Cross-boundary flow uses a protocol without transport encryption",
        recommendation: "Declare an encrypted protocol (HTTPS, TLS, SSH) for this flow",
    }
}
