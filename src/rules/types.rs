use crate::model::{Dataflow, Element, ElementId, ElementVariant, FlowId};
use crate::rules::engine::AnalysisContext;
use serde::{Deserialize, Serialize};

/// Severity of a finding, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Informational => "informational",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Threat category, following the STRIDE framing plus a hygiene bucket for
/// findings about the model itself rather than the system it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Spoofing,
    Tampering,
    Repudiation,
    InformationDisclosure,
    DenialOfService,
    ElevationOfPrivilege,
    ModelHygiene,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Spoofing => "spoofing",
            Category::Tampering => "tampering",
            Category::Repudiation => "repudiation",
            Category::InformationDisclosure => "information_disclosure",
            Category::DenialOfService => "denial_of_service",
            Category::ElevationOfPrivilege => "elevation_of_privilege",
            Category::ModelHygiene => "model_hygiene",
        }
    }
}

/// Which targets a rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub enum Applicability {
    Flows,
    Elements(&'static [ElementVariant]),
}

/// Predicate of a rule. Returns the evidence that triggered the match, or
/// `None` when the target is clean.
#[derive(Clone, Copy)]
pub enum RuleCheck {
    Flow(fn(&Dataflow, &AnalysisContext) -> Option<Vec<Evidence>>),
    Element(fn(&Element, &AnalysisContext) -> Option<Vec<Evidence>>),
}

impl std::fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleCheck::Flow(_) => write!(f, "RuleCheck::Flow"),
            RuleCheck::Element(_) => write!(f, "RuleCheck::Element"),
        }
    }
}

/// A threat-rule descriptor: metadata plus a predicate.
///
/// The library is a static list; extending it means appending descriptors.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub category: Category,
    pub applies_to: Applicability,
    pub check: RuleCheck,
    pub message: &'static str,
    pub recommendation: &'static str,
}

/// An attribute value that contributed to a rule match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub attribute: String,
    pub value: String,
}

impl Evidence {
    pub fn new(attribute: impl Into<String>, value: impl ToString) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.to_string(),
        }
    }
}

/// Weak reference to the element or flow a finding is about.
///
/// Resolved against the registry at render time; never assumed alive on its
/// own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum TargetRef {
    Element(ElementId),
    Flow(FlowId),
}

impl TargetRef {
    pub fn id(&self) -> &str {
        match self {
            TargetRef::Element(id) => id.as_str(),
            TargetRef::Flow(id) => id.as_str(),
        }
    }
}

/// A single reported weakness, tied to its triggering rule and target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    pub category: Category,
    pub target: TargetRef,
    pub target_name: String,
    pub name: String,
    pub message: String,
    pub recommendation: String,
    pub evidence: Vec<Evidence>,
}

impl Finding {
    pub fn for_element(rule: &Rule, element: &Element, evidence: Vec<Evidence>) -> Self {
        Self {
            rule_id: rule.id.to_string(),
            severity: rule.severity,
            category: rule.category,
            target: TargetRef::Element(element.id.clone()),
            target_name: element.name.clone(),
            name: rule.name.to_string(),
            message: rule.message.to_string(),
            recommendation: rule.recommendation.to_string(),
            evidence,
        }
    }

    pub fn for_flow(rule: &Rule, flow: &Dataflow, evidence: Vec<Evidence>) -> Self {
        Self {
            rule_id: rule.id.to_string(),
            severity: rule.severity,
            category: rule.category,
            target: TargetRef::Flow(flow.id.clone()),
            target_name: flow.name.clone(),
            name: rule.name.to_string(),
            message: rule.message.to_string(),
            recommendation: rule.recommendation.to_string(),
            evidence,
        }
    }
}

/// Per-severity counts over a finding set, plus a pass/fail verdict.
///
/// A model passes when it has no critical or high findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub informational: usize,
    pub passed: bool,
}

impl SeveritySummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self {
            critical: 0,
            high: 0,
            medium: 0,
            low: 0,
            informational: 0,
            passed: true,
        };
        for finding in findings {
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Informational => summary.informational += 1,
            }
        }
        summary.passed = summary.critical == 0 && summary.high == 0;
        summary
    }
}
