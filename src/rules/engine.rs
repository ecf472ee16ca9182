use crate::crossing::{Crossing, CrossingAnalysis};
use crate::model::{Dataflow, Element, ElementId, Registry, TrustLevel};
use crate::rules::builtin;
use crate::rules::types::{Applicability, Finding, Rule, RuleCheck};
use rayon::prelude::*;
use tracing::trace;

/// Read-only view handed to rule predicates: the frozen registry plus the
/// crossing classification of every flow.
pub struct AnalysisContext<'a> {
    registry: &'a Registry,
    crossings: &'a CrossingAnalysis,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(registry: &'a Registry, crossings: &'a CrossingAnalysis) -> Self {
        Self { registry, crossings }
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    pub fn crossings(&self) -> &CrossingAnalysis {
        self.crossings
    }

    /// Crossings arriving at an element, in flow declaration order.
    pub fn inbound_crossings(&self, element: &ElementId) -> Vec<&Crossing> {
        self.registry
            .flows_to(element)
            .filter_map(|flow| self.crossings.for_flow(&flow.id))
            .collect()
    }

    /// Whether any flow into the element crosses a trust boundary.
    pub fn receives_external_input(&self, element: &ElementId) -> bool {
        self.registry
            .flows_to(element)
            .any(|flow| self.crossings.is_crossing(&flow.id))
    }

    /// The lowest trust level among crossings into the element. `None` when
    /// the element receives no crossing flows.
    pub fn inbound_exposure(&self, element: &ElementId) -> Option<TrustLevel> {
        self.inbound_crossings(element)
            .iter()
            .map(|c| c.exposure)
            .min()
    }

    /// Whether the element has no flows at all, in either direction.
    pub fn is_isolated(&self, element: &ElementId) -> bool {
        self.registry.flows_from(element).next().is_none()
            && self.registry.flows_to(element).next().is_none()
    }
}

/// Evaluates the rule library over a model.
///
/// The builtin library is a fixed, ordered list; extra rules appended via
/// `with_extra_rules` are evaluated after it, preserving their own order.
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rules: builtin::all_rules().to_vec(),
        }
    }

    pub fn with_extra_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Get a rule by ID.
    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Full cross-product scan: every rule against every target its filter
    /// admits. Candidate order is rule-list order, then target declaration
    /// order, so identical input always yields identical candidates.
    pub fn evaluate(&self, ctx: &AnalysisContext) -> Vec<Finding> {
        trace!(
            rules = self.rules.len(),
            elements = ctx.registry().elements().len(),
            flows = ctx.registry().flows().len(),
            "Evaluating rule library"
        );

        self.rules
            .iter()
            .flat_map(|rule| Self::evaluate_rule(rule, ctx))
            .collect()
    }

    /// Parallel scan over independent (rule, target) pairs.
    ///
    /// Candidate order is not guaranteed; the deduplicator's canonical sort
    /// re-establishes it, so post-merge output equals the sequential path.
    pub fn evaluate_parallel(&self, ctx: &AnalysisContext) -> Vec<Finding> {
        self.rules
            .par_iter()
            .flat_map_iter(|rule| Self::evaluate_rule(rule, ctx))
            .collect()
    }

    fn evaluate_rule<'a>(
        rule: &'a Rule,
        ctx: &'a AnalysisContext,
    ) -> Box<dyn Iterator<Item = Finding> + 'a> {
        match (rule.applies_to, rule.check) {
            (Applicability::Flows, RuleCheck::Flow(check)) => Box::new(
                ctx.registry()
                    .flows()
                    .iter()
                    .filter_map(move |flow| Self::check_flow(rule, check, flow, ctx)),
            ),
            (Applicability::Elements(variants), RuleCheck::Element(check)) => Box::new(
                ctx.registry()
                    .elements()
                    .iter()
                    .filter(move |element| variants.contains(&element.variant()))
                    .filter_map(move |element| Self::check_element(rule, check, element, ctx)),
            ),
            // A descriptor whose filter and predicate disagree matches nothing.
            _ => Box::new(std::iter::empty()),
        }
    }

    fn check_flow(
        rule: &Rule,
        check: fn(&Dataflow, &AnalysisContext) -> Option<Vec<super::types::Evidence>>,
        flow: &Dataflow,
        ctx: &AnalysisContext,
    ) -> Option<Finding> {
        check(flow, ctx).map(|evidence| Finding::for_flow(rule, flow, evidence))
    }

    fn check_element(
        rule: &Rule,
        check: fn(&Element, &AnalysisContext) -> Option<Vec<super::types::Evidence>>,
        element: &Element,
        ctx: &AnalysisContext,
    ) -> Option<Finding> {
        check(element, ctx).map(|evidence| Finding::for_element(rule, element, evidence))
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
