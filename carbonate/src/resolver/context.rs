//! Per-request resolution state
//!
//! Owns the memo, the stack of in-progress quantities and the trace for one
//! call to `Resolver::resolve`. Dropped when the request ends.

use super::timeout::TimeoutTracker;
use crate::catalog::ReferenceData;
use crate::method::{Compliance, Inputs, Method};
use crate::registry::GraphRegistry;
use crate::trace::{Outcome, RequirementUse, SkipReason, SkippedMethod, Source, Trace, TraceEntry};
use crate::{CarbonateError, CarbonateResult, FactStore, ResourceLimits, TimeRange, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

/// Memoized result of a node
#[derive(Debug, Clone)]
pub(crate) struct Memo {
    pub value: Option<Value>,
    pub method: Option<String>,
}

pub(crate) struct ResolutionContext<'a> {
    registry: &'a GraphRegistry,
    catalog: &'a dyn ReferenceData,
    facts: &'a FactStore,
    timeframe: TimeRange,
    compliance: &'a Compliance,
    limits: &'a ResourceLimits,
    timeout: TimeoutTracker,

    /// At most one evaluation per node per request
    pub memo: HashMap<String, Memo>,

    /// Nodes currently being resolved further up the call stack
    in_progress: HashSet<String>,

    /// Facts already recorded in the trace
    facts_traced: HashSet<String>,

    pub trace: Trace,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        registry: &'a GraphRegistry,
        catalog: &'a dyn ReferenceData,
        facts: &'a FactStore,
        timeframe: TimeRange,
        compliance: &'a Compliance,
        limits: &'a ResourceLimits,
    ) -> Self {
        Self {
            registry,
            catalog,
            facts,
            timeframe,
            compliance,
            limits,
            timeout: TimeoutTracker::new(),
            memo: HashMap::new(),
            in_progress: HashSet::new(),
            facts_traced: HashSet::new(),
            trace: Trace::new(),
        }
    }

    /// Resolve one quantity: fact, then memo, then the node's methods in order
    pub fn resolve(&mut self, name: &str, depth: usize) -> CarbonateResult<Option<Value>> {
        if let Some(value) = self.facts.get(name) {
            if self.facts_traced.insert(name.to_string()) {
                self.trace.push(TraceEntry {
                    quantity: name.to_string(),
                    value: Some(value.clone()),
                    outcome: Outcome::Fact,
                    requirements: Vec::new(),
                    skipped: Vec::new(),
                });
            }
            return Ok(Some(value.clone()));
        }

        if let Some(memo) = self.memo.get(name) {
            return Ok(memo.value.clone());
        }

        // A soft requirement that leads back into a node still being resolved
        if self.in_progress.contains(name) {
            trace!(quantity = name, "re-entered while in progress, treating as unknown");
            return Ok(None);
        }

        let registry = self.registry;
        let Some(node) = registry.node(name) else {
            return Ok(None);
        };

        if depth > self.limits.max_depth {
            return Err(CarbonateError::ResourceLimitExceeded {
                limit_name: "max_depth".to_string(),
                limit_value: self.limits.max_depth.to_string(),
                actual_value: depth.to_string(),
                suggestion: format!(
                    "Requirement chain through '{}' is deeper than {} levels",
                    name, self.limits.max_depth
                ),
            });
        }
        self.timeout.check_timeout(self.limits)?;

        self.in_progress.insert(name.to_string());
        let mut skipped = Vec::new();
        let mut selected = None;

        for method in node.methods() {
            match self.try_method(method, depth)? {
                Ok(value) => {
                    debug!(quantity = name, method = method.name(), "method selected");
                    selected = Some((method, value));
                    break;
                }
                Err(reason) => {
                    trace!(quantity = name, method = method.name(), reason = %reason, "method skipped");
                    skipped.push(SkippedMethod {
                        method: method.name().to_string(),
                        reason,
                    });
                }
            }
        }
        self.in_progress.remove(name);

        let entry = match selected {
            Some((method, value)) => {
                self.memo.insert(
                    name.to_string(),
                    Memo {
                        value: Some(value.clone()),
                        method: Some(method.name().to_string()),
                    },
                );
                TraceEntry {
                    quantity: name.to_string(),
                    value: Some(value),
                    outcome: Outcome::Method {
                        name: method.name().to_string(),
                        fallback: method.is_fallback(),
                    },
                    requirements: self.requirement_uses(method),
                    skipped,
                }
            }
            None => {
                debug!(quantity = name, "no method applied");
                self.memo.insert(
                    name.to_string(),
                    Memo {
                        value: None,
                        method: None,
                    },
                );
                TraceEntry {
                    quantity: name.to_string(),
                    value: None,
                    outcome: Outcome::Unresolved,
                    requirements: Vec::new(),
                    skipped,
                }
            }
        };

        let value = entry.value.clone();
        self.trace.push(entry);
        Ok(value)
    }

    /// Evaluate one method; the inner `Err` says why it was skipped
    fn try_method(
        &mut self,
        method: &Method,
        depth: usize,
    ) -> CarbonateResult<Result<Value, SkipReason>> {
        // Compliance is a hard gate, checked before any requirement resolves
        if !self.compliance.is_empty()
            && !self.compliance.is_satisfied_by(method.compliance_tags())
        {
            return Ok(Err(SkipReason::NonCompliant {
                missing: self.compliance.missing_from(method.compliance_tags()),
            }));
        }

        let mut values = BTreeMap::new();

        for requirement in method.hard_requirements() {
            match self.resolve(requirement, depth + 1)? {
                Some(value) => {
                    values.insert(requirement.clone(), value);
                }
                None => {
                    return Ok(Err(SkipReason::MissingRequirement {
                        name: requirement.clone(),
                    }));
                }
            }
        }

        for requirement in method.soft_requirements() {
            if let Some(value) = self.resolve(requirement, depth + 1)? {
                values.insert(requirement.clone(), value);
            }
        }

        let inputs = Inputs::new(values, self.catalog);
        Ok(method
            .compute(&inputs, &self.timeframe)
            .ok_or(SkipReason::Declined))
    }

    fn requirement_uses(&self, method: &Method) -> Vec<RequirementUse> {
        let hard = method.hard_requirements().iter().map(|n| (n, false));
        let soft = method.soft_requirements().iter().map(|n| (n, true));
        hard.chain(soft)
            .map(|(name, soft)| RequirementUse {
                name: name.clone(),
                soft,
                source: self.source_of(name),
            })
            .collect()
    }

    fn source_of(&self, name: &str) -> Source {
        if self.facts.contains(name) {
            return Source::Supplied;
        }
        match self.memo.get(name) {
            Some(Memo {
                method: Some(method),
                ..
            }) => Source::Derived {
                method: method.clone(),
            },
            _ => Source::Missing,
        }
    }
}
