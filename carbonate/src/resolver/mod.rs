//! Recursive, memoized resolution of a quantity
//!
//! Resolves a requested quantity by:
//! 1. Returning the caller's fact when one exists (facts beat every method)
//! 2. Returning the memoized result when the node was already visited
//! 3. Trying the node's methods in declaration order, skipping methods that
//!    fail the compliance filter, miss a hard requirement or decline
//! 4. Memoizing the first value produced, or undefined when none was
//!
//! Undefined propagates as "unknown". Only a guaranteed top-level quantity
//! that stays undefined without a compliance filter is an error.

pub mod context;
pub mod timeout;

use crate::catalog::ReferenceData;
use crate::method::Compliance;
use crate::registry::GraphRegistry;
use crate::trace::{Outcome, Trace};
use crate::{CarbonateError, CarbonateResult, FactStore, ResourceLimits, TimeRange, Value};
use context::ResolutionContext;
use serde::Serialize;
use tracing::warn;

/// Result of resolving one quantity
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub quantity: String,
    pub value: Option<Value>,
    /// Method that produced the value; `None` for facts and undefined results
    pub method: Option<String>,
    pub timeframe: TimeRange,
    pub compliance: Compliance,
    pub trace: Trace,
}

impl Resolution {
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }

    /// True when the value came straight from the fact store
    pub fn is_fact(&self) -> bool {
        matches!(
            self.trace.get(&self.quantity).map(|e| &e.outcome),
            Some(Outcome::Fact)
        )
    }
}

/// Resolves quantities against a frozen registry and a reference-data source
pub struct Resolver<'a> {
    registry: &'a GraphRegistry,
    catalog: &'a dyn ReferenceData,
    limits: ResourceLimits,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a GraphRegistry, catalog: &'a dyn ReferenceData) -> Self {
        Self {
            registry,
            catalog,
            limits: ResourceLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolve `quantity` for one request
    ///
    /// `timeframe` defaults to the current calendar year. A non-empty
    /// `compliance` admits only methods that comply with every listed
    /// standard, anywhere in the graph.
    pub fn resolve(
        &self,
        quantity: &str,
        facts: &FactStore,
        timeframe: Option<TimeRange>,
        compliance: &Compliance,
    ) -> CarbonateResult<Resolution> {
        facts.validate(self.registry)?;

        let timeframe = timeframe.unwrap_or_else(TimeRange::current_year);
        let mut context = ResolutionContext::new(
            self.registry,
            self.catalog,
            facts,
            timeframe,
            compliance,
            &self.limits,
        );

        let value = context.resolve(quantity, 0)?;
        let method = context.memo.get(quantity).and_then(|m| m.method.clone());

        // A compliance filter may legitimately rule out every method
        if value.is_none() && compliance.is_empty() {
            if let Some(node) = self.registry.node(quantity) {
                if node.is_guaranteed() {
                    let skipped = context
                        .trace
                        .get(quantity)
                        .map(|entry| {
                            entry
                                .skipped
                                .iter()
                                .map(|s| format!("'{}' {}", s.method, s.reason))
                                .collect()
                        })
                        .unwrap_or_default();
                    warn!(quantity, "guaranteed quantity did not resolve");
                    return Err(CarbonateError::UnreachableFallback {
                        quantity: quantity.to_string(),
                        skipped,
                    });
                }
            }
        }

        Ok(Resolution {
            quantity: quantity.to_string(),
            value,
            method,
            timeframe,
            compliance: compliance.clone(),
            trace: context.trace,
        })
    }
}
