use crate::catalog::{Catalog, ReferenceData};
use crate::method::Compliance;
use crate::registry::GraphRegistry;
use crate::{
    automobile, CarbonateResult, FactStore, Resolution, Resolver, ResourceLimits, TimeRange,
};
use std::sync::Arc;

/// The Carbonate resolution engine.
///
/// Owns a frozen registry, the reference data its methods read and the limits
/// applied to every request. Shareable across threads; each `resolve` call
/// keeps its own state.
pub struct Engine {
    registry: GraphRegistry,
    catalog: Arc<dyn ReferenceData>,
    limits: ResourceLimits,
}

impl Engine {
    pub fn new(registry: GraphRegistry, catalog: Arc<dyn ReferenceData>) -> Self {
        Self {
            registry,
            catalog,
            limits: ResourceLimits::default(),
        }
    }

    /// Engine running the automobile rule set over `catalog`
    pub fn automobile(catalog: Catalog) -> CarbonateResult<Self> {
        Ok(Self::new(automobile::registry()?, Arc::new(catalog)))
    }

    /// Replace the resource limits
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn registry(&self) -> &GraphRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &dyn ReferenceData {
        self.catalog.as_ref()
    }

    /// Get the current resource limits
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Parse `name=value` strings against the registry's declared inputs
    pub fn parse_facts(&self, facts: &[&str]) -> CarbonateResult<FactStore> {
        FactStore::parse(facts, &self.registry, self.catalog())
    }

    /// Resolve one quantity
    pub fn resolve(
        &self,
        quantity: &str,
        facts: &FactStore,
        timeframe: Option<TimeRange>,
        compliance: &Compliance,
    ) -> CarbonateResult<Resolution> {
        Resolver::new(&self.registry, self.catalog())
            .with_limits(self.limits.clone())
            .resolve(quantity, facts, timeframe, compliance)
    }

    /// Resolve the automobile emission with no compliance filter
    pub fn emission(
        &self,
        facts: &FactStore,
        timeframe: Option<TimeRange>,
    ) -> CarbonateResult<Resolution> {
        self.resolve(automobile::EMISSION, facts, timeframe, &Compliance::none())
    }
}
