//! Caller-supplied facts for one resolution request

use crate::catalog::ReferenceData;
use crate::registry::GraphRegistry;
use crate::{CarbonateError, CarbonateResult, Value};
use std::collections::BTreeMap;

/// Immutable mapping from quantity name to value
///
/// A fact always wins over every method of the node with the same name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactStore {
    values: BTreeMap<String, Value>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Parse `name=value` strings against the inputs declared in `registry`
    ///
    /// Every name must be a declared input, since the declaration supplies the
    /// kind to parse the value as.
    pub fn parse(
        facts: &[&str],
        registry: &GraphRegistry,
        catalog: &dyn ReferenceData,
    ) -> CarbonateResult<Self> {
        let mut store = Self::new();
        let mut errors = Vec::new();

        for fact in facts {
            match parse_fact(fact, registry, catalog) {
                Ok((name, value)) => store.insert(name, value),
                Err(e) => errors.push(e),
            }
        }

        match errors.len() {
            0 => Ok(store),
            1 => Err(errors.remove(0)),
            _ => Err(CarbonateError::MultipleErrors(errors)),
        }
    }

    /// Check every fact against the kind its input declares
    pub fn validate(&self, registry: &GraphRegistry) -> CarbonateResult<()> {
        for (name, value) in self.iter() {
            if let Some(kind) = registry.input_kind(name) {
                if value.kind() != kind {
                    return Err(CarbonateError::invalid_fact(
                        name,
                        format!("expected {}, got {}", kind, value.kind()),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn parse_fact(
    fact: &str,
    registry: &GraphRegistry,
    catalog: &dyn ReferenceData,
) -> CarbonateResult<(String, Value)> {
    let (name, raw) = fact.split_once('=').ok_or_else(|| {
        CarbonateError::invalid_fact(fact, "expected the form name=value")
    })?;
    let name = name.trim();
    let kind = registry
        .input_kind(name)
        .ok_or_else(|| CarbonateError::invalid_fact(name, "not a declared input"))?;
    let value = Value::parse(name, kind, raw, catalog)?;
    Ok((name.to_string(), value))
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FactStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (name, value) in iter {
            store.insert(name, value);
        }
        store
    }
}
