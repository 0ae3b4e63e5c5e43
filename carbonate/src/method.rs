//! Calculation methods and the nodes that own them

use crate::catalog::{
    FuelType, Make, MakeModel, MakeModelYear, MakeYear, ReferenceData, SizeClass, Variant,
};
use crate::{CarbonateError, Entity, TimeRange, Value};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// An external calculation standard a method can comply with
///
/// The GHG Protocol is split by scope: scope 1 covers emissions from burning
/// fuel the caller measured, scope 3 also admits estimated activity such as
/// typical annual distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Standard {
    /// GHG Protocol, scope 1
    GhgProtocolScope1,
    /// GHG Protocol, scope 3
    GhgProtocolScope3,
    /// ISO 14064-1
    Iso,
}

impl Standard {
    pub const ALL: [Standard; 3] = [
        Standard::GhgProtocolScope1,
        Standard::GhgProtocolScope3,
        Standard::Iso,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Standard::GhgProtocolScope1 => "ghg_protocol_scope_1",
            Standard::GhgProtocolScope3 => "ghg_protocol_scope_3",
            Standard::Iso => "iso",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Standard::GhgProtocolScope1 => "GHG Protocol Scope 1",
            Standard::GhgProtocolScope3 => "GHG Protocol Scope 3",
            Standard::Iso => "ISO 14064-1",
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Standard {
    type Err = CarbonateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ghg_protocol_scope_1" | "scope_1" => Ok(Standard::GhgProtocolScope1),
            "ghg_protocol_scope_3" | "scope_3" => Ok(Standard::GhgProtocolScope3),
            "iso" | "iso_14064_1" => Ok(Standard::Iso),
            other => Err(CarbonateError::Engine(format!(
                "Unknown standard '{}' (expected ghg_protocol_scope_1, ghg_protocol_scope_3 or iso)",
                other
            ))),
        }
    }
}

/// The set of standards every selected method must comply with
///
/// An empty set admits every method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Compliance(BTreeSet<Standard>);

impl Compliance {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn require(standards: impl IntoIterator<Item = Standard>) -> Self {
        Self(standards.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn standards(&self) -> impl Iterator<Item = &Standard> {
        self.0.iter()
    }

    /// Required standards that `complies` does not cover
    pub fn missing_from(&self, complies: &BTreeSet<Standard>) -> Vec<Standard> {
        self.0.difference(complies).copied().collect()
    }

    pub fn is_satisfied_by(&self, complies: &BTreeSet<Standard>) -> bool {
        self.0.is_subset(complies)
    }
}

impl FromStr for Compliance {
    type Err = CarbonateError;

    /// Comma separated standard names; the empty string requires nothing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Standard::from_str)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Compliance)
    }
}

/// Resolved dependencies handed to a method's compute function
///
/// Hard requirements are always present. Soft requirements are present only
/// when they resolved. Typed accessors return `None` on a kind mismatch so a
/// method declines instead of failing.
pub struct Inputs<'a> {
    values: BTreeMap<String, Value>,
    catalog: &'a dyn ReferenceData,
}

impl<'a> Inputs<'a> {
    pub fn new(values: BTreeMap<String, Value>, catalog: &'a dyn ReferenceData) -> Self {
        Self { values, catalog }
    }

    /// The lookup-table collaborator
    pub fn catalog(&self) -> &'a dyn ReferenceData {
        self.catalog
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn number(&self, name: &str) -> Option<Decimal> {
        self.get(name)?.as_number()
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name)?.as_date()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_text()
    }

    pub fn range(&self, name: &str) -> Option<&TimeRange> {
        self.get(name)?.as_range()
    }

    pub fn make(&self, name: &str) -> Option<&Arc<Make>> {
        match self.get(name)?.as_entity()? {
            Entity::Make(m) => Some(m),
            _ => None,
        }
    }

    pub fn make_year(&self, name: &str) -> Option<&Arc<MakeYear>> {
        match self.get(name)?.as_entity()? {
            Entity::MakeYear(m) => Some(m),
            _ => None,
        }
    }

    pub fn make_model(&self, name: &str) -> Option<&Arc<MakeModel>> {
        match self.get(name)?.as_entity()? {
            Entity::MakeModel(m) => Some(m),
            _ => None,
        }
    }

    pub fn make_model_year(&self, name: &str) -> Option<&Arc<MakeModelYear>> {
        match self.get(name)?.as_entity()? {
            Entity::MakeModelYear(m) => Some(m),
            _ => None,
        }
    }

    pub fn variant(&self, name: &str) -> Option<&Arc<Variant>> {
        match self.get(name)?.as_entity()? {
            Entity::Variant(v) => Some(v),
            _ => None,
        }
    }

    pub fn fuel_type(&self, name: &str) -> Option<&Arc<FuelType>> {
        match self.get(name)?.as_entity()? {
            Entity::FuelType(f) => Some(f),
            _ => None,
        }
    }

    pub fn size_class(&self, name: &str) -> Option<&Arc<SizeClass>> {
        match self.get(name)?.as_entity()? {
            Entity::SizeClass(s) => Some(s),
            _ => None,
        }
    }
}

/// A compute function: resolved dependencies and the ambient time range in,
/// a value out. `None` means the method declines.
pub type Compute = fn(&Inputs<'_>, &TimeRange) -> Option<Value>;

/// One named calculation strategy for a quantity
#[derive(Clone)]
pub struct Method {
    name: String,
    needs: Vec<String>,
    appreciates: Vec<String>,
    complies: BTreeSet<Standard>,
    compute: Compute,
}

impl Method {
    pub fn new(name: impl Into<String>, compute: Compute) -> Self {
        Self {
            name: name.into(),
            needs: Vec::new(),
            appreciates: Vec::new(),
            complies: BTreeSet::new(),
            compute,
        }
    }

    /// Hard requirements: each must resolve or the method is skipped
    pub fn needs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.needs.contains(&name) {
                self.needs.push(name);
            }
        }
        self
    }

    /// Soft requirements: passed through when they resolve
    pub fn appreciates<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.appreciates.contains(&name) {
                self.appreciates.push(name);
            }
        }
        self
    }

    pub fn complies(mut self, standards: impl IntoIterator<Item = Standard>) -> Self {
        self.complies.extend(standards);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hard_requirements(&self) -> &[String] {
        &self.needs
    }

    pub fn soft_requirements(&self) -> &[String] {
        &self.appreciates
    }

    pub fn compliance_tags(&self) -> &BTreeSet<Standard> {
        &self.complies
    }

    /// A method with no hard requirements always runs
    pub fn is_fallback(&self) -> bool {
        self.needs.is_empty()
    }

    pub fn compute(&self, inputs: &Inputs<'_>, timeframe: &TimeRange) -> Option<Value> {
        (self.compute)(inputs, timeframe)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("needs", &self.needs)
            .field("appreciates", &self.appreciates)
            .field("complies", &self.complies)
            .finish_non_exhaustive()
    }
}

/// A named quantity with its methods, most preferred first
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    methods: Vec<Method>,
    guaranteed: bool,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            guaranteed: false,
        }
    }

    /// Append a method after every method added so far
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Promise that this node always resolves when requested directly
    pub fn guaranteed(mut self) -> Self {
        self.guaranteed = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn is_guaranteed(&self) -> bool {
        self.guaranteed
    }

    pub fn has_fallback(&self) -> bool {
        self.methods.iter().any(Method::is_fallback)
    }
}
