use crate::{Standard, Value};
use serde::Serialize;

/// How a quantity got its value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Taken verbatim from the fact store
    Fact,
    /// Computed by the named method
    Method { name: String, fallback: bool },
    /// Every method was skipped or declined
    Unresolved,
}

/// Where a requirement of the selected method came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    Supplied,
    Derived { method: String },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementUse {
    pub name: String,
    pub soft: bool,
    pub source: Source,
}

/// Why a method was passed over
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkipReason {
    /// Does not comply with every required standard; never evaluated
    NonCompliant { missing: Vec<Standard> },
    /// A hard requirement resolved to undefined
    MissingRequirement { name: String },
    /// The compute function returned no value
    Declined,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NonCompliant { missing } => {
                let names: Vec<&str> = missing.iter().map(Standard::name).collect();
                write!(f, "does not comply with {}", names.join(", "))
            }
            SkipReason::MissingRequirement { name } => write!(f, "{} is unknown", name),
            SkipReason::Declined => write!(f, "declined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedMethod {
    pub method: String,
    pub reason: SkipReason,
}

/// Record of one visited quantity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<RequirementUse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedMethod>,
}

impl TraceEntry {
    /// Name of the method that fired, if any
    pub fn method(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Method { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn used_fallback(&self) -> bool {
        matches!(self.outcome, Outcome::Method { fallback: true, .. })
    }
}

/// Every quantity visited during one resolution, dependencies first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn get(&self, quantity: &str) -> Option<&TraceEntry> {
        self.entries.iter().find(|e| e.quantity == quantity)
    }

    pub fn selected_method(&self, quantity: &str) -> Option<&str> {
        self.get(quantity)?.method()
    }

    /// Entries resolved by a method without hard requirements
    pub fn fallbacks(&self) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(|e| e.used_fallback())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
