//! # Carbonate Engine
//!
//! **Emission estimates from whatever you know**
//!
//! Carbonate resolves a requested quantity (typically an emission) from a
//! dependency graph of named quantities. Each quantity has an ordered list of
//! alternative methods; the first method whose requirements can be met
//! produces the value, and cruder fallbacks take over when better data is
//! missing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carbonate::{Catalog, CarbonateResult, Engine, TimeRange};
//!
//! fn main() -> CarbonateResult<()> {
//!     let engine = Engine::automobile(Catalog::bundled()?)?;
//!
//!     let facts = engine.parse_facts(&["make=Toyota", "model=Prius", "year=2010"])?;
//!     let resolution = engine.emission(&facts, Some(TimeRange::year(2010)?))?;
//!
//!     println!("{:?}", resolution.value);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Nodes and methods
//! A node is a named quantity. Its methods are tried most preferred first; a
//! method is skipped when a hard requirement is unknown, when it does not
//! comply with the requested standards, or when its compute function
//! declines.
//!
//! ### Facts
//! Caller-supplied values. A fact always beats every method of the node with
//! the same name.
//!
//! ### Trace
//! Every resolution records which method fired for each visited quantity and
//! why the others were passed over.

pub mod automobile;
pub mod blend;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod facts;
pub mod method;
pub mod registry;
pub mod resolver;
pub mod resource_limits;
pub mod timeframe;
pub mod trace;
pub mod units;
pub mod value;

pub use catalog::{Catalog, ReferenceData};
pub use engine::Engine;
pub use error::CarbonateError;
pub use facts::FactStore;
pub use method::{Compliance, Inputs, Method, Node, Standard};
pub use registry::{GraphRegistry, RegistryBuilder};
pub use resolver::{Resolution, Resolver};
pub use resource_limits::ResourceLimits;
pub use timeframe::TimeRange;
pub use trace::{Outcome, SkipReason, Source, Trace, TraceEntry};
pub use value::{Entity, Value, ValueKind};

/// Result type for Carbonate operations
pub type CarbonateResult<T> = Result<T, CarbonateError>;

#[cfg(test)]
mod tests;
