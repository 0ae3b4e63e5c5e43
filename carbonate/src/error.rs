use std::fmt;

/// Error types for the resolver
///
/// Registration errors (`DuplicateNode`, `DanglingRequirement`,
/// `CyclicDependency`) are raised while building a registry and keep it from
/// ever becoming usable. An undefined quantity is never an error on its own;
/// only `UnreachableFallback` reports a top-level quantity that a rule set
/// promised to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum CarbonateError {
    /// A node with this name is already registered
    DuplicateNode(String),

    /// A method requires a quantity that is neither a node nor a declared input
    DanglingRequirement {
        node: String,
        method: String,
        requirement: String,
    },

    /// Hard requirements form a cycle; the path starts and ends on the same node
    CyclicDependency(Vec<String>),

    /// A guaranteed quantity could not be resolved by any of its methods
    UnreachableFallback {
        quantity: String,
        skipped: Vec<String>,
    },

    /// A fact does not match the declared kind of its input
    InvalidFact { name: String, message: String },

    /// A time range whose start falls after its end
    InvalidTimeRange(String),

    /// Resolution exceeded a configured limit
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    /// Engine error without a more specific category
    Engine(String),

    /// Multiple errors collected together
    MultipleErrors(Vec<CarbonateError>),
}

impl CarbonateError {
    /// Create an invalid fact error
    pub fn invalid_fact(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFact {
            name: name.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while building a registry
    pub fn is_configuration_error(&self) -> bool {
        match self {
            CarbonateError::DuplicateNode(_)
            | CarbonateError::DanglingRequirement { .. }
            | CarbonateError::CyclicDependency(_) => true,
            CarbonateError::MultipleErrors(errors) => {
                errors.iter().all(CarbonateError::is_configuration_error)
            }
            _ => false,
        }
    }
}

impl fmt::Display for CarbonateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarbonateError::DuplicateNode(name) => {
                write!(f, "Duplicate node: '{}' is already registered", name)
            }
            CarbonateError::DanglingRequirement {
                node,
                method,
                requirement,
            } => write!(
                f,
                "Dangling requirement: method '{}' of node '{}' requires '{}', which is neither a node nor a declared input",
                method, node, requirement
            ),
            CarbonateError::CyclicDependency(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            CarbonateError::UnreachableFallback { quantity, skipped } => {
                write!(
                    f,
                    "Unreachable fallback: '{}' must always resolve but no method applied",
                    quantity
                )?;
                if !skipped.is_empty() {
                    write!(f, " (skipped: {})", skipped.join(", "))?;
                }
                Ok(())
            }
            CarbonateError::InvalidFact { name, message } => {
                write!(f, "Invalid fact '{}': {}", name, message)
            }
            CarbonateError::InvalidTimeRange(msg) => write!(f, "Invalid time range: {}", msg),
            CarbonateError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                suggestion,
            } => write!(
                f,
                "Resource limit exceeded: {} (limit: {}, actual: {}). {}",
                limit_name, limit_value, actual_value, suggestion
            ),
            CarbonateError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CarbonateError::MultipleErrors(errors) => {
                writeln!(f, "Multiple errors:")?;
                for (i, error) in errors.iter().enumerate() {
                    write!(f, "  {}. {}", i + 1, error)?;
                    if i < errors.len() - 1 {
                        writeln!(f)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CarbonateError {}

impl From<serde_json::Error> for CarbonateError {
    fn from(err: serde_json::Error) -> Self {
        CarbonateError::Engine(format!("Reference data error: {}", err))
    }
}
