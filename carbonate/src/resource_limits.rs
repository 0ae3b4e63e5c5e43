/// Limits that bound a single resolution request
///
/// A well-formed rule set stays far below both; they exist so that a broken
/// rule table or a runaway compute function fails loudly.
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum nesting of requirement lookups
    /// Automobile rule set: 7 levels, Limit: 64
    pub max_depth: usize,

    /// Maximum wall-clock time for one resolution in milliseconds
    /// Real usage: well under 1ms, Limit: 1000ms
    pub max_resolution_time_ms: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_resolution_time_ms: 1000,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }
}
