use crate::error::{Result, ResultsError};

/// Nesting limit for criteria trees read from documents
pub const MAX_CRITERIA_DEPTH: usize = 128;
/// Limit on extend_definition chains followed while deriving, cloning or evaluating
pub const MAX_EXTEND_DEPTH: usize = 64;
/// Indentation used when writing results documents
pub const DEFAULT_INDENT: usize = 2;

/// Configuration for parsing and emitting criteria trees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsConfig {
    /// Deepest criteria nesting accepted by the parser; deeper elements are skipped
    pub max_depth: usize,
    /// Deepest chain of definitions extending one another that is followed
    pub max_extend_depth: usize,
    /// Spaces per nesting level in written documents (0 disables pretty printing)
    pub indent: usize,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_CRITERIA_DEPTH,
            max_extend_depth: MAX_EXTEND_DEPTH,
            indent: DEFAULT_INDENT,
        }
    }
}

impl ResultsConfig {
    /// Create a configuration with validation
    pub fn new(max_depth: usize, indent: usize) -> Result<Self> {
        let config = Self { max_depth, indent, ..Self::default() };
        config.validate()?;
        Ok(config)
    }

    /// Replace the extend chain limit, validating the result
    pub fn with_max_extend_depth(mut self, max_extend_depth: usize) -> Result<Self> {
        self.max_extend_depth = max_extend_depth;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ResultsError::configuration("max_depth must be greater than 0"));
        }
        if self.max_extend_depth == 0 {
            return Err(ResultsError::configuration("max_extend_depth must be greater than 0"));
        }
        if self.indent > 16 {
            return Err(ResultsError::configuration(format!(
                "indent must be at most 16, got {}",
                self.indent
            )));
        }
        Ok(())
    }

    /// Whether `depth` (1 = top-level criteria element) is still accepted
    pub fn allows_depth(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }
}
