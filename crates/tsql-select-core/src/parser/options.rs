//! Parser configuration.

/// Default bracket nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling one [`Parser`](super::Parser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject input containing denied keywords before parsing.
    pub enforce_keyword_policy: bool,
    /// Maximum bracket nesting depth.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            enforce_keyword_policy: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the keyword deny-list check.
    #[must_use]
    pub const fn enforce_keyword_policy(mut self, enforce: bool) -> Self {
        self.enforce_keyword_policy = enforce;
        self
    }

    /// Sets the maximum bracket nesting depth.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
