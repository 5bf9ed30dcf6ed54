//! Engine options.

/// Limits applied to every parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Maximum nesting depth of macro expansions.
    ///
    /// A macro invoked from source code has depth 1;
    ///     a macro invoked from the output of that macro has depth 2, and so on.
    pub max_expansion_depth: usize,

    /// Maximum number of macro expansions in a single parse.
    pub max_expansions: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_expansion_depth: 100,
            max_expansions: 10_000,
        }
    }
}
