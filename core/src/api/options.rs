//! Configuration options for the Tally engine.

/// Default bound on expression nesting, shared by every stage.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Configuration options for the Tally engine.
///
/// # Example
///
/// ```
/// use tally_core::api::EngineOptions;
///
/// let options = EngineOptions { max_depth: 50 };
/// assert_eq!(EngineOptions::default().max_depth, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Maximum nesting depth of an expression.
    ///
    /// Applies to bracket nesting and prefix operator runs in the source,
    /// and to the depth of the parsed tree, where a chain of binary
    /// operators such as `1 + 2 - 3` is one level. Exceeding it fails with
    /// `ErrorKind::DepthExceeded`.
    ///
    /// Default: 100
    pub max_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
