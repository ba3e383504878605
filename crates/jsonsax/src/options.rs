/// Nesting limit used by [`ParserOptions::default`].
pub const DEFAULT_NESTING_LIMIT: usize = 32;

/// Configuration for a single parse.
///
/// Options are handed to a context when it is constructed, and a context
/// lives for exactly one parse, so they apply per parse call.
///
/// # Examples
///
/// ```rust
/// use jsonsax::{ConstBufferContext, ParserOptions};
///
/// let options = ParserOptions {
///     nesting_limit: 4,
///     ..Default::default()
/// };
/// let ctx = ConstBufferContext::with_options(b"{}", options);
/// # let _ = ctx;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest nesting level a container may start at.
    ///
    /// The top-level container sits at level 0; a container whose level is
    /// greater than this value fails with
    /// [`ErrorReason::ExceededNestingLimit`](crate::ErrorReason::ExceededNestingLimit)
    /// before any of its content is read. This bounds recursion depth, and
    /// therefore stack usage, on adversarial input.
    ///
    /// # Default
    ///
    /// [`DEFAULT_NESTING_LIMIT`] (32)
    pub nesting_limit: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            nesting_limit: DEFAULT_NESTING_LIMIT,
        }
    }
}
