use alloc::boxed::Box;
use core::error::Error as CoreError;

use thiserror::Error;

use crate::context::Context;

/// Convenience alias used throughout the crate and by handlers.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Why a parse failed.
///
/// Every reason is reported together with the byte offset of the offending
/// character, see [`ParseError`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    #[error("Expected opening quote")]
    ExpectedOpeningQuote,
    #[error("Expected UTF-16 low surrogate")]
    ExpectedUtf16LowSurrogate,
    #[error("Invalid escape sequence")]
    InvalidEscapeSequence,
    #[error("Invalid UTF-16 character")]
    InvalidUtf16Character,
    #[error("Expected closing quote")]
    ExpectedClosingQuote,
    #[error("Invalid value")]
    InvalidValue,
    #[error("Unterminated value")]
    UnterminatedValue,
    #[error("Expected opening bracket")]
    ExpectedOpeningBracket,
    #[error("Expected colon")]
    ExpectedColon,
    #[error("Expected comma or closing bracket")]
    ExpectedCommaOrClosingBracket,
    #[error("Nested object or array not parsed")]
    NestedObjectOrArrayNotParsed,
    #[error("Exceeded nesting limit ({limit})")]
    ExceededNestingLimit {
        /// The limit that was configured for the parse.
        limit: usize,
    },
}

/// A syntax error: malformed input detected at `offset`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("{reason} at offset {offset}")]
pub struct ParseError {
    offset: usize,
    reason: ErrorReason,
}

impl ParseError {
    #[must_use]
    pub fn new(offset: usize, reason: ErrorReason) -> Self {
        Self { offset, reason }
    }

    /// Builds an error pointing at the byte most recently read from `ctx`.
    pub(crate) fn at<C: Context + ?Sized>(ctx: &C, reason: ErrorReason) -> Self {
        let offset = ctx.read_offset().saturating_sub(1);
        tracing::debug!(offset, %reason, "json parse error");
        Self { offset, reason }
    }

    /// Byte offset of the offending character in the input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn reason(&self) -> ErrorReason {
        self.reason
    }
}

/// Broken internal invariants. Malformed input alone never produces these.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("write cursor ({write}) would overtake read cursor ({read})")]
    WriteOverrun { write: usize, read: usize },
    #[error("end_nested() called at nesting level 0")]
    UnbalancedNesting,
}

/// Everything a parse call can fail with.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{0}, please file a bug report")]
    Invariant(#[from] InvariantViolation),
    /// The document does not start with `{` or `[`.
    #[error("invalid JSON: expected an object or an array at the top level")]
    NotAContainer,
    /// An error raised by a handler; it aborts the parse and is returned
    /// unchanged.
    #[error("handler error: {0}")]
    Handler(Box<dyn CoreError + Send + Sync>),
}

impl Error {
    /// Wraps a caller-side error so it can be returned from a handler.
    pub fn handler<E>(error: E) -> Self
    where
        E: Into<Box<dyn CoreError + Send + Sync>>,
    {
        Self::Handler(error.into())
    }

    #[must_use]
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }

    /// The parse error reason, if this is a syntax error.
    #[must_use]
    pub fn reason(&self) -> Option<ErrorReason> {
        self.as_parse_error().map(ParseError::reason)
    }

    /// The offending offset, if this is a syntax error.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.as_parse_error().map(ParseError::offset)
    }
}
