//! Read/write cursors a parse runs over.
//!
//! A context owns the read cursor over the input and the write cursor the
//! decoders emit token bytes through, together with the nesting bookkeeping
//! the object and array parsers use to enforce the recursion contract.
//!
//! Three variants share the [`Context`] contract and differ only in storage:
//!
//! - [`BufferContext`] decodes in place over a caller-provided `&mut [u8]`.
//!   Decoded output is never longer than its encoding, so the write cursor
//!   trails the read cursor; a write that would overtake it is rejected with
//!   [`InvariantViolation::WriteOverrun`].
//! - [`ConstBufferContext`] reads a shared `&[u8]` and decodes into a single
//!   scratch allocation of the same length, made once at construction.
//! - [`StreamContext`] reads any byte iterator and decodes each token into its
//!   own growable chunk.

mod buffer;
mod stream;

pub use buffer::{BufferContext, ConstBufferContext};
#[cfg(feature = "std")]
pub use stream::ReadBytes;
pub use stream::StreamContext;

use crate::{ParserOptions, ValueKind, error::InvariantViolation};

/// Which container the parser just classified and still has to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestedStatus {
    #[default]
    None,
    Object,
    Array,
}

/// Depth and pending-container bookkeeping shared by all contexts.
#[derive(Debug, Clone, Default)]
pub struct Nesting {
    status: NestedStatus,
    level: usize,
}

impl Nesting {
    #[must_use]
    pub fn status(&self) -> NestedStatus {
        self.status
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn begin(&mut self, status: NestedStatus) {
        self.status = status;
        self.level += 1;
    }

    pub fn reset_status(&mut self) {
        self.status = NestedStatus::None;
    }

    /// # Errors
    ///
    /// [`InvariantViolation::UnbalancedNesting`] at level 0.
    pub fn end(&mut self) -> Result<(), InvariantViolation> {
        self.level = self
            .level
            .checked_sub(1)
            .ok_or(InvariantViolation::UnbalancedNesting)?;
        Ok(())
    }
}

/// Handle to a completed output region.
///
/// Resolved back to bytes with [`Context::token`]. A span stays resolvable
/// until the context recycles its region; the parser only ever keeps the
/// spans of the current field name and value alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub(crate) start: usize,
    pub(crate) len: usize,
}

impl Span {
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The capability contract every context variant implements.
pub trait Context {
    /// Returns the next input byte and advances the read cursor, or `0` once
    /// the input is exhausted.
    fn read(&mut self) -> u8;

    /// Number of input bytes consumed so far.
    fn read_offset(&self) -> usize;

    /// Starts a fresh output region for the next token.
    fn new_write_buffer(&mut self);

    /// Appends `byte` to the current output region.
    ///
    /// # Errors
    ///
    /// In-place variants return [`InvariantViolation::WriteOverrun`] when the
    /// write cursor would pass the read cursor.
    fn write(&mut self, byte: u8) -> Result<(), InvariantViolation>;

    /// Captures the current output region. Call it only once every write for
    /// the token has happened.
    fn write_buffer(&self) -> Span;

    /// Resolves a span captured with [`Context::write_buffer`].
    fn token(&self, span: Span) -> &[u8];

    /// Options this parse runs with.
    fn options(&self) -> &ParserOptions;

    fn nesting(&self) -> &Nesting;

    fn nesting_mut(&mut self) -> &mut Nesting;

    /// Classifies the first non-whitespace byte of the remaining input
    /// without consuming it.
    ///
    /// Callers use this to choose between [`parse_object`](crate::parse_object)
    /// and [`parse_array`](crate::parse_array) at the top level.
    fn toplevel_kind(&mut self) -> Option<ValueKind>;

    fn nesting_level(&self) -> usize {
        self.nesting().level()
    }

    fn nested_status(&self) -> NestedStatus {
        self.nesting().status()
    }

    fn begin_nested(&mut self, status: NestedStatus) {
        self.nesting_mut().begin(status);
    }

    fn reset_nested_status(&mut self) {
        self.nesting_mut().reset_status();
    }

    /// # Errors
    ///
    /// [`InvariantViolation::UnbalancedNesting`] when called at level 0.
    fn end_nested(&mut self) -> Result<(), InvariantViolation> {
        self.nesting_mut().end()
    }
}

/// Whitespace skipped between tokens (the C locale `isspace` set).
#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Kind of the value introduced by `first`, the first byte of a token.
pub(crate) fn kind_of_first_byte(first: u8) -> Option<ValueKind> {
    match first {
        b'{' => Some(ValueKind::Object),
        b'[' => Some(ValueKind::Array),
        b'"' => Some(ValueKind::String),
        b't' | b'f' => Some(ValueKind::Boolean),
        b'n' => Some(ValueKind::Null),
        b'-' | b'+' | b'.' | b'0'..=b'9' => Some(ValueKind::Number),
        _ => None,
    }
}
