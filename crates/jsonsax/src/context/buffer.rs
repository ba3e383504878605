use alloc::{vec, vec::Vec};

use super::{Context, Nesting, Span, is_space, kind_of_first_byte};
use crate::{ParserOptions, ValueKind, error::InvariantViolation};

/// Cursor state shared by both buffer contexts.
///
/// `write` must stay strictly behind `read`: every output byte is produced
/// only after at least one more input byte has been consumed, which is what
/// lets [`BufferContext`] decode in place and lets [`ConstBufferContext`]
/// size its scratch buffer to the input length.
#[derive(Debug, Default)]
struct Cursors {
    read: usize,
    write: usize,
    current: usize,
}

impl Cursors {
    #[inline]
    fn read(&mut self, input: &[u8]) -> u8 {
        match input.get(self.read) {
            Some(&b) => {
                self.read += 1;
                b
            }
            None => 0,
        }
    }

    #[inline]
    fn write(&mut self, output: &mut [u8], byte: u8) -> Result<(), InvariantViolation> {
        if self.write >= self.read || self.write >= output.len() {
            return Err(InvariantViolation::WriteOverrun {
                write: self.write,
                read: self.read,
            });
        }
        output[self.write] = byte;
        self.write += 1;
        Ok(())
    }

    fn new_write_buffer(&mut self) {
        self.current = self.write;
    }

    fn write_buffer(&self) -> Span {
        Span {
            start: self.current,
            len: self.write - self.current,
        }
    }

    fn toplevel_kind(&self, input: &[u8]) -> Option<ValueKind> {
        let first = input.get(self.read..)?.iter().find(|&&b| !is_space(b))?;
        kind_of_first_byte(*first)
    }
}

fn resolve(output: &[u8], span: Span) -> &[u8] {
    output.get(span.start..span.start + span.len).unwrap_or_default()
}

/// Decodes in place over a mutable buffer.
///
/// Token bytes (string content with escapes resolved, literal text) are
/// written back over input that has already been read. After the parse the
/// buffer content is unspecified.
#[derive(Debug)]
pub struct BufferContext<'a> {
    buffer: &'a mut [u8],
    cursors: Cursors,
    nesting: Nesting,
    options: ParserOptions,
}

impl<'a> BufferContext<'a> {
    #[must_use]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::with_options(buffer, ParserOptions::default())
    }

    #[must_use]
    pub fn with_options(buffer: &'a mut [u8], options: ParserOptions) -> Self {
        Self {
            buffer,
            cursors: Cursors::default(),
            nesting: Nesting::default(),
            options,
        }
    }

    /// Length of the input in bytes.
    #[must_use]
    pub fn length(&self) -> usize {
        self.buffer.len()
    }
}

impl Context for BufferContext<'_> {
    #[inline]
    fn read(&mut self) -> u8 {
        self.cursors.read(&*self.buffer)
    }

    fn read_offset(&self) -> usize {
        self.cursors.read
    }

    fn new_write_buffer(&mut self) {
        self.cursors.new_write_buffer();
    }

    #[inline]
    fn write(&mut self, byte: u8) -> Result<(), InvariantViolation> {
        self.cursors.write(&mut *self.buffer, byte)
    }

    fn write_buffer(&self) -> Span {
        self.cursors.write_buffer()
    }

    fn token(&self, span: Span) -> &[u8] {
        resolve(&*self.buffer, span)
    }

    fn options(&self) -> &ParserOptions {
        &self.options
    }

    fn nesting(&self) -> &Nesting {
        &self.nesting
    }

    fn nesting_mut(&mut self) -> &mut Nesting {
        &mut self.nesting
    }

    fn toplevel_kind(&mut self) -> Option<ValueKind> {
        self.cursors.toplevel_kind(&*self.buffer)
    }
}

/// Reads a shared buffer and decodes into one owned scratch buffer.
///
/// The scratch buffer is allocated once, with the input's length, when the
/// context is created; parsing never allocates again.
#[derive(Debug)]
pub struct ConstBufferContext<'a> {
    input: &'a [u8],
    scratch: Vec<u8>,
    cursors: Cursors,
    nesting: Nesting,
    options: ParserOptions,
}

impl<'a> ConstBufferContext<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    #[must_use]
    pub fn with_options(input: &'a [u8], options: ParserOptions) -> Self {
        Self {
            input,
            scratch: vec![0; input.len()],
            cursors: Cursors::default(),
            nesting: Nesting::default(),
            options,
        }
    }

    /// Length of the input in bytes.
    #[must_use]
    pub fn length(&self) -> usize {
        self.input.len()
    }
}

impl Context for ConstBufferContext<'_> {
    #[inline]
    fn read(&mut self) -> u8 {
        self.cursors.read(self.input)
    }

    fn read_offset(&self) -> usize {
        self.cursors.read
    }

    fn new_write_buffer(&mut self) {
        self.cursors.new_write_buffer();
    }

    #[inline]
    fn write(&mut self, byte: u8) -> Result<(), InvariantViolation> {
        self.cursors.write(&mut self.scratch, byte)
    }

    fn write_buffer(&self) -> Span {
        self.cursors.write_buffer()
    }

    fn token(&self, span: Span) -> &[u8] {
        resolve(&self.scratch, span)
    }

    fn options(&self) -> &ParserOptions {
        &self.options
    }

    fn nesting(&self) -> &Nesting {
        &self.nesting
    }

    fn nesting_mut(&mut self) -> &mut Nesting {
        &mut self.nesting
    }

    fn toplevel_kind(&mut self) -> Option<ValueKind> {
        self.cursors.toplevel_kind(self.input)
    }
}
