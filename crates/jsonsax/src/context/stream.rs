use alloc::vec::Vec;

use super::{Context, Nesting, Span, is_space, kind_of_first_byte};
use crate::{ParserOptions, ValueKind, error::InvariantViolation};

/// Decodes from a byte stream of unknown length.
///
/// Each token is written into its own growable chunk. The parser never needs
/// more than two tokens at once (a field name and its value), so the two
/// most recent chunks are kept and older allocations are reused. A
/// [`Span`] carries the generation of the chunk it was captured from.
#[derive(Debug)]
pub struct StreamContext<I> {
    source: I,
    peeked: Option<u8>,
    read_offset: usize,
    chunks: [Vec<u8>; 2],
    generation: usize,
    nesting: Nesting,
    options: ParserOptions,
}

impl<I: Iterator<Item = u8>> StreamContext<I> {
    pub fn new<T>(source: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options<T>(source: T, options: ParserOptions) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            source: source.into_iter(),
            peeked: None,
            read_offset: 0,
            chunks: [Vec::new(), Vec::new()],
            generation: 0,
            nesting: Nesting::default(),
            options,
        }
    }

    /// The underlying byte source.
    pub fn source(&self) -> &I {
        &self.source
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.peeked.take().or_else(|| self.source.next())
    }

    fn current_chunk(&mut self) -> &mut Vec<u8> {
        &mut self.chunks[self.generation % 2]
    }
}

impl<I: Iterator<Item = u8>> Context for StreamContext<I> {
    fn read(&mut self) -> u8 {
        match self.next_byte() {
            Some(b) => {
                self.read_offset += 1;
                b
            }
            None => 0,
        }
    }

    fn read_offset(&self) -> usize {
        self.read_offset
    }

    fn new_write_buffer(&mut self) {
        self.generation += 1;
        self.current_chunk().clear();
    }

    fn write(&mut self, byte: u8) -> Result<(), InvariantViolation> {
        self.current_chunk().push(byte);
        Ok(())
    }

    fn write_buffer(&self) -> Span {
        Span {
            start: self.generation,
            len: self.chunks[self.generation % 2].len(),
        }
    }

    fn token(&self, span: Span) -> &[u8] {
        let live = span.start <= self.generation && self.generation - span.start < 2;
        debug_assert!(live, "span from recycled chunk {}", span.start);
        if !live {
            return &[];
        }
        self.chunks[span.start % 2]
            .get(..span.len)
            .unwrap_or_default()
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

    /// Leading whitespace is consumed (and counted in
    /// [`read_offset`](Context::read_offset)); the classified byte is not.
    fn toplevel_kind(&mut self) -> Option<ValueKind> {
        loop {
            let b = self.next_byte()?;
            if is_space(b) {
                self.read_offset += 1;
                continue;
            }
            self.peeked = Some(b);
            return kind_of_first_byte(b);
        }
    }
}

#[cfg(feature = "std")]
mod io {
    use std::io::{self, BufReader, Read};

    use super::StreamContext;
    use crate::ParserOptions;

    /// Byte iterator over a [`Read`] implementation.
    ///
    /// A read failure ends the stream like end-of-file does; the error is
    /// kept and can be retrieved with [`ReadBytes::take_error`].
    #[derive(Debug)]
    pub struct ReadBytes<R> {
        inner: io::Bytes<BufReader<R>>,
        error: Option<io::Error>,
        done: bool,
    }

    impl<R: Read> ReadBytes<R> {
        pub fn new(reader: R) -> Self {
            Self {
                inner: BufReader::new(reader).bytes(),
                error: None,
                done: false,
            }
        }

        pub fn take_error(&mut self) -> Option<io::Error> {
            self.error.take()
        }
    }

    impl<R: Read> Iterator for ReadBytes<R> {
        type Item = u8;

        fn next(&mut self) -> Option<u8> {
            if self.done {
                return None;
            }
            match self.inner.next() {
                Some(Ok(b)) => Some(b),
                Some(Err(err)) => {
                    tracing::debug!(error = %err, "read failed, treating as end of input");
                    self.error = Some(err);
                    self.done = true;
                    None
                }
                None => {
                    self.done = true;
                    None
                }
            }
        }
    }

    impl<R: Read> StreamContext<ReadBytes<R>> {
        /// Reads the document from `reader`, buffering internally.
        pub fn from_reader(reader: R) -> Self {
            Self::new(ReadBytes::new(reader))
        }

        pub fn from_reader_with_options(reader: R, options: ParserOptions) -> Self {
            Self::with_options(ReadBytes::new(reader), options)
        }

        /// The I/O error that ended the stream early, if any.
        pub fn take_io_error(&mut self) -> Option<io::Error> {
            self.source.take_error()
        }
    }
}

#[cfg(feature = "std")]
pub use io::ReadBytes;
