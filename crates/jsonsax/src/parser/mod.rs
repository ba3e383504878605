//! Object and array state machines.
//!
//! A parse is push-based: [`parse_object`] and [`parse_array`] read the
//! context one token at a time and call the handler once per field or
//! element. Nested containers are not parsed ahead of time. When a value is
//! an object or an array the handler receives it as a marker and has to
//! descend into it (or [`ignore`](crate::ignore) it) before returning; the
//! parser checks that the nesting level is back where it was before it
//! reads on, and fails with
//! [`NestedObjectOrArrayNotParsed`](ErrorReason::NestedObjectOrArrayNotParsed)
//! otherwise.
//!
//! The handler receives a [`Field`] or an [`Element`] that owns the context
//! borrow for the duration of the call. Values are resolved from the context
//! on demand, and the descend operations consume the capability.

mod escape_buffer;
mod literal;
mod string;

use core::fmt;

use bstr::{BStr, ByteSlice};

use crate::{
    context::{Context, NestedStatus, Span, is_space},
    dispatch::{Dispatch, Named},
    error::{Error, ErrorReason, ParseError, Result},
    value::{Token, Value, ValueKind},
};

pub(crate) fn fail<C: Context + ?Sized>(ctx: &C, reason: ErrorReason) -> Error {
    ParseError::at(ctx, reason).into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectState {
    OpeningBracket,
    FieldNameOrClosingBracket,
    FieldName,
    Colon,
    FieldValue,
    CommaOrClosingBracket,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    OpeningBracket,
    ValueOrClosingBracket,
    Value,
    CommaOrClosingBracket,
    End,
}

/// Checks the nesting limit and returns the level this container runs at.
fn enter<C: Context + ?Sized>(ctx: &C) -> Result<usize> {
    let level = ctx.nesting_level();
    let limit = ctx.options().nesting_limit;
    if level > limit {
        return Err(fail(ctx, ErrorReason::ExceededNestingLimit { limit }));
    }
    Ok(level)
}

/// The first byte to process and whether it still has to be read.
///
/// A nested container's bracket was consumed when its value was classified.
fn first_byte<C: Context + ?Sized>(ctx: &mut C) -> (u8, bool) {
    let first = match ctx.nested_status() {
        NestedStatus::None => (0, true),
        NestedStatus::Object => (b'{', false),
        NestedStatus::Array => (b'[', false),
    };
    ctx.reset_nested_status();
    first
}

fn leave<C: Context + ?Sized>(ctx: &mut C, level: usize) -> Result<()> {
    if level > 0 {
        ctx.end_nested()?;
    }
    Ok(())
}

/// Classifies the value starting with `first`.
///
/// Returns the byte that terminated an unquoted value; the caller must
/// process it instead of reading a new one.
fn parse_value<C: Context + ?Sized>(ctx: &mut C, first: u8) -> Result<(Token, Option<u8>)> {
    match first {
        b'{' => {
            ctx.begin_nested(NestedStatus::Object);
            Ok((Token::container(ValueKind::Object), None))
        }
        b'[' => {
            ctx.begin_nested(NestedStatus::Array);
            Ok((Token::container(ValueKind::Array), None))
        }
        b'"' => {
            ctx.new_write_buffer();
            let span = string::consume_quoted(ctx)?;
            Ok((Token::string(span), None))
        }
        _ => {
            ctx.new_write_buffer();
            let (span, next) = literal::consume_unquoted(ctx, first)?;
            let token = literal::classify(span, ctx.token(span))
                .ok_or_else(|| fail(ctx, ErrorReason::InvalidValue))?;
            Ok((token, Some(next)))
        }
    }
}

/// Parses an object, calling `handler` once per field.
///
/// At the top level the context must be positioned before the opening `{`
/// (leading whitespace is skipped). Inside a handler, descend through
/// [`Field::parse_object`] or [`Element::parse_object`] instead.
///
/// # Errors
///
/// A [`ParseError`] for malformed input, an [`InvariantViolation`] if the
/// context's cursors are inconsistent, or any error the handler returns.
///
/// [`InvariantViolation`]: crate::InvariantViolation
///
/// # Examples
///
/// ```rust
/// use jsonsax::{ConstBufferContext, parse_object};
///
/// let mut ctx = ConstBufferContext::new(br#"{"a": 1, "b": [2, 3]}"#);
/// let mut total = 0;
/// parse_object(&mut ctx, |field| {
///     if field.name() == "b" {
///         field.parse_array(|element| {
///             total += element.value().as_integer();
///             Ok(())
///         })
///     } else {
///         total += field.value().as_integer();
///         Ok(())
///     }
/// })?;
/// assert_eq!(total, 6);
/// # Ok::<(), jsonsax::Error>(())
/// ```
pub fn parse_object<C, H>(ctx: &mut C, mut handler: H) -> Result<()>
where
    C: Context + ?Sized,
    H: FnMut(Field<'_, C>) -> Result<()>,
{
    let level = enter(ctx)?;
    let (mut c, mut must_read) = first_byte(ctx);
    tracing::trace!(level, "object start");

    let mut state = ObjectState::OpeningBracket;
    let mut name = Span::default();

    while state != ObjectState::End {
        if ctx.nesting_level() != level {
            return Err(fail(ctx, ErrorReason::NestedObjectOrArrayNotParsed));
        }
        if must_read {
            c = ctx.read();
        }
        must_read = true;
        if is_space(c) {
            continue;
        }

        state = match state {
            ObjectState::OpeningBracket => {
                if c != b'{' {
                    return Err(fail(ctx, ErrorReason::ExpectedOpeningBracket));
                }
                ObjectState::FieldNameOrClosingBracket
            }
            ObjectState::FieldNameOrClosingBracket if c == b'}' => ObjectState::End,
            ObjectState::FieldNameOrClosingBracket | ObjectState::FieldName => {
                if c != b'"' {
                    return Err(fail(ctx, ErrorReason::ExpectedOpeningQuote));
                }
                ctx.new_write_buffer();
                name = string::consume_quoted(ctx)?;
                ObjectState::Colon
            }
            ObjectState::Colon => {
                if c != b':' {
                    return Err(fail(ctx, ErrorReason::ExpectedColon));
                }
                ObjectState::FieldValue
            }
            ObjectState::FieldValue => {
                let (token, next) = parse_value(ctx, c)?;
                if let Some(next) = next {
                    c = next;
                    must_read = false;
                }
                handler(Field {
                    name,
                    element: Element {
                        ctx: &mut *ctx,
                        token,
                    },
                })?;
                ObjectState::CommaOrClosingBracket
            }
            ObjectState::CommaOrClosingBracket => match c {
                b',' => ObjectState::FieldName,
                b'}' => ObjectState::End,
                _ => return Err(fail(ctx, ErrorReason::ExpectedCommaOrClosingBracket)),
            },
            ObjectState::End => unreachable!(),
        };
    }

    leave(ctx, level)?;
    tracing::trace!(level, "object end");
    Ok(())
}

/// Parses an array, calling `handler` once per element.
///
/// The array counterpart of [`parse_object`].
///
/// # Errors
///
/// As for [`parse_object`].
pub fn parse_array<C, H>(ctx: &mut C, mut handler: H) -> Result<()>
where
    C: Context + ?Sized,
    H: FnMut(Element<'_, C>) -> Result<()>,
{
    let level = enter(ctx)?;
    let (mut c, mut must_read) = first_byte(ctx);
    tracing::trace!(level, "array start");

    let mut state = ArrayState::OpeningBracket;

    while state != ArrayState::End {
        if ctx.nesting_level() != level {
            return Err(fail(ctx, ErrorReason::NestedObjectOrArrayNotParsed));
        }
        if must_read {
            c = ctx.read();
        }
        must_read = true;
        if is_space(c) {
            continue;
        }

        state = match state {
            ArrayState::OpeningBracket => {
                if c != b'[' {
                    return Err(fail(ctx, ErrorReason::ExpectedOpeningBracket));
                }
                ArrayState::ValueOrClosingBracket
            }
            ArrayState::ValueOrClosingBracket if c == b']' => ArrayState::End,
            ArrayState::ValueOrClosingBracket | ArrayState::Value => {
                let (token, next) = parse_value(ctx, c)?;
                if let Some(next) = next {
                    c = next;
                    must_read = false;
                }
                handler(Element {
                    ctx: &mut *ctx,
                    token,
                })?;
                ArrayState::CommaOrClosingBracket
            }
            ArrayState::CommaOrClosingBracket => match c {
                b',' => ArrayState::Value,
                b']' => ArrayState::End,
                _ => return Err(fail(ctx, ErrorReason::ExpectedCommaOrClosingBracket)),
            },
            ArrayState::End => unreachable!(),
        };
    }

    leave(ctx, level)?;
    tracing::trace!(level, "array end");
    Ok(())
}

/// One array element, handed to a [`parse_array`] handler.
///
/// Holds the context borrow until it is dropped or consumed by one of the
/// descend operations.
pub struct Element<'c, C: ?Sized> {
    ctx: &'c mut C,
    token: Token,
}

impl<'c, C: Context + ?Sized> Element<'c, C> {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.token.kind
    }

    /// The value, borrowing its bytes from the context.
    #[must_use]
    pub fn value(&self) -> Value<'_> {
        self.token.resolve(&*self.ctx)
    }

    /// Input bytes consumed so far. For a container this is just past its
    /// opening bracket; for a scalar, just past the byte that ended it.
    #[must_use]
    pub fn read_offset(&self) -> usize {
        self.ctx.read_offset()
    }

    #[must_use]
    pub fn context(&self) -> &C {
        &*self.ctx
    }

    /// Descends into an object value.
    ///
    /// # Errors
    ///
    /// [`ExpectedOpeningBracket`](ErrorReason::ExpectedOpeningBracket) when
    /// the value is not an object, plus everything [`parse_object`] returns.
    pub fn parse_object<H>(self, handler: H) -> Result<()>
    where
        H: FnMut(Field<'_, C>) -> Result<()>,
    {
        if !self.token.kind.is_container() {
            return Err(fail(self.ctx, ErrorReason::ExpectedOpeningBracket));
        }
        parse_object(self.ctx, handler)
    }

    /// Descends into an array value.
    ///
    /// # Errors
    ///
    /// [`ExpectedOpeningBracket`](ErrorReason::ExpectedOpeningBracket) when
    /// the value is not an array, plus everything [`parse_array`] returns.
    pub fn parse_array<H>(self, handler: H) -> Result<()>
    where
        H: FnMut(Element<'_, C>) -> Result<()>,
    {
        if !self.token.kind.is_container() {
            return Err(fail(self.ctx, ErrorReason::ExpectedOpeningBracket));
        }
        parse_array(self.ctx, handler)
    }

    /// Skips the value. Containers are consumed without being materialized.
    ///
    /// # Errors
    ///
    /// Any parse error inside a skipped container.
    pub fn ignore(self) -> Result<()> {
        crate::ignore(self.ctx)
    }
}

impl<C: ?Sized> fmt::Debug for Element<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.token.kind)
            .finish_non_exhaustive()
    }
}

/// One object field, handed to a [`parse_object`] handler.
///
/// [`Field::name`] is the key; the remaining methods mirror [`Element`].
pub struct Field<'c, C: ?Sized> {
    name: Span,
    element: Element<'c, C>,
}

impl<'c, C: Context + ?Sized> Field<'c, C> {
    /// The decoded field name.
    #[must_use]
    pub fn name(&self) -> &BStr {
        self.element.ctx.token(self.name).as_bstr()
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.element.kind()
    }

    #[must_use]
    pub fn value(&self) -> Value<'_> {
        self.element.value()
    }

    #[must_use]
    pub fn read_offset(&self) -> usize {
        self.element.read_offset()
    }

    #[must_use]
    pub fn context(&self) -> &C {
        self.element.context()
    }

    /// Drops the name and keeps the value.
    #[must_use]
    pub fn into_element(self) -> Element<'c, C> {
        self.element
    }

    /// Starts a first-match-wins dispatch on the field name.
    #[must_use]
    pub fn dispatch(self) -> Dispatch<Self> {
        Dispatch::new(self)
    }

    /// # Errors
    ///
    /// See [`Element::parse_object`].
    pub fn parse_object<H>(self, handler: H) -> Result<()>
    where
        H: FnMut(Field<'_, C>) -> Result<()>,
    {
        self.element.parse_object(handler)
    }

    /// # Errors
    ///
    /// See [`Element::parse_array`].
    pub fn parse_array<H>(self, handler: H) -> Result<()>
    where
        H: FnMut(Element<'_, C>) -> Result<()>,
    {
        self.element.parse_array(handler)
    }

    /// # Errors
    ///
    /// See [`Element::ignore`].
    pub fn ignore(self) -> Result<()> {
        self.element.ignore()
    }
}

impl<C: Context + ?Sized> Named for Field<'_, C> {
    fn name_bytes(&self) -> &[u8] {
        self.name().as_bytes()
    }
}

impl<C: Context + ?Sized> fmt::Debug for Field<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
