use core::{fmt, str::Utf8Error};

use bstr::{BStr, ByteSlice};

use crate::context::{Context, Span};

/// The type of a JSON token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl ValueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Object => "Object",
            Self::Array => "Array",
            Self::Null => "Null",
        }
    }

    /// `true` for [`Object`](Self::Object) and [`Array`](Self::Array), the
    /// kinds a handler has to descend into.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified token as the parser keeps it: the decoded bytes stay in the
/// context and are only resolved when a handler asks for them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: ValueKind,
    pub(crate) span: Option<Span>,
    pub(crate) integer: Option<i64>,
    pub(crate) float: f64,
}

impl Token {
    pub(crate) fn container(kind: ValueKind) -> Self {
        debug_assert!(kind.is_container());
        Self {
            kind,
            span: None,
            integer: None,
            float: 0.0,
        }
    }

    pub(crate) fn string(span: Span) -> Self {
        Self {
            kind: ValueKind::String,
            span: Some(span),
            integer: None,
            float: 0.0,
        }
    }

    pub(crate) fn resolve<C: Context + ?Sized>(self, ctx: &C) -> Value<'_> {
        let bytes = self.span.map_or(&[][..], |span| ctx.token(span));
        Value {
            kind: self.kind,
            bytes,
            integer: self.integer,
            float: self.float,
        }
    }
}

/// A JSON value as delivered to a handler.
///
/// Scalars borrow their decoded bytes from the context: string content with
/// escapes resolved, or the literal text of numbers, booleans and `null`.
/// Numbers carry both interpretations, computed eagerly:
///
/// - a token that parses as an `i64` has [`as_integer`](Self::as_integer) set
///   and [`as_float`](Self::as_float) equal to `integer as f64`;
/// - otherwise [`as_integer`](Self::as_integer) is `0` and
///   [`is_integer`](Self::is_integer) is `false`.
///
/// [`Object`](ValueKind::Object) and [`Array`](ValueKind::Array) values have
/// no payload; they tell the handler a nested container starts here.
///
/// ```rust
/// use jsonsax::{ConstBufferContext, ValueKind, parse_array};
///
/// let mut ctx = ConstBufferContext::new(b"[3.14, 42]");
/// let mut seen = Vec::new();
/// parse_array(&mut ctx, |element| {
///     let value = element.value();
///     seen.push((value.kind(), value.is_integer(), value.as_float()));
///     Ok(())
/// })?;
/// assert_eq!(seen, [
///     (ValueKind::Number, false, 3.14),
///     (ValueKind::Number, true, 42.0),
/// ]);
/// # Ok::<(), jsonsax::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value<'a> {
    kind: ValueKind,
    bytes: &'a [u8],
    integer: Option<i64>,
    float: f64,
}

impl<'a> Value<'a> {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The decoded token bytes; empty for containers.
    #[must_use]
    pub fn as_string(&self) -> &'a BStr {
        self.bytes.as_bstr()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The decoded token as UTF-8.
    ///
    /// # Errors
    ///
    /// Raw (unescaped) bytes are copied through verbatim, so a string whose
    /// source was not valid UTF-8 fails here.
    pub fn as_str(&self) -> Result<&'a str, Utf8Error> {
        core::str::from_utf8(self.bytes)
    }

    /// Integer interpretation; `0` when the token is not an integer.
    #[must_use]
    pub fn as_integer(&self) -> i64 {
        self.integer.unwrap_or(0)
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.integer.is_some()
    }

    #[must_use]
    pub fn as_float(&self) -> f64 {
        self.float
    }

    /// `true` when the integer interpretation is non-zero. Booleans store
    /// `true` as `1` and `false` as `0`.
    #[must_use]
    pub fn as_boolean(&self) -> bool {
        self.as_integer() != 0
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::ConstBufferContext;

    #[test]
    fn kind_names() {
        assert_eq!(ValueKind::String.to_string(), "String");
        assert_eq!(ValueKind::Null.to_string(), "Null");
        assert!(ValueKind::Array.is_container());
        assert!(!ValueKind::Boolean.is_container());
    }

    #[test]
    fn containers_resolve_to_empty_bytes() {
        let ctx = ConstBufferContext::new(b"{}");
        let value = Token::container(ValueKind::Object).resolve(&ctx);
        assert_eq!(value.kind(), ValueKind::Object);
        assert!(value.as_bytes().is_empty());
        assert_eq!(value.as_integer(), 0);
        assert!(!value.as_boolean());
    }
}
