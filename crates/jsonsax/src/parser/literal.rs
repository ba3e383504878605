use core::num::FpCategory;

use super::fail;
use crate::{
    context::{Context, Span, is_space},
    error::{ErrorReason, Result},
    value::{Token, ValueKind},
};

#[inline]
fn ends_literal(b: u8) -> bool {
    matches!(b, b',' | b'}' | b']') || is_space(b)
}

/// Copies an unquoted token into the current write region.
///
/// `first` is the token's first byte, already read by the caller. Returns
/// the region and the byte that ended the token, which the caller has to
/// process next.
pub(crate) fn consume_unquoted<C: Context + ?Sized>(ctx: &mut C, first: u8) -> Result<(Span, u8)> {
    if first == 0 {
        return Err(fail(ctx, ErrorReason::UnterminatedValue));
    }
    // A value position holding a separator, as in `{"a":}`.
    if ends_literal(first) {
        return Err(fail(ctx, ErrorReason::InvalidValue));
    }
    ctx.write(first)?;

    loop {
        let b = ctx.read();
        if b == 0 {
            return Err(fail(ctx, ErrorReason::UnterminatedValue));
        }
        if ends_literal(b) {
            return Ok((ctx.write_buffer(), b));
        }
        ctx.write(b)?;
    }
}

/// Classifies the text of an unquoted token. `None` means it is not a JSON
/// literal or number.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn classify(span: Span, text: &[u8]) -> Option<Token> {
    let (kind, integer, float) = match text {
        b"true" => (ValueKind::Boolean, Some(1), 1.0),
        b"false" => (ValueKind::Boolean, Some(0), 0.0),
        b"null" => (ValueKind::Null, None, 0.0),
        _ => match parse_integer(text) {
            Some(i) => (ValueKind::Number, Some(i), i as f64),
            None => (ValueKind::Number, None, parse_float(text)?),
        },
    };
    Some(Token {
        kind,
        span: Some(span),
        integer,
        float,
    })
}

/// Decimal `i64`, with an optional sign. Rejects anything not consumed in
/// full and values out of range.
pub(crate) fn parse_integer(text: &[u8]) -> Option<i64> {
    core::str::from_utf8(text).ok()?.parse().ok()
}

/// Decimal floating point. Only `[0-9+-.eE]` is accepted, which rules out
/// hexadecimal, `inf` and `nan` spellings. Results that overflow to infinity
/// or underflow out of the normal range are rejected.
pub(crate) fn parse_float(text: &[u8]) -> Option<f64> {
    if text.is_empty()
        || !text
            .iter()
            .all(|&b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }

    let value: f64 = core::str::from_utf8(text).ok()?.parse().ok()?;
    match value.classify() {
        FpCategory::Infinite | FpCategory::Subnormal | FpCategory::Nan => None,
        FpCategory::Zero if has_nonzero_significand(text) => None,
        _ => Some(value),
    }
}

fn has_nonzero_significand(text: &[u8]) -> bool {
    text.iter()
        .take_while(|&&b| !matches!(b, b'e' | b'E'))
        .any(|&b| matches!(b, b'1'..=b'9'))
}
