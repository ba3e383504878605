use super::{
    escape_buffer::{Utf16EscapeBuffer, Utf16Unit, combine_surrogates},
    fail,
};
use crate::{
    context::{Context, Span},
    error::{ErrorReason, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Character,
    Escape,
    Unicode,
}

/// Decodes a quoted string whose opening quote has already been consumed,
/// writing the UTF-8 content through the context's current write region.
///
/// Returns the region once the closing quote has been read.
pub(crate) fn consume_quoted<C: Context + ?Sized>(ctx: &mut C) -> Result<Span> {
    let mut state = State::Character;
    let mut escape = Utf16EscapeBuffer::new();
    // A `\u` high surrogate waiting for its low half.
    let mut high: Option<u16> = None;

    loop {
        let b = ctx.read();
        if b == 0 {
            return Err(fail(ctx, ErrorReason::ExpectedClosingQuote));
        }

        match state {
            State::Character => match b {
                b'\\' => state = State::Escape,
                _ if high.is_some() => {
                    return Err(fail(ctx, ErrorReason::ExpectedUtf16LowSurrogate));
                }
                b'"' => break,
                _ => ctx.write(b)?,
            },
            State::Escape => {
                let decoded = match b {
                    b'u' => {
                        state = State::Unicode;
                        continue;
                    }
                    b'"' => b'"',
                    b'\\' => b'\\',
                    b'/' => b'/',
                    b'b' => 0x08,
                    b'f' => 0x0C,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    _ => return Err(fail(ctx, ErrorReason::InvalidEscapeSequence)),
                };
                if high.is_some() {
                    return Err(fail(ctx, ErrorReason::ExpectedUtf16LowSurrogate));
                }
                ctx.write(decoded)?;
                state = State::Character;
            }
            State::Unicode => {
                let Some(unit) = escape.feed(b).map_err(|reason| fail(ctx, reason))? else {
                    continue;
                };
                state = State::Character;
                let ch = match (high.take(), Utf16Unit::from(unit)) {
                    (None, Utf16Unit::Scalar(ch)) => ch,
                    (None, Utf16Unit::High(unit)) => {
                        high = Some(unit);
                        continue;
                    }
                    (Some(high), Utf16Unit::Low(low)) => combine_surrogates(high, low)
                        .ok_or_else(|| fail(ctx, ErrorReason::InvalidUtf16Character))?,
                    (None, Utf16Unit::Low(_)) | (Some(_), _) => {
                        return Err(fail(ctx, ErrorReason::InvalidUtf16Character));
                    }
                };
                write_char(ctx, ch)?;
            }
        }
    }

    Ok(ctx.write_buffer())
}

fn write_char<C: Context + ?Sized>(ctx: &mut C, ch: char) -> Result<()> {
    let mut buf = [0; 4];
    for &b in ch.encode_utf8(&mut buf).as_bytes() {
        ctx.write(b)?;
    }
    Ok(())
}
