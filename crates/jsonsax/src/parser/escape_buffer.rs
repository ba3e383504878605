//! Decoding of `\uXXXX` escapes one hex digit at a time.
//!
//! [`Utf16EscapeBuffer`] accumulates exactly four ASCII hexadecimal digits
//! into a UTF-16 code unit. Pairing surrogates is left to the string decoder,
//! which sees the code units in order; [`Utf16Unit`] classifies them and
//! [`combine_surrogates`] joins a high/low pair into a scalar value.

use crate::error::ErrorReason;

/// Accumulates the four hexadecimal digits of a `\u` escape.
#[derive(Debug, Default)]
pub(crate) struct Utf16EscapeBuffer {
    acc: u16,
    len: u8,
}

impl Utf16EscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    #[inline]
    fn hex_val(b: u8) -> Option<u16> {
        match b {
            b'0'..=b'9' => Some(u16::from(b - b'0')),
            b'a'..=b'f' => Some(u16::from(b - b'a' + 10)),
            b'A'..=b'F' => Some(u16::from(b - b'A' + 10)),
            _ => None,
        }
    }

    /// Feeds one digit.
    ///
    /// Returns `Ok(None)` until the fourth digit arrives, then the code unit;
    /// the buffer is reset afterwards.
    pub fn feed(&mut self, b: u8) -> Result<Option<u16>, ErrorReason> {
        let Some(d) = Self::hex_val(b) else {
            self.reset();
            return Err(ErrorReason::InvalidUtf16Character);
        };

        if self.len >= 4 {
            unreachable!();
        }

        self.acc = (self.acc << 4) | d;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }

        let unit = self.acc;
        self.reset();
        Ok(Some(unit))
    }
}

/// A UTF-16 code unit, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Utf16Unit {
    /// A code unit that is a scalar value on its own.
    Scalar(char),
    High(u16),
    Low(u16),
}

impl From<u16> for Utf16Unit {
    fn from(unit: u16) -> Self {
        match unit {
            0xD800..=0xDBFF => Self::High(unit),
            0xDC00..=0xDFFF => Self::Low(unit),
            // Every non-surrogate BMP code unit is a scalar value.
            _ => char::from_u32(u32::from(unit)).map_or_else(|| unreachable!(), Self::Scalar),
        }
    }
}

/// Joins a high and a low surrogate into the supplementary-plane scalar they
/// encode.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    if !(0xD800..=0xDBFF).contains(&high) || !(0xDC00..=0xDFFF).contains(&low) {
        return None;
    }
    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code)
}
