//! Song length timestamps: `[M]+:SS[.fff]`.
//!
//! Minutes are an unbounded digit run, seconds must stay within 0..=59 and the
//! optional fraction holds one to three digits of thousandths, so `5:30.4` is
//! five minutes, thirty seconds and 400 milliseconds.

use std::time::Duration;

use crate::error::{HvscError, Result};

const FRACTION_DIGITS: u32 = 3;

/// A parsed timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Total length in milliseconds.
    pub millis: u64,
    /// Byte offset of the first character after the timestamp.
    pub consumed: usize,
}

impl Timestamp {
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }
}

/// Parse a timestamp at the start of `text`.
///
/// Parsing stops at the first byte that cannot continue the timestamp; the
/// caller decides whether trailing text is acceptable. On failure the error
/// carries the offset of the offending byte.
pub fn parse_timestamp(text: &str) -> Result<Timestamp> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let mut minutes: u64 = 0;
    while let Some(digit) = digit_at(bytes, pos) {
        minutes = minutes
            .checked_mul(10)
            .and_then(|m| m.checked_add(digit))
            .ok_or(HvscError::Timestamp { position: pos })?;
        pos += 1;
    }
    if bytes.get(pos) != Some(&b':') {
        return Err(HvscError::Timestamp { position: pos });
    }
    pos += 1;

    let mut seconds: u64 = 0;
    while let Some(digit) = digit_at(bytes, pos) {
        seconds = seconds * 10 + digit;
        if seconds > 59 {
            return Err(HvscError::Timestamp { position: pos });
        }
        pos += 1;
    }

    let mut fraction: u64 = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        let mut digits = 0;
        while digits < FRACTION_DIGITS {
            let Some(digit) = digit_at(bytes, pos) else {
                break;
            };
            fraction = fraction * 10 + digit;
            digits += 1;
            pos += 1;
        }
        if digits == 0 {
            return Err(HvscError::Timestamp { position: pos });
        }
        fraction *= 10u64.pow(FRACTION_DIGITS - digits);
    }

    let millis = minutes
        .checked_mul(60)
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(fraction))
        .ok_or(HvscError::Timestamp { position: 0 })?;

    Ok(Timestamp {
        millis,
        consumed: pos,
    })
}

/// Render milliseconds as `M:SS`, or `M:SS.fff` when there is a fraction.
pub fn format_timestamp(millis: u64) -> String {
    let minutes = millis / 60_000;
    let seconds = (millis / 1000) % 60;
    let fraction = millis % 1000;
    if fraction == 0 {
        format!("{minutes}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}.{fraction:03}")
    }
}

fn digit_at(bytes: &[u8], pos: usize) -> Option<u64> {
    bytes
        .get(pos)
        .filter(|b| b.is_ascii_digit())
        .map(|b| u64::from(b - b'0'))
}
