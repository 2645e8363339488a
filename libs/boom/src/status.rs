//! Status code coercion and reason phrases.

use std::fmt;

use http::StatusCode;

use crate::error::Error;

/// Label used for status codes that have no standard reason phrase.
pub const UNKNOWN_REASON: &str = "Unknown";

/// Lowest status code an error object may carry.
pub const MIN_ERROR_STATUS: u16 = 400;

/// Standard reason phrase for `code`, or [`UNKNOWN_REASON`].
#[must_use]
pub fn reason_phrase(code: u16) -> &'static str {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or(UNKNOWN_REASON)
}

/// Loosely typed status code accepted by `create` and `wrap`.
///
/// Numbers are truncated and strings contribute their leading integer, so
/// `"404.1"` and `404.7` both resolve to `404`.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusInput {
    Code(u16),
    Number(f64),
    Text(String),
}

impl StatusInput {
    /// Coerce the input into an error status code.
    ///
    /// # Errors
    /// Returns [`Error::InvalidStatusCode`] when the input is not finite, not
    /// numeric, or below 400.
    pub fn resolve(&self) -> Result<u16, Error> {
        let code = match self {
            Self::Code(code) => Some(*code),
            Self::Number(number) => integer_from_float(*number),
            Self::Text(text) => leading_integer(text),
        };

        match code {
            Some(code) if code >= MIN_ERROR_STATUS => Ok(code),
            _ => Err(Error::InvalidStatusCode {
                input: self.to_string(),
            }),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked above the cast
fn integer_from_float(number: f64) -> Option<u16> {
    if !number.is_finite() {
        return None;
    }
    let truncated = number.trunc();
    if truncated < 0.0 || truncated > f64::from(u16::MAX) {
        return None;
    }
    Some(truncated as u16)
}

fn leading_integer(text: &str) -> Option<u16> {
    let trimmed = text.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..digits_len].parse().ok()
}

impl fmt::Display for StatusInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<u16> for StatusInput {
    fn from(code: u16) -> Self {
        Self::Code(code)
    }
}

impl From<StatusCode> for StatusInput {
    fn from(status: StatusCode) -> Self {
        Self::Code(status.as_u16())
    }
}

impl From<f64> for StatusInput {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<&str> for StatusInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for StatusInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
