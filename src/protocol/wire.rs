//! Token-level framing for the `TOKEN[|TOKEN]*` wire format.
//!
//! Wire format:
//! ```text
//! ┌─────────┬───┬─────────┬───┬─────┬───┬─────────┐
//! │ KEYWORD │ | │ TOKEN 1 │ | │ ... │ | │ TOKEN N │
//! └─────────┴───┴─────────┴───┴─────┴───┴─────────┘
//! ```
//!
//! [`Tokens`] splits an inbound string and offers typed accessors that
//! report a [`DecodeError`] instead of panicking on short or malformed
//! input.  [`WireWriter`] builds the canonical outbound form.

use core::str::FromStr;

use crate::error::DecodeError;

/// Field separator.
pub const SEPARATOR: char = '|';

/// A split wire string.
pub struct Tokens<'a> {
    parts: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Split `raw` on the separator.  Fails only on empty input.
    pub fn split(raw: &'a str) -> Result<Self, DecodeError> {
        if raw.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(Self {
            parts: raw.split(SEPARATOR).collect(),
        })
    }

    /// The leading token.
    pub fn keyword(&self) -> &'a str {
        self.parts[0]
    }

    /// Token at `position`, if present.
    pub fn get(&self, position: usize) -> Option<&'a str> {
        self.parts.get(position).copied()
    }

    /// Number of tokens, keyword included.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Token at `position`, or a `MissingToken` error.
    pub fn require(&self, keyword: &'static str, position: usize) -> Result<&'a str, DecodeError> {
        self.get(position)
            .ok_or(DecodeError::MissingToken { keyword, position })
    }

    /// Owned copy of a required token.
    pub fn string(&self, keyword: &'static str, position: usize) -> Result<String, DecodeError> {
        self.require(keyword, position).map(str::to_owned)
    }

    /// Required decimal token.
    pub fn number<T: FromStr>(&self, keyword: &'static str, position: usize) -> Result<T, DecodeError> {
        let token = self.require(keyword, position)?;
        token.parse().map_err(|_| DecodeError::InvalidNumber {
            keyword,
            token: token.to_owned(),
        })
    }

    /// Optional decimal token: absent or unparsable yields `None`.
    pub fn number_or_none<T: FromStr>(&self, position: usize) -> Option<T> {
        self.get(position).and_then(|t| t.parse().ok())
    }

    /// Every token from `position` onwards, verbatim.
    pub fn tail(&self, position: usize) -> Vec<String> {
        self.parts
            .iter()
            .skip(position)
            .map(|s| (*s).to_owned())
            .collect()
    }
}

/// Builder for the canonical outbound form.
pub struct WireWriter {
    buf: String,
}

impl WireWriter {
    /// Start a message with its leading keyword.
    pub fn new(keyword: &str) -> Self {
        Self {
            buf: keyword.to_owned(),
        }
    }

    /// Append one token.
    pub fn token(mut self, value: &str) -> Self {
        self.buf.push(SEPARATOR);
        self.buf.push_str(value);
        self
    }

    /// Append one decimal token.
    pub fn number(self, value: impl Into<u64>) -> Self {
        let rendered = value.into().to_string();
        self.token(&rendered)
    }

    /// Append a variable-length tail; an empty slice appends nothing.
    pub fn tokens<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        for v in values {
            self = self.token(v.as_ref());
        }
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
