//! Text encodings for reading source bytes and serializing output.
//!
//! Source decoding produces a `String`; a leading byte-order-mark is removed
//! during decoding so the parser never sees it. Output serialization turns
//! the selected part back into bytes for the sink.

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;
use std::str::FromStr;

/// UTF-8 byte-order-mark.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Error produced when source bytes are invalid under the selected encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DecodeError {
    /// Byte offset of the first invalid sequence.
    pub offset: usize,
}

/// Encoding used to decode source file bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceEncoding {
    /// Strict UTF-8; invalid bytes fail the operation.
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD; never fails.
    Utf8Lossy,
    /// ISO-8859-1; every byte maps to the code point of the same value.
    Latin1,
}

impl SourceEncoding {
    /// Decode `bytes` into text, removing a leading byte-order-mark.
    ///
    /// The error offset refers to the original byte stream, BOM included.
    pub(crate) fn decode(self, mut bytes: Vec<u8>) -> Result<String, DecodeError> {
        let mut bom = 0;
        if matches!(self, Self::Utf8 | Self::Utf8Lossy) && bytes.starts_with(&UTF8_BOM) {
            bytes.drain(..UTF8_BOM.len());
            bom = UTF8_BOM.len();
        }
        let text = match self {
            Self::Utf8 => String::from_utf8(bytes).map_err(|e| DecodeError {
                offset: e.utf8_error().valid_up_to() + bom,
            })?,
            Self::Utf8Lossy => String::from_utf8_lossy(&bytes).into_owned(),
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        };
        Ok(text)
    }

    /// Canonical name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Lossy => "utf-8-lossy",
            Self::Latin1 => "latin-1",
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-8-lossy" | "utf8-lossy" => Ok(Self::Utf8Lossy),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            other => Err(format!(
                "unknown source encoding: {other} (supported: utf-8, utf-8-lossy, latin-1)"
            )),
        }
    }
}

/// Encoding used to serialize the selected part to the output sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputEncoding {
    /// Write the string bytes unchanged.
    #[default]
    Utf8,
    /// Escape non-ASCII characters as numeric character references, yielding
    /// pure-ASCII output.
    Ascii,
}

impl OutputEncoding {
    /// Serialize `text` for the sink.
    #[must_use]
    pub fn encode(self, text: &str) -> Cow<'_, [u8]> {
        match self {
            Self::Utf8 => Cow::Borrowed(text.as_bytes()),
            Self::Ascii => {
                if text.is_ascii() {
                    return Cow::Borrowed(text.as_bytes());
                }
                let mut out = String::with_capacity(text.len());
                for c in text.chars() {
                    if c.is_ascii() {
                        out.push(c);
                    } else {
                        write!(out, "&#x{:x};", u32::from(c)).unwrap();
                    }
                }
                Cow::Owned(out.into_bytes())
            }
        }
    }

    /// Canonical name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Ascii => "ascii",
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            other => Err(format!(
                "unknown output encoding: {other} (supported: utf-8, ascii)"
            )),
        }
    }
}
