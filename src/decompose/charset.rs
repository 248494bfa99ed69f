//! Text encodings applied when a decomposer writes strings.
//!
//! Filters built with different encodings disagree on the bytes of every
//! non-ASCII string, so combining them is only meaningful when both use
//! the same [`TextEncoding`].

use crate::error::{BloomError, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Byte encoding used for `str` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TextEncoding {
    /// UTF-8, the native `str` representation.
    #[default]
    Utf8,
    /// UTF-16, big-endian, no byte order mark.
    Utf16Be,
    /// UTF-16, little-endian, no byte order mark.
    Utf16Le,
    /// ISO-8859-1. Characters above U+00FF are written as `?`.
    Latin1,
    /// US-ASCII. Characters above U+007F are written as `?`.
    Ascii,
}

const REPLACEMENT: u8 = b'?';

impl TextEncoding {
    /// Canonical charset name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
        }
    }

    /// Append the encoded form of `text` to `out`.
    pub fn encode_into(self, text: &str, out: &mut Vec<u8>) {
        match self {
            Self::Utf8 => out.extend_from_slice(text.as_bytes()),
            Self::Utf16Be => {
                out.reserve(text.len() * 2);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
            Self::Utf16Le => {
                out.reserve(text.len() * 2);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
            }
            Self::Latin1 => out.extend(
                text.chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(REPLACEMENT)),
            ),
            Self::Ascii => out.extend(text.chars().map(|c| {
                if c.is_ascii() {
                    c as u8
                } else {
                    REPLACEMENT
                }
            })),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = BloomError;

    /// Parse a charset name. Matching ignores case, `-` and `_`.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "utf8" => Ok(Self::Utf8),
            "utf16" | "utf16be" => Ok(Self::Utf16Be),
            "utf16le" => Ok(Self::Utf16Le),
            "iso88591" | "latin1" | "l1" => Ok(Self::Latin1),
            "usascii" | "ascii" => Ok(Self::Ascii),
            _ => Err(BloomError::invalid_parameters(format!(
                "unsupported charset '{}'",
                s
            ))),
        }
    }
}
