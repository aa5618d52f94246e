//! Text encodings used to decode the HTML source file.
//!
//! The set of names mirrors what file-reading APIs in scripting runtimes
//! usually accept (`utf-8`, `latin1`, `base64`, ...). Decoding is strict: a
//! byte sequence that is not valid for the chosen encoding is reported as a
//! read error instead of being replaced with U+FFFD.

use crate::{Error, Result};
use base64::Engine as Base64Engine;
use std::fmt;
use std::str::FromStr;

/// Encoding applied when turning the raw bytes of the source file into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Latin1,
    Ascii,
    /// The file bytes rendered as standard base64 text
    Base64,
    /// The file bytes rendered as lowercase hex text
    Hex,
}

impl TextEncoding {
    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Ascii => "ascii",
            TextEncoding::Base64 => "base64",
            TextEncoding::Hex => "hex",
        }
    }

    /// Decode `bytes` into a string.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::ReadError(format!("invalid utf-8: {}", e))),
            TextEncoding::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(Error::ReadError(format!(
                        "invalid utf-16le: odd byte length {}",
                        bytes.len()
                    )));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units)
                    .map_err(|e| Error::ReadError(format!("invalid utf-16le: {}", e)))
            }
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(Error::ReadError(format!(
                        "non-ascii byte 0x{:02x} at offset {}",
                        bytes[pos], pos
                    )));
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            TextEncoding::Base64 => Ok(base64::engine::general_purpose::STANDARD.encode(bytes)),
            TextEncoding::Hex => Ok(hex::encode(bytes)),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-16le" | "utf16le" | "ucs2" | "ucs-2" => Ok(TextEncoding::Utf16Le),
            "latin1" | "binary" => Ok(TextEncoding::Latin1),
            "ascii" => Ok(TextEncoding::Ascii),
            "base64" => Ok(TextEncoding::Base64),
            "hex" => Ok(TextEncoding::Hex),
            other => Err(Error::ConfigError(format!("unknown text encoding '{}'", other))),
        }
    }
}
