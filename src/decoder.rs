//! Lenient decoding of the upstream response body.
//!
//! The API sometimes prepends a banner or answers in an unexpected charset, so
//! the body is decoded leniently and the JSON object is cut out of whatever
//! surrounds it.
use crate::error::{QueryError, Result};
use serde_json::Value;

const LEADING_NOISE: &[char] = &['\u{feff}', '\u{fffe}', ' ', '\t', '\r', '\n', '\0'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Utf8,
    Latin1,
    Windows1252,
}

/// windows-1252 code points for bytes 0x80..=0x9F. Unassigned bytes keep their
/// C1 value.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}', '\u{8f}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}', '\u{178}',
];

fn windows_1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9f => WINDOWS_1252_HIGH[(byte - 0x80) as usize],
        _ => byte as char,
    }
}

impl Charset {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim().trim_matches('"').to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Charset::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" | "us-ascii" | "ascii" => {
                Some(Charset::Latin1)
            }
            "windows-1252" | "cp1252" | "x-cp1252" => Some(Charset::Windows1252),
            _ => None,
        }
    }

    fn detect(bytes: &[u8]) -> Self {
        if std::str::from_utf8(bytes).is_ok() {
            Charset::Utf8
        } else {
            Charset::Windows1252
        }
    }
}

/// Decode body bytes to text.
///
/// A declared charset wins; without one the charset is detected. Labels we do
/// not know fall back to lossy UTF-8.
pub fn decode_text(bytes: &[u8], declared_charset: Option<&str>) -> String {
    let charset = match declared_charset {
        Some(label) => Charset::from_label(label).unwrap_or(Charset::Utf8),
        None => Charset::detect(bytes),
    };

    match charset {
        Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        Charset::Windows1252 => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
    }
}

/// Cut the outermost `{ ... }` block out of `text`.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let text = text.trim_start_matches(LEADING_NOISE);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(&text[start..=end])
}

/// Decode a raw response body into JSON.
///
/// On failure the decoded text travels inside
/// [`QueryError::MalformedResponse`] so the caller can dump and preview it.
pub fn decode_response(bytes: &[u8], declared_charset: Option<&str>) -> Result<Value> {
    let text = decode_text(bytes, declared_charset);

    let block = match extract_json_block(&text) {
        Some(block) => block,
        None => {
            return Err(QueryError::malformed(
                "could not locate a JSON object in the response",
                text,
            ))
        }
    };

    match serde_json::from_str(block) {
        Ok(value) => Ok(value),
        Err(e) => Err(QueryError::malformed(e.to_string(), text)),
    }
}
