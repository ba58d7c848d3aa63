use crate::error::EnvelopeError;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use regex::Regex;
use std::sync::OnceLock;

pub const PREFIX: &str = "[&";
pub const SUFFIX: &str = "]";

/// Whole-token grammar: `[&`, zero or more full base64 quads, an optional
/// padded final quad, `]`.
static ENVELOPE: OnceLock<Regex> = OnceLock::new();

fn envelope_pattern() -> &'static Regex {
    ENVELOPE.get_or_init(|| {
        Regex::new(r"^\[&((?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?)\]$")
            .expect("Invalid envelope regex")
    })
}

/// Standard alphabet with padding. Non-zero trailing bits are accepted so
/// that everything the grammar admits also decodes.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical)
        .with_decode_allow_trailing_bits(true),
);

/// Wraps raw link bytes as `[&<base64>]`.
pub fn wrap(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(PREFIX.len() + SUFFIX.len() + bytes.len().div_ceil(3) * 4);
    text.push_str(PREFIX);
    BASE64.encode_string(bytes, &mut text);
    text.push_str(SUFFIX);
    text
}

/// Strips the envelope and decodes the base64 body. The match is anchored:
/// surrounding text, whitespace or a second token are all rejected.
pub fn unwrap(text: &str) -> Result<Vec<u8>, EnvelopeError> {
    let captures = envelope_pattern()
        .captures(text)
        .ok_or_else(|| EnvelopeError::Malformed(describe_mismatch(text)))?;

    let body = captures.get(1).map_or("", |m| m.as_str());
    if body.is_empty() {
        return Ok(Vec::new());
    }

    BASE64
        .decode(body)
        .map_err(|e| EnvelopeError::Malformed(format!("invalid base64 body: {}", e)))
}

/// Cheap check for whether `text` is exactly one well-formed token.
pub fn is_envelope(text: &str) -> bool {
    envelope_pattern().is_match(text)
}

fn describe_mismatch(text: &str) -> String {
    if text.is_empty() {
        "empty input".to_string()
    } else if !text.starts_with(PREFIX) {
        format!("expected '{}' prefix", PREFIX)
    } else if !text.ends_with(SUFFIX) {
        format!("expected '{}' suffix", SUFFIX)
    } else {
        "body is not padded standard base64".to_string()
    }
}
