//! Data-to-be-signed payloads.

use crate::domain::constants::{encoding, mime};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

/// Payload sent to the mobile user for signing.
///
/// Text payloads travel verbatim with their encoding tag (UTF-8 unless told
/// otherwise). Binary payloads, such as a pre-computed digest, travel as
/// base64 with `Encoding = "base64"`.
#[derive(Clone, PartialEq, Eq)]
pub struct Dtbs {
    payload: Payload,
    encoding: String,
    mime_type: Option<String>,
}

impl Dtbs {
    /// UTF-8 text payload.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::text_with_encoding(text, encoding::UTF8)
    }

    /// Text payload with an explicit encoding tag.
    #[must_use]
    pub fn text_with_encoding(text: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            payload: Payload::Text(text.into()),
            encoding: encoding.into(),
            mime_type: None,
        }
    }

    /// Binary payload with the given MIME type.
    #[must_use]
    pub fn bytes(data: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            payload: Payload::Bytes(data.into()),
            encoding: encoding::BASE64.to_string(),
            mime_type: Some(mime_type.into()),
        }
    }

    /// Pre-computed SHA-256 digest.
    #[must_use]
    pub fn sha256_digest(digest: impl Into<Vec<u8>>) -> Self {
        Self::bytes(digest, mime::SHA256)
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self.payload, Payload::Bytes(_))
    }

    /// Text of a text payload; `None` for binary payloads.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(t) => Some(t),
            Payload::Bytes(_) => None,
        }
    }

    /// Raw octets of the payload.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.payload {
            Payload::Text(t) => t.as_bytes().to_vec(),
            Payload::Bytes(b) => b.clone(),
        }
    }

    /// Value placed in the `Data` field on the wire.
    #[must_use]
    pub fn wire_data(&self) -> String {
        use base64::Engine;
        match &self.payload {
            Payload::Text(t) => t.clone(),
            Payload::Bytes(b) => base64::engine::general_purpose::STANDARD.encode(b),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.payload {
            Payload::Text(t) => t.chars().count(),
            Payload::Bytes(b) => b.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Dtbs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Text(t) => write!(f, "Dtbs(text={t:?}, encoding={})", self.encoding),
            Payload::Bytes(b) => write!(f, "Dtbs(binary, len={}, mime={:?})", b.len(), self.mime_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults_to_utf8() {
        let dtbs = Dtbs::text("Log in to example.com");
        assert_eq!(dtbs.encoding(), "UTF-8");
        assert_eq!(dtbs.wire_data(), "Log in to example.com");
        assert_eq!(dtbs.mime_type(), None);
        assert!(!dtbs.is_binary());
    }

    #[test]
    fn test_bytes_are_base64_on_the_wire() {
        let dtbs = Dtbs::sha256_digest(vec![0u8, 1, 2, 255]);
        assert_eq!(dtbs.encoding(), "base64");
        assert_eq!(dtbs.wire_data(), "AAEC/w==");
        assert_eq!(dtbs.mime_type(), Some("application/x-sha256"));
        assert_eq!(dtbs.to_bytes(), vec![0u8, 1, 2, 255]);
    }

    #[test]
    fn test_debug_hides_binary_content() {
        let dtbs = Dtbs::bytes(vec![9u8; 32], mime::OCTET_STREAM);
        assert_eq!(
            format!("{dtbs:?}"),
            "Dtbs(binary, len=32, mime=Some(\"application/octet-stream\"))"
        );
    }
}
