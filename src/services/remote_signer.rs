//! Remote signing adapter.
//!
//! A [`DigestSink`] is handed to signature-container code in place of a
//! private-key signer: the container streams its to-be-signed octets into
//! the sink, and [`DigestSink::finalize_and_sign`] exchanges the SHA-256
//! digest for a signature from the MSSP.

use crate::adapters::mss::client::MssClient;
use crate::domain::constants::mime;
use crate::domain::types::{Identity, MssFormat, SignatureProfile};
use crate::infra::error::MssResult;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::io;

/// Signature encoding requested from the MSSP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureFormat {
    /// CMS `SignedData`.
    #[default]
    Cms,
    /// Bare PKCS#1 signature value.
    Pkcs1,
}

impl SignatureFormat {
    #[must_use]
    pub fn mss_format(self) -> MssFormat {
        match self {
            Self::Cms => MssFormat::Cms,
            Self::Pkcs1 => MssFormat::KiuruPkcs1,
        }
    }
}

/// Key handle given to container code that expects a key object.
///
/// The key lives with the MSSP; this handle carries no key material and
/// cannot sign by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteKey;

impl RemoteKey {
    #[must_use]
    pub fn algorithm(&self) -> &'static str {
        "RSA"
    }

    #[must_use]
    pub fn key_material(&self) -> Option<&[u8]> {
        None
    }
}

/// Single-use SHA-256 sink that signs its digest remotely.
///
/// Bytes are hashed as they are written, never buffered.
pub struct DigestSink<'a> {
    client: &'a MssClient,
    identity: Identity,
    message: String,
    profile: SignatureProfile,
    format: SignatureFormat,
    hasher: Sha256,
    written: u64,
}

impl<'a> DigestSink<'a> {
    /// # Arguments
    /// * `client` - Client used for the signature exchange
    /// * `identity` - Mobile user that signs
    /// * `message` - Text shown to the user
    /// * `profile` - Signature profile
    /// * `format` - Signature encoding to request
    #[must_use]
    pub fn new(
        client: &'a MssClient,
        identity: Identity,
        message: impl Into<String>,
        profile: SignatureProfile,
        format: SignatureFormat,
    ) -> Self {
        Self {
            client,
            identity,
            message: message.into(),
            profile,
            format,
            hasher: Sha256::new(),
            written: 0,
        }
    }

    /// Number of bytes hashed so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Close the digest and have it signed.
    ///
    /// # Errors
    /// Any error of the signature exchange; the hashed input is discarded.
    pub async fn finalize_and_sign(self) -> MssResult<Vec<u8>> {
        let digest = self.hasher.finalize();
        log::info!(
            "Signing SHA-256 digest {} ({} bytes hashed)",
            base64::engine::general_purpose::STANDARD.encode(digest),
            self.written
        );
        let client = self.client;
        match self.format {
            SignatureFormat::Cms => {
                client
                    .sign(&self.identity, &self.message, &digest, mime::SHA256, &self.profile)
                    .await
            }
            SignatureFormat::Pkcs1 => {
                client
                    .sign_pkcs1(&self.identity, &self.message, &digest, mime::SHA256, &self.profile)
                    .await
            }
        }
    }
}

impl io::Write for DigestSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.hasher.update(buf);
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for DigestSink<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestSink")
            .field("identity", &self.identity)
            .field("profile", &self.profile)
            .field("format", &self.format)
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mss::client::MssClientConfig;
    use crate::domain::types::ServiceUrl;
    use std::io::Write;

    #[test]
    fn test_remote_key_has_no_material() {
        let key = RemoteKey;
        assert_eq!(key.algorithm(), "RSA");
        assert!(key.key_material().is_none());
    }

    #[test]
    fn test_format_mapping() {
        assert_eq!(SignatureFormat::Cms.mss_format(), MssFormat::Cms);
        assert_eq!(SignatureFormat::Pkcs1.mss_format(), MssFormat::KiuruPkcs1);
    }

    #[tokio::test]
    async fn test_sink_counts_bytes_and_surfaces_transport_failure() {
        let config = MssClientConfig::new(
            ServiceUrl::new("http://127.0.0.1:1/rest/service").unwrap(),
            "http://ap.example.com",
        )
        .with_api_key("key")
        .with_timeout(std::time::Duration::from_secs(5));
        let client = MssClient::new(config).unwrap();
        let mut sink = DigestSink::new(
            &client,
            Identity::Msisdn("+35847001001".into()),
            "Sign document",
            SignatureProfile::signing(),
            SignatureFormat::Cms,
        );
        sink.write_all(b"hello ").unwrap();
        sink.write_all(b"world").unwrap();
        assert_eq!(sink.bytes_written(), 11);

        let err = sink.finalize_and_sign().await.unwrap_err();
        assert_eq!(err.code(), "780");
    }
}
