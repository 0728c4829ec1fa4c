//! Per-document signing pipeline.
//!
//! Container formats (PAdES, XML-DSig, ...) plug in through
//! [`SignatureContainer`]; the pipeline supplies the signer's certificate
//! chain and a remote signature for the container's to-be-signed octets.

use super::remote_signer::{DigestSink, RemoteKey, SignatureFormat};
use crate::adapters::mss::client::MssClient;
use crate::domain::certificate::CertificateBundle;
use crate::domain::types::{Identity, SignatureProfile};
use crate::infra::error::{MssError, MssResult};
use std::io::Write;

/// Signature container of one document.
///
/// Implementations compute the octets the signature covers and embed the
/// returned signature value into their own structure.
pub trait SignatureContainer {
    /// Signature encoding the container embeds.
    fn signature_format(&self) -> SignatureFormat;

    /// Stream the to-be-signed octets into `out`.
    ///
    /// `bundle` is the signer's chain, end-entity first. `key` stands in
    /// wherever the container expects a signing key.
    ///
    /// # Errors
    /// Container-specific failures.
    fn write_to_be_signed(
        &mut self,
        bundle: &CertificateBundle,
        key: &RemoteKey,
        out: &mut dyn Write,
    ) -> MssResult<()>;

    /// Embed the signature and return the finished document.
    ///
    /// # Errors
    /// Container-specific failures.
    fn embed_signature(&mut self, signature: &[u8]) -> MssResult<Vec<u8>>;
}

/// Signs one document on behalf of a mobile user. Not shared between
/// documents.
#[derive(Debug)]
pub struct DocumentSigner<'a> {
    client: &'a MssClient,
    identity: Identity,
    message: String,
    profile: SignatureProfile,
}

impl<'a> DocumentSigner<'a> {
    #[must_use]
    pub fn new(
        client: &'a MssClient,
        identity: Identity,
        message: impl Into<String>,
        profile: SignatureProfile,
    ) -> Self {
        Self {
            client,
            identity,
            message: message.into(),
            profile,
        }
    }

    /// Resolve the signer's certificate, sign the container's octets
    /// remotely and return the signed document.
    ///
    /// # Errors
    /// `UnknownUser` when the user has no certificate for the profile;
    /// any error of the container or the signature exchange.
    pub async fn sign<C: SignatureContainer>(self, container: &mut C) -> MssResult<Vec<u8>> {
        let bundle = self
            .client
            .get_certificate(&self.identity, &self.profile)
            .await?;
        let Some(certificate) = bundle.certificate() else {
            return Err(MssError::unknown_user("Failed to get user certificate"));
        };
        log::info!("Signing document as {}", certificate.subject());

        let mut sink = DigestSink::new(
            self.client,
            self.identity,
            self.message,
            self.profile,
            container.signature_format(),
        );
        container.write_to_be_signed(&bundle, &RemoteKey, &mut sink)?;
        log::debug!("Container produced {} octets to sign", sink.bytes_written());

        let signature = sink.finalize_and_sign().await?;
        container.embed_signature(&signature)
    }
}
