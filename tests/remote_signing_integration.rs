//! Remote Signing Integration Tests
//!
//! Document signing through the digest sink: the container streams its
//! to-be-signed octets, the digest is signed by the mock MSSP and the
//! signature is embedded back into the container.

mod common;

use common::fixtures::{self, AP_ID, MSISDN, SIGNING};
use common::mock_mss::{MockMss, MockReply};
use mss_rest_client::domain::CertificateBundle;
use mss_rest_client::services::RemoteKey;
use mss_rest_client::{
    DigestSink, DocumentSigner, Identity, MssClient, MssClientConfig, MssResult, ServiceUrl,
    SignatureContainer, SignatureFormat, SignatureProfile,
};
use sha2::{Digest, Sha256};
use std::io::Write;

fn client(url: &str) -> MssClient {
    let config =
        MssClientConfig::new(ServiceUrl::new(url).unwrap(), AP_ID).with_api_key("secret-key");
    MssClient::new(config).unwrap()
}

/// Answers profile queries with one active chain and signature requests
/// with a fixed signature.
async fn signing_mssp(signature: &'static [u8]) -> MockMss {
    MockMss::start(move |request| match request.root_key() {
        Some("MSS_ProfileReq") => MockReply::json(&fixtures::profile_response(vec![
            fixtures::certificate_chain(Some("ACTIVE"), &[SIGNING]),
        ])),
        _ => MockReply::json(&fixtures::signature_response(signature)),
    })
    .await
}

/// Container that signs a fixed payload and appends the signature.
struct TestContainer {
    content: Vec<u8>,
    format: SignatureFormat,
    signer_subject: Option<String>,
    key_algorithm: Option<&'static str>,
}

impl TestContainer {
    fn new(content: &[u8], format: SignatureFormat) -> Self {
        Self {
            content: content.to_vec(),
            format,
            signer_subject: None,
            key_algorithm: None,
        }
    }
}

impl SignatureContainer for TestContainer {
    fn signature_format(&self) -> SignatureFormat {
        self.format
    }

    fn write_to_be_signed(
        &mut self,
        bundle: &CertificateBundle,
        key: &RemoteKey,
        out: &mut dyn Write,
    ) -> MssResult<()> {
        self.signer_subject = bundle.certificate().map(|c| c.subject());
        self.key_algorithm = Some(key.algorithm());
        // Written in two chunks to exercise incremental hashing.
        let (head, tail) = self.content.split_at(self.content.len() / 2);
        out.write_all(head)?;
        out.write_all(tail)?;
        Ok(())
    }

    fn embed_signature(&mut self, signature: &[u8]) -> MssResult<Vec<u8>> {
        let mut signed = self.content.clone();
        signed.extend_from_slice(b"\n--signature--\n");
        signed.extend_from_slice(signature);
        Ok(signed)
    }
}

#[tokio::test]
async fn test_document_signer_embeds_remote_signature() {
    let mock = signing_mssp(b"cms-signature").await;
    let client = client(&mock.url());
    let mut container = TestContainer::new(b"%PDF-1.7 document body", SignatureFormat::Cms);

    let signed = DocumentSigner::new(
        &client,
        Identity::msisdn(MSISDN).unwrap(),
        "Sign contract.pdf",
        SignatureProfile::signing(),
    )
    .sign(&mut container)
    .await
    .unwrap();

    assert!(signed.starts_with(b"%PDF-1.7 document body"));
    assert!(signed.ends_with(b"cms-signature"));
    assert_eq!(container.key_algorithm, Some("RSA"));
    assert!(container
        .signer_subject
        .as_deref()
        .is_some_and(|s| s.contains("CN=Test User")));

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].root_key(), Some("MSS_ProfileReq"));

    let body = &requests[1].body["MSS_SignatureReq"];
    let expected_digest = Sha256::digest(b"%PDF-1.7 document body");
    assert_eq!(body["DataToBeSigned"]["Data"], fixtures::b64(&expected_digest));
    assert_eq!(body["DataToBeSigned"]["MimeType"], "application/x-sha256");
    assert_eq!(body["DataToBeDisplayed"]["Data"], "Sign contract.pdf");
}

#[tokio::test]
async fn test_document_signer_requests_pkcs1_for_pkcs1_containers() {
    let mock = signing_mssp(b"pkcs1-signature").await;
    let client = client(&mock.url());
    let mut container = TestContainer::new(b"<xml/>", SignatureFormat::Pkcs1);

    let signed = DocumentSigner::new(
        &client,
        Identity::msisdn(MSISDN).unwrap(),
        "Sign XML",
        SignatureProfile::signing(),
    )
    .sign(&mut container)
    .await
    .unwrap();
    assert!(signed.ends_with(b"pkcs1-signature"));
    assert_eq!(
        mock.last_request().body["MSS_SignatureReq"]["MSS_Format"],
        "http://www.methics.fi/KiuruMSSP/v3.2.0#PKCS1"
    );
}

#[tokio::test]
async fn test_document_signer_without_certificate_is_unknown_user() {
    let mock = MockMss::fixed(fixtures::profile_response(vec![fixtures::certificate_chain(
        Some("INACTIVE"),
        &[SIGNING],
    )]))
    .await;
    let client = client(&mock.url());
    let mut container = TestContainer::new(b"data", SignatureFormat::Cms);

    let err = DocumentSigner::new(
        &client,
        Identity::msisdn(MSISDN).unwrap(),
        "Sign",
        SignatureProfile::signing(),
    )
    .sign(&mut container)
    .await
    .unwrap_err();
    assert_eq!(err.code(), "105");
    assert!(container.key_algorithm.is_none());
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_digest_sink_signs_streamed_file_digest() {
    let mock = signing_mssp(b"file-signature").await;
    let client = client(&mock.url());

    let content = vec![0x5au8; 64 * 1024 + 17];
    let mut sink = DigestSink::new(
        &client,
        Identity::msisdn(MSISDN).unwrap(),
        "Sign file",
        SignatureProfile::signing(),
        SignatureFormat::Cms,
    );
    std::io::copy(&mut content.as_slice(), &mut sink).unwrap();
    assert_eq!(sink.bytes_written(), content.len() as u64);

    let signature = sink.finalize_and_sign().await.unwrap();
    assert_eq!(signature, b"file-signature");
    assert_eq!(
        mock.last_request().body["MSS_SignatureReq"]["DataToBeSigned"]["Data"],
        fixtures::b64(&Sha256::digest(&content))
    );
}
