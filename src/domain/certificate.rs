//! Certificate wrappers: a single parsed certificate and the per-profile
//! certificate bundle returned by certificate discovery.

use crate::domain::subject;
use crate::domain::types::SignatureProfile;
use crate::infra::error::{MssError, MssResult};
use der::{Decode, Encode};
use std::fmt;
use x509_cert::Certificate;

/// Parsed X.509 certificate that keeps its original DER encoding.
#[derive(Clone)]
pub struct MssCertificate {
    der: Box<[u8]>,
    cert: Certificate,
}

impl MssCertificate {
    /// Parse a DER-encoded certificate.
    ///
    /// # Errors
    /// Returns an internal error if the bytes are not a valid certificate.
    pub fn from_der(der: impl Into<Vec<u8>>) -> MssResult<Self> {
        let der = der.into();
        let cert = Certificate::from_der(&der)
            .map_err(|e| MssError::internal(format!("Failed to parse certificate: {e}")))?;
        Ok(Self {
            der: der.into_boxed_slice(),
            cert,
        })
    }

    /// Parse a base64 DER certificate as carried in `X509Certificate` lists.
    ///
    /// # Errors
    /// Returns an internal error on bad base64 or a malformed certificate.
    pub fn from_base64(b64: &str) -> MssResult<Self> {
        use base64::Engine;
        let der = base64::engine::general_purpose::STANDARD.decode(b64.trim())?;
        Self::from_der(der)
    }

    pub(crate) fn from_parsed(cert: Certificate) -> MssResult<Self> {
        let der = cert.to_der()?;
        Ok(Self {
            der: der.into_boxed_slice(),
            cert,
        })
    }

    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    #[must_use]
    pub fn certificate(&self) -> &Certificate {
        &self.cert
    }

    /// Subject rendered most-specific first, e.g. `CN=Test User,O=Example,C=FI`.
    #[must_use]
    pub fn subject(&self) -> String {
        subject::format_name(&self.cert.tbs_certificate.subject)
    }

    #[must_use]
    pub fn issuer(&self) -> String {
        subject::format_name(&self.cert.tbs_certificate.issuer)
    }

    /// Serial number as lower-case hex.
    #[must_use]
    pub fn serial_hex(&self) -> String {
        hex::encode(self.cert.tbs_certificate.serial_number.as_bytes())
    }

    /// Look up a subject attribute by (case-insensitive) name or alias.
    #[must_use]
    pub fn subject_attribute(&self, name: &str) -> Option<String> {
        subject::subject_attribute(&self.cert.tbs_certificate.subject, name)
    }
}

impl PartialEq for MssCertificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for MssCertificate {}

impl fmt::Debug for MssCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MssCertificate(subject={}, len={})",
            self.subject(),
            self.der.len()
        )
    }
}

/// Certificate chain of one mobile user key, plus the signature profiles
/// the key may be used for.
///
/// The chain is ordered end-entity first. "Not found" is represented by
/// [`CertificateBundle::empty`], so accessors are always safe to call.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CertificateBundle {
    chain: Vec<MssCertificate>,
    profiles: Vec<SignatureProfile>,
}

impl CertificateBundle {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(chain: Vec<MssCertificate>) -> Self {
        Self {
            chain,
            profiles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_profiles(mut self, profiles: Vec<SignatureProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// End-entity certificate, if any.
    #[must_use]
    pub fn certificate(&self) -> Option<&MssCertificate> {
        self.chain.first()
    }

    #[must_use]
    pub fn chain(&self) -> &[MssCertificate] {
        &self.chain
    }

    #[must_use]
    pub fn signature_profiles(&self) -> &[SignatureProfile] {
        &self.profiles
    }

    #[must_use]
    pub fn supports(&self, profile: &SignatureProfile) -> bool {
        self.profiles.contains(profile)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl fmt::Debug for CertificateBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CertificateBundle(chain_len={}, profiles={})",
            self.chain.len(),
            self.profiles.len()
        )
    }
}
