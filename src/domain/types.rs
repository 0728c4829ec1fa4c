//! Type-safe wrappers using the new-type pattern.
//!
//! Subscriber identities, signature profiles, service endpoints and
//! signature formats are all plain strings on the wire; wrapping them keeps
//! them from being mixed up at call sites.

use crate::domain::constants::{formats, profiles};
use crate::infra::error::{MssError, MssResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mobile subscriber targeted by a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Phone number in international format (e.g. `+35847001001`).
    Msisdn(String),
    /// Opaque identifier assigned by the MSSP.
    UserIdentifier(String),
}

impl Identity {
    /// Create an MSISDN identity. Fails on an empty value.
    pub fn msisdn(value: impl Into<String>) -> MssResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(MssError::missing_parameter("Empty MSISDN"));
        }
        Ok(Self::Msisdn(value))
    }

    /// Create a user-identifier identity. Fails on an empty value.
    pub fn user_identifier(value: impl Into<String>) -> MssResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(MssError::missing_parameter("Empty UserIdentifier"));
        }
        Ok(Self::UserIdentifier(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Msisdn(v) | Self::UserIdentifier(v) => v,
        }
    }
}

impl FromStr for Identity {
    type Err = MssError;

    /// Parses `uid:<value>` as a user identifier, anything else as an MSISDN.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("uid:") {
            Some(uid) => Self::user_identifier(uid),
            None => Self::msisdn(s),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URI naming a signing purpose. Equality is by URI string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureProfile(String);

impl SignatureProfile {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Profile used for authentication (digital signature key usage).
    #[must_use]
    pub fn authentication() -> Self {
        Self::new(profiles::AUTHENTICATION)
    }

    /// Profile used for qualified signing (non-repudiation key usage).
    #[must_use]
    pub fn signing() -> Self {
        Self::new(profiles::SIGNING)
    }

    #[must_use]
    pub fn as_uri(&self) -> &str {
        &self.0
    }

    /// A profile with an empty URI is treated as absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for SignatureProfile {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl fmt::Display for SignatureProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoding of the signature value returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MssFormat {
    /// CMS SignedData (ETSI TS 102 204 `CMS-Signature`).
    Cms,
    /// PKCS#7 SignedData.
    Pkcs7,
    /// Raw PKCS#1 signature in the Kiuru vendor format.
    KiuruPkcs1,
    /// Raw PKCS#1 signature in the FiCom format.
    FicomPkcs1,
    /// Any other format URI.
    Custom(String),
}

impl MssFormat {
    #[must_use]
    pub fn as_uri(&self) -> &str {
        match self {
            Self::Cms => formats::CMS,
            Self::Pkcs7 => formats::PKCS7,
            Self::KiuruPkcs1 => formats::KIURU_PKCS1,
            Self::FicomPkcs1 => formats::FICOM_PKCS1,
            Self::Custom(uri) => uri,
        }
    }

    #[must_use]
    pub fn from_uri(uri: &str) -> Self {
        match uri {
            formats::CMS => Self::Cms,
            formats::PKCS7 => Self::Pkcs7,
            formats::KIURU_PKCS1 => Self::KiuruPkcs1,
            formats::FICOM_PKCS1 => Self::FicomPkcs1,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Whether the returned signature is a CMS/PKCS#7 SignedData structure.
    #[must_use]
    pub fn is_signed_data(&self) -> bool {
        matches!(self, Self::Cms | Self::Pkcs7)
    }
}

impl fmt::Display for MssFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_uri())
    }
}

/// Validated MSS REST endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrl(url::Url);

impl ServiceUrl {
    /// Parse and validate an endpoint URL (http or https only).
    pub fn new(url: impl AsRef<str>) -> MssResult<Self> {
        let raw = url.as_ref();
        let parsed = url::Url::parse(raw)
            .map_err(|e| MssError::wrong_parameter(format!("Invalid service URL {raw}: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(MssError::wrong_parameter(format!(
                    "Service URL must use http or https, got {other}: {raw}"
                )))
            }
        }
        if parsed.host_str().is_none() {
            return Err(MssError::wrong_parameter(format!(
                "Service URL has no host: {raw}"
            )));
        }
        Ok(Self(parsed))
    }

    #[must_use]
    pub fn as_url(&self) -> &url::Url {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for ServiceUrl {
    type Err = MssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
