//! Status element and the profile-query extension it may carry.

use super::common::string_or_number;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
    #[serde(rename = "StatusMessage", skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(rename = "StatusDetail", skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<StatusDetail>,
}

impl Status {
    /// Status with just a code.
    #[must_use]
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            status_code: Some(StatusCode {
                value: Some(code.into()),
                status_code: None,
            }),
            ..Self::default()
        }
    }

    /// Top-level status code value.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.status_code.as_ref()?.value.as_deref()
    }

    /// Certificates listed in a profile-query extension.
    #[must_use]
    pub fn mobile_user_certificates(&self) -> &[MobileUserCertificate] {
        self.status_detail
            .as_ref()
            .and_then(|d| d.profile_query_extension.as_ref())
            .and_then(|ext| ext.mobile_user_certificate.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    #[serde(
        rename = "Value",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<Box<StatusCode>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDetail {
    #[serde(rename = "ProfileQueryExtension", skip_serializing_if = "Option::is_none")]
    pub profile_query_extension: Option<ProfileQueryExtension>,
    #[serde(rename = "StatusDetail", skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileQueryExtension {
    #[serde(rename = "MobileUserCertificate", skip_serializing_if = "Option::is_none")]
    pub mobile_user_certificate: Option<Vec<MobileUserCertificate>>,
    #[serde(rename = "AutoActivation", skip_serializing_if = "Option::is_none")]
    pub auto_activation: Option<bool>,
    #[serde(rename = "ServerSideSignature", skip_serializing_if = "Option::is_none")]
    pub server_side_signature: Option<bool>,
    #[serde(rename = "RecoveryCodeCreated", skip_serializing_if = "Option::is_none")]
    pub recovery_code_created: Option<bool>,
}

/// One certificate chain of a mobile user, as listed by a profile query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileUserCertificate {
    /// Base64 DER certificates, end-entity first.
    #[serde(rename = "X509Certificate", skip_serializing_if = "Option::is_none")]
    pub x509_certificate: Option<Vec<String>>,
    #[serde(rename = "X509SubjectName", skip_serializing_if = "Option::is_none")]
    pub x509_subject_name: Option<Vec<String>>,
    #[serde(rename = "Algorithm", skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(rename = "State", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "SignatureProfiles", skip_serializing_if = "Option::is_none")]
    pub signature_profiles: Option<Vec<String>>,
}
