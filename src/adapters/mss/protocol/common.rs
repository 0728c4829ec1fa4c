//! Building blocks shared by requests and responses.

use crate::domain::dtbs::Dtbs;
use crate::domain::types::Identity;
use crate::infra::error::{MssError, MssResult};
use serde::{Deserialize, Deserializer, Serialize};

/// Application Provider identification stamped on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApInfo {
    #[serde(rename = "AP_ID", skip_serializing_if = "Option::is_none")]
    pub ap_id: Option<String>,
    #[serde(rename = "AP_PWD", skip_serializing_if = "Option::is_none")]
    pub ap_pwd: Option<String>,
    #[serde(rename = "AP_TransID", skip_serializing_if = "Option::is_none")]
    pub ap_trans_id: Option<String>,
    #[serde(rename = "Instant", skip_serializing_if = "Option::is_none")]
    pub instant: Option<String>,
}

impl ApInfo {
    /// New AP_Info with a fresh transaction ID (`A` + UUID v4) and the
    /// current instant.
    #[must_use]
    pub fn new(ap_id: impl Into<String>, ap_pwd: impl Into<String>) -> Self {
        Self {
            ap_id: Some(ap_id.into()),
            ap_pwd: Some(ap_pwd.into()),
            ap_trans_id: Some(new_transaction_id()),
            instant: Some(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
        }
    }
}

/// Generate an AP transaction ID.
#[must_use]
pub fn new_transaction_id() -> String {
    format!("A{}", uuid::Uuid::new_v4())
}

/// Mobile user addressed by a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileUser {
    #[serde(rename = "MSISDN", skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    #[serde(rename = "UserIdentifier", skip_serializing_if = "Option::is_none")]
    pub user_identifier: Option<String>,
}

impl MobileUser {
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        match (&self.msisdn, &self.user_identifier) {
            (Some(m), _) => Some(Identity::Msisdn(m.clone())),
            (None, Some(u)) => Some(Identity::UserIdentifier(u.clone())),
            (None, None) => None,
        }
    }
}

impl From<&Identity> for MobileUser {
    fn from(identity: &Identity) -> Self {
        match identity {
            Identity::Msisdn(m) => Self {
                msisdn: Some(m.clone()),
                user_identifier: None,
            },
            Identity::UserIdentifier(u) => Self {
                msisdn: None,
                user_identifier: Some(u.clone()),
            },
        }
    }
}

/// `DataToBeSigned` / `DataToBeDisplayed` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    #[serde(rename = "MimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(rename = "Encoding", skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(rename = "Data", skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Data {
    /// Display text; only the `Data` field is populated.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            data: Some(text.into()),
            ..Self::default()
        }
    }
}

impl From<&Dtbs> for Data {
    fn from(dtbs: &Dtbs) -> Self {
        Self {
            mime_type: dtbs.mime_type().map(str::to_string),
            encoding: Some(dtbs.encoding().to_string()),
            data: Some(dtbs.wire_data()),
        }
    }
}

/// Signature element of a signature response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MssSignature {
    #[serde(rename = "Base64Signature", skip_serializing_if = "Option::is_none")]
    pub base64_signature: Option<String>,
}

impl MssSignature {
    #[must_use]
    pub fn from_bytes(signature: &[u8]) -> Self {
        use base64::Engine;
        Self {
            base64_signature: Some(base64::engine::general_purpose::STANDARD.encode(signature)),
        }
    }

    /// Decode the raw signature bytes.
    ///
    /// # Errors
    /// Returns `ServiceUnavailable` when no signature is present and an
    /// internal error on invalid base64.
    pub fn decode(&self) -> MssResult<Vec<u8>> {
        use base64::Engine;
        let b64 = self
            .base64_signature
            .as_deref()
            .ok_or_else(|| MssError::service_unavailable("Response carries no signature"))?;
        Ok(base64::engine::general_purpose::STANDARD.decode(b64.trim())?)
    }
}

/// MSSP node identification carried in responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsspInfo {
    #[serde(rename = "Instant", skip_serializing_if = "Option::is_none")]
    pub instant: Option<String>,
    #[serde(rename = "MSSP_ID", skip_serializing_if = "Option::is_none")]
    pub mssp_id: Option<MeshMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshMember {
    #[serde(rename = "URI", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "DNSName", skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    #[serde(rename = "IPAddress", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(rename = "IdentifierString", skip_serializing_if = "Option::is_none")]
    pub identifier_string: Option<String>,
}

/// Accept a code that the server may send either as a JSON string or number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_format() {
        let id = new_transaction_id();
        assert!(id.starts_with('A'));
        assert_eq!(id.len(), 37);
        assert_ne!(id, new_transaction_id());
    }

    #[test]
    fn test_mobile_user_serializes_only_populated_field() {
        let user = MobileUser::from(&Identity::Msisdn("+35847001001".into()));
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"MSISDN": "+35847001001"}));
        assert_eq!(user.identity(), Some(Identity::Msisdn("+35847001001".into())));
    }

    #[test]
    fn test_signature_decode() {
        let sig = MssSignature::from_bytes(b"sig");
        assert_eq!(sig.decode().unwrap(), b"sig");

        let err = MssSignature::default().decode().unwrap_err();
        assert_eq!(err.code(), "780");
    }
}
