//! Response messages and the response envelope.

use super::common::{ApInfo, MobileUser, MssSignature, MsspInfo};
use super::fault::Fault;
use super::registration::RegistrationResponse;
use super::services::ServiceResponse;
use super::status::Status;
use crate::domain::certificate::MssCertificate;
use crate::domain::constants::{services, status};
use crate::domain::signed_data;
use crate::domain::types::SignatureProfile;
use crate::infra::error::{MssError, MssResult};
use cms::signed_data::SignedData;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// `MSS_SignatureResp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResponse {
    #[serde(rename = "MajorVersion", skip_serializing_if = "Option::is_none")]
    pub major_version: Option<String>,
    #[serde(rename = "MinorVersion", skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<String>,
    #[serde(rename = "AP_Info", skip_serializing_if = "Option::is_none")]
    pub ap_info: Option<ApInfo>,
    #[serde(rename = "MSSP_Info", skip_serializing_if = "Option::is_none")]
    pub mssp_info: Option<MsspInfo>,
    #[serde(rename = "MSSP_TransID", skip_serializing_if = "Option::is_none")]
    pub mssp_trans_id: Option<String>,
    #[serde(rename = "MobileUser", skip_serializing_if = "Option::is_none")]
    pub mobile_user: Option<MobileUser>,
    #[serde(rename = "MSS_Signature", skip_serializing_if = "Option::is_none")]
    pub mss_signature: Option<MssSignature>,
    #[serde(rename = "SignatureProfile", skip_serializing_if = "Option::is_none")]
    pub signature_profile: Option<SignatureProfile>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(rename = "ServiceResponses", skip_serializing_if = "Option::is_none")]
    pub service_responses: Option<Vec<ServiceResponse>>,
}

impl SignatureResponse {
    #[must_use]
    pub fn status_code(&self) -> Option<&str> {
        self.status.as_ref()?.code()
    }

    /// True only for status `500` (signature) or `502` (valid signature).
    #[must_use]
    pub fn is_successful(&self) -> bool {
        matches!(
            self.status_code(),
            Some(status::SIGNATURE | status::VALID_SIGNATURE)
        )
    }

    #[must_use]
    pub fn service_responses(&self) -> &[ServiceResponse] {
        self.service_responses.as_deref().unwrap_or(&[])
    }

    /// Decoded `MSS_Signature` bytes.
    ///
    /// # Errors
    /// `ServiceUnavailable` when the response carries no signature.
    pub fn raw_signature(&self) -> MssResult<Vec<u8>> {
        self.mss_signature
            .as_ref()
            .ok_or_else(|| MssError::service_unavailable("Response carries no signature"))?
            .decode()
    }

    /// Batch sub-signatures keyed by their display text.
    ///
    /// Empty when the request carried no batch sub-requests. Entries without
    /// a display text or signature are skipped.
    ///
    /// # Errors
    /// Returns an internal error if a signature is not valid base64.
    pub fn batch_signatures(&self) -> MssResult<BTreeMap<String, Vec<u8>>> {
        let mut result = BTreeMap::new();
        let batch_responses = self
            .service_responses()
            .iter()
            .filter(|r| r.description.as_deref() == Some(services::BATCH_SIGN))
            .filter_map(|r| r.batch_signature_responses.as_deref())
            .flatten();
        for entry in batch_responses {
            let (Some(dtbd), Some(signature)) = (&entry.dtbd, &entry.mss_signature) else {
                log::debug!("Skipping incomplete batch signature entry");
                continue;
            };
            result.insert(dtbd.clone(), signature.decode()?);
        }
        Ok(result)
    }

    /// Parse the signature as CMS `SignedData`.
    ///
    /// # Errors
    /// Fails when there is no signature or it is not a `SignedData`
    /// structure (e.g. a PKCS#1 signature).
    pub fn signed_data(&self) -> MssResult<SignedData> {
        signed_data::parse_signed_data(&self.raw_signature()?)
    }

    /// Certificate of the signer embedded in a CMS signature.
    ///
    /// # Errors
    /// `InvalidSignature` when the signature embeds no certificate.
    pub fn signer_certificate(&self) -> MssResult<MssCertificate> {
        let signed = self.signed_data()?;
        signed_data::signer_certificate(&signed)
            .ok_or_else(|| MssError::invalid_signature("Signature carries no signer certificate"))
    }

    /// Named RDN of the signer's subject (`"cn"`, `"surname"`,
    /// `"serialNumber"`, a dotted OID, ...).
    ///
    /// # Errors
    /// See [`Self::signer_certificate`].
    pub fn subject_attribute(&self, name: &str) -> MssResult<Option<String>> {
        Ok(self.signer_certificate()?.subject_attribute(name))
    }
}

/// `MSS_ProfileResp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "MajorVersion", skip_serializing_if = "Option::is_none")]
    pub major_version: Option<String>,
    #[serde(rename = "MinorVersion", skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<String>,
    #[serde(rename = "MSSP_Info", skip_serializing_if = "Option::is_none")]
    pub mssp_info: Option<MsspInfo>,
    #[serde(rename = "SignatureProfile", skip_serializing_if = "Option::is_none")]
    pub signature_profile: Option<Vec<SignatureProfile>>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl ProfileResponse {
    #[must_use]
    pub fn status_code(&self) -> Option<&str> {
        self.status.as_ref()?.code()
    }

    #[must_use]
    pub fn signature_profiles(&self) -> &[SignatureProfile] {
        self.signature_profile.as_deref().unwrap_or(&[])
    }
}

/// `MSS_ReceiptResp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptResponse {
    #[serde(rename = "MSSP_Info", skip_serializing_if = "Option::is_none")]
    pub mssp_info: Option<MsspInfo>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(rename = "ServiceResponses", skip_serializing_if = "Option::is_none")]
    pub service_responses: Option<Vec<ServiceResponse>>,
}

/// `MSS_StatusResp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "MSSP_Info", skip_serializing_if = "Option::is_none")]
    pub mssp_info: Option<MsspInfo>,
    #[serde(rename = "MobileUser", skip_serializing_if = "Option::is_none")]
    pub mobile_user: Option<MobileUser>,
    #[serde(rename = "MSS_Signature", skip_serializing_if = "Option::is_none")]
    pub mss_signature: Option<MssSignature>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(rename = "ServiceResponses", skip_serializing_if = "Option::is_none")]
    pub service_responses: Option<Vec<ServiceResponse>>,
}

/// Known non-fault root keys.
const MESSAGE_ROOTS: [&str; 5] = [
    "MSS_SignatureResp",
    "MSS_StatusResp",
    "MSS_ReceiptResp",
    "MSS_ProfileResp",
    "MSS_RegistrationResp",
];

/// Decoded response. A fault is authoritative over any other root key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MssResponse {
    Fault(Fault),
    Signature(SignatureResponse),
    Status(StatusResponse),
    Receipt(ReceiptResponse),
    Profile(ProfileResponse),
    Registration(RegistrationResponse),
}

impl MssResponse {
    /// Decode a response body.
    ///
    /// A `Fault` root wins over everything else, whatever shape its
    /// siblings have. Otherwise exactly one known root key must be present.
    /// Unknown fields are ignored.
    ///
    /// # Errors
    /// `ServiceUnavailable` when the body is empty, not JSON (an HTML error
    /// page, say) or the message under the root key is malformed; internal
    /// error when no known root key, or more than one, is present.
    pub fn from_json(body: &str) -> MssResult<Self> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(MssError::service_unavailable("Received an empty response"));
        }
        if trimmed.starts_with('<') {
            return Err(not_json());
        }
        let value: Value = serde_json::from_str(trimmed).map_err(|e| {
            log::debug!("Response decode failed: {e}");
            not_json()
        })?;
        let envelope = match value {
            Value::Object(envelope) => envelope,
            Value::Null => return Err(MssError::service_unavailable("Received a null response")),
            _ => return Err(not_json()),
        };

        if let Some(fault) = envelope.get("Fault").filter(|f| !f.is_null()) {
            return Ok(Self::Fault(Fault::from_value(fault.clone())));
        }

        let mut found: Vec<(&str, &Value)> = MESSAGE_ROOTS
            .iter()
            .filter_map(|key| {
                envelope
                    .get(*key)
                    .filter(|v| !v.is_null())
                    .map(|v| (*key, v))
            })
            .collect();
        let (key, message) = match found.len() {
            0 => return Err(MssError::internal("Response carries no known message")),
            1 => found.remove(0),
            n => {
                return Err(MssError::internal(format!(
                    "Response carries {n} messages, expected one"
                )))
            }
        };
        decode_message(key, message.clone())
    }

    /// Root key used on the wire.
    #[must_use]
    pub fn root_key(&self) -> &'static str {
        match self {
            Self::Fault(_) => "Fault",
            Self::Signature(_) => "MSS_SignatureResp",
            Self::Status(_) => "MSS_StatusResp",
            Self::Receipt(_) => "MSS_ReceiptResp",
            Self::Profile(_) => "MSS_ProfileResp",
            Self::Registration(_) => "MSS_RegistrationResp",
        }
    }

    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    #[must_use]
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Fault(f) => Some(f),
            _ => None,
        }
    }

    /// Turn a fault into its typed error.
    ///
    /// # Errors
    /// The error derived from the fault code and detail.
    pub fn into_result(self) -> MssResult<Self> {
        match self {
            Self::Fault(fault) => Err(fault.to_error()),
            other => Ok(other),
        }
    }

    /// # Errors
    /// The fault's error, or `ServiceUnavailable` for any other message.
    pub fn into_signature(self) -> MssResult<SignatureResponse> {
        match self.into_result()? {
            Self::Signature(r) => Ok(r),
            other => Err(unexpected("MSS_SignatureResp", &other)),
        }
    }

    /// # Errors
    /// The fault's error, or `ServiceUnavailable` for any other message.
    pub fn into_profile(self) -> MssResult<ProfileResponse> {
        match self.into_result()? {
            Self::Profile(r) => Ok(r),
            other => Err(unexpected("MSS_ProfileResp", &other)),
        }
    }

    /// # Errors
    /// The fault's error, or `ServiceUnavailable` for any other message.
    pub fn into_registration(self) -> MssResult<RegistrationResponse> {
        match self.into_result()? {
            Self::Registration(r) => Ok(r),
            other => Err(unexpected("MSS_RegistrationResp", &other)),
        }
    }

    /// Serialize to a JSON body with a single root key.
    ///
    /// # Errors
    /// Returns an internal error if serialization fails.
    pub fn to_json(&self) -> MssResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for MssResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        let key = self.root_key();
        match self {
            Self::Fault(r) => map.serialize_entry(key, r)?,
            Self::Signature(r) => map.serialize_entry(key, r)?,
            Self::Status(r) => map.serialize_entry(key, r)?,
            Self::Receipt(r) => map.serialize_entry(key, r)?,
            Self::Profile(r) => map.serialize_entry(key, r)?,
            Self::Registration(r) => map.serialize_entry(key, r)?,
        }
        map.end()
    }
}

fn decode_message(key: &str, message: Value) -> MssResult<MssResponse> {
    let malformed = |e: serde_json::Error| {
        MssError::service_unavailable(format!("Received a malformed {key}: {e}"))
    };
    Ok(match key {
        "MSS_SignatureResp" => {
            MssResponse::Signature(serde_json::from_value(message).map_err(malformed)?)
        }
        "MSS_StatusResp" => MssResponse::Status(serde_json::from_value(message).map_err(malformed)?),
        "MSS_ReceiptResp" => {
            MssResponse::Receipt(serde_json::from_value(message).map_err(malformed)?)
        }
        "MSS_ProfileResp" => {
            MssResponse::Profile(serde_json::from_value(message).map_err(malformed)?)
        }
        _ => MssResponse::Registration(serde_json::from_value(message).map_err(malformed)?),
    })
}

fn not_json() -> MssError {
    MssError::service_unavailable(
        "Received a response that is not JSON, check the service URL",
    )
}

fn unexpected(expected: &str, got: &MssResponse) -> MssError {
    MssError::service_unavailable(format!(
        "Expected {expected}, received {}",
        got.root_key()
    ))
}
