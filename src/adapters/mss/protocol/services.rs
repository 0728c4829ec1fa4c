//! Additional services attached to signature requests, and the service
//! responses that come back.

use super::common::{Data, MssSignature};
use super::status::Status;
use crate::domain::constants::{mime, services};
use crate::domain::dtbs::Dtbs;
use serde::{Deserialize, Serialize};

/// One entry of `AdditionalServices`. `Description` names the service;
/// at most one of the body fields is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalService {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "EventID", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<ValueElement>,
    #[serde(rename = "NoSpamCode", skip_serializing_if = "Option::is_none")]
    pub no_spam_code: Option<NoSpamCode>,
    #[serde(rename = "UserLang", skip_serializing_if = "Option::is_none")]
    pub user_lang: Option<ValueElement>,
    #[serde(rename = "BatchSignatureRequest", skip_serializing_if = "Option::is_none")]
    pub batch_signature_request: Option<BatchSignatureRequest>,
}

impl AdditionalService {
    /// Service identified only by its description URI.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Ask the MSSP to validate the signature before returning it.
    #[must_use]
    pub fn validation() -> Self {
        Self::new(services::VALIDATE)
    }

    #[must_use]
    pub fn ficom_validation() -> Self {
        Self::new(services::FICOM_VALIDATE)
    }

    /// Ask the MSSP to return the signer's person identity.
    #[must_use]
    pub fn person_identity() -> Self {
        Self::new(services::PERSON_ID)
    }

    /// Ask the MSSP to return the signer's display name.
    #[must_use]
    pub fn display_name() -> Self {
        Self::new(services::DISPLAY_NAME)
    }

    /// Event ID shown to the user on the phone.
    #[must_use]
    pub fn event_id(event_id: impl Into<String>) -> Self {
        Self {
            event_id: Some(ValueElement::new(event_id)),
            ..Self::new(services::EVENT_ID)
        }
    }

    /// Anti-spam code the user must know (and optionally the MSSP verifies).
    #[must_use]
    pub fn no_spam(verify: bool, code: impl Into<String>) -> Self {
        Self {
            no_spam_code: Some(NoSpamCode::new(verify, code)),
            ..Self::new(services::NO_SPAM)
        }
    }

    /// Language for the messages shown to the user.
    #[must_use]
    pub fn user_lang(language: impl Into<String>) -> Self {
        Self {
            user_lang: Some(ValueElement::new(language)),
            ..Self::new(services::USER_LANG)
        }
    }

    /// Extra signature in a batch-signature session.
    #[must_use]
    pub fn batch_signature(dtbs: &Dtbs, dtbd: impl Into<String>) -> Self {
        Self {
            batch_signature_request: Some(BatchSignatureRequest::new(dtbs, dtbd)),
            ..Self::new(services::BATCH_SIGN)
        }
    }

    #[must_use]
    pub fn is_batch_signature(&self) -> bool {
        self.description == services::BATCH_SIGN
    }
}

/// `{"Value": ...}` element used by several services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueElement {
    #[serde(rename = "Value")]
    pub value: String,
}

impl ValueElement {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoSpamCode {
    /// `"yes"` or `"no"`.
    #[serde(rename = "Verify")]
    pub verify: String,
    #[serde(rename = "Code")]
    pub code: String,
}

impl NoSpamCode {
    #[must_use]
    pub fn new(verify: bool, code: impl Into<String>) -> Self {
        Self {
            verify: if verify { "yes" } else { "no" }.to_string(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSignatureRequest {
    #[serde(rename = "DataToBeSigned")]
    pub data_to_be_signed: Data,
    #[serde(rename = "DataToBeDisplayed")]
    pub data_to_be_displayed: Data,
}

impl BatchSignatureRequest {
    /// Sub-request. Text payloads without a MIME type are sent as `text/plain`.
    #[must_use]
    pub fn new(dtbs: &Dtbs, dtbd: impl Into<String>) -> Self {
        let mut data = Data::from(dtbs);
        if data.mime_type.is_none() {
            data.mime_type = Some(mime::TEXT_PLAIN.to_string());
        }
        Self {
            data_to_be_signed: data,
            data_to_be_displayed: Data::text(dtbd),
        }
    }
}

/// Outcome of one additional service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(rename = "Roles", skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(rename = "BatchSignatureResponses", skip_serializing_if = "Option::is_none")]
    pub batch_signature_responses: Option<Vec<BatchSignatureResponse>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSignatureResponse {
    #[serde(rename = "MSS_Signature", skip_serializing_if = "Option::is_none")]
    pub mss_signature: Option<MssSignature>,
    #[serde(rename = "DTBD", skip_serializing_if = "Option::is_none")]
    pub dtbd: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_spam_service_wire_shape() {
        let service = AdditionalService::no_spam(true, "A12");
        assert_eq!(
            serde_json::to_value(&service).unwrap(),
            json!({
                "Description": "http://mss.ficom.fi/TS102204/v1.0.0#noSpam",
                "NoSpamCode": {"Verify": "yes", "Code": "A12"}
            })
        );
    }

    #[test]
    fn test_batch_signature_wire_shape() {
        let service = AdditionalService::batch_signature(&Dtbs::text("test2"), "test2");
        assert!(service.is_batch_signature());
        assert_eq!(
            serde_json::to_value(&service).unwrap(),
            json!({
                "Description": "http://www.methics.fi/KiuruMSSP/v5.0.0#batchsign",
                "BatchSignatureRequest": {
                    "DataToBeSigned": {"MimeType": "text/plain", "Encoding": "UTF-8", "Data": "test2"},
                    "DataToBeDisplayed": {"Data": "test2"}
                }
            })
        );
    }

    #[test]
    fn test_event_id_and_user_lang() {
        let v = serde_json::to_value(AdditionalService::event_id("ABC1")).unwrap();
        assert_eq!(v["EventID"]["Value"], "ABC1");
        let v = serde_json::to_value(AdditionalService::user_lang("fi")).unwrap();
        assert_eq!(v["UserLang"]["Value"], "fi");
        assert_eq!(
            v["Description"],
            "http://mss.ficom.fi/TS102204/v1.0.0#userLang"
        );
    }
}
