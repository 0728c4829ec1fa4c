//! Request messages and the request envelope.

use super::common::{ApInfo, Data, MobileUser};
use super::registration::RegistrationRequest;
use super::services::AdditionalService;
use crate::domain::constants::{MAJOR_VERSION, MAX_BATCH_SIGNATURES, MESSAGING_MODE_SYNCH, MINOR_VERSION};
use crate::domain::dtbs::Dtbs;
use crate::domain::types::{Identity, MssFormat, SignatureProfile};
use crate::infra::error::{MssError, MssResult};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

/// `MSS_SignatureReq`: signature or authentication request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequest {
    #[serde(rename = "MajorVersion")]
    pub major_version: String,
    #[serde(rename = "MinorVersion")]
    pub minor_version: String,
    #[serde(rename = "AP_Info", skip_serializing_if = "Option::is_none")]
    pub ap_info: Option<ApInfo>,
    #[serde(rename = "MessagingMode")]
    pub messaging_mode: String,
    #[serde(rename = "ValidityDate", skip_serializing_if = "Option::is_none")]
    pub validity_date: Option<String>,
    #[serde(rename = "TimeOut", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(rename = "SignatureProfile", skip_serializing_if = "Option::is_none")]
    pub signature_profile: Option<SignatureProfile>,
    #[serde(rename = "MobileUser")]
    pub mobile_user: MobileUser,
    #[serde(rename = "DataToBeSigned")]
    pub data_to_be_signed: Data,
    #[serde(rename = "DataToBeDisplayed", skip_serializing_if = "Option::is_none")]
    pub data_to_be_displayed: Option<Data>,
    #[serde(
        rename = "AdditionalServices",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub additional_services: Vec<AdditionalService>,
    #[serde(rename = "MSS_Format", skip_serializing_if = "Option::is_none")]
    pub mss_format: Option<String>,
}

impl SignatureRequest {
    #[must_use]
    pub fn builder() -> SignatureRequestBuilder {
        SignatureRequestBuilder::default()
    }

    /// Display texts of the batch sub-requests, in request order.
    #[must_use]
    pub fn batch_display_texts(&self) -> Vec<&str> {
        self.additional_services
            .iter()
            .filter_map(|s| s.batch_signature_request.as_ref())
            .filter_map(|b| b.data_to_be_displayed.data.as_deref())
            .collect()
    }
}

/// Builder producing a validated [`SignatureRequest`].
///
/// `AP_Info` is stamped by the client when the request is sent.
#[derive(Debug, Clone, Default)]
pub struct SignatureRequestBuilder {
    identity: Option<Identity>,
    dtbs: Option<Dtbs>,
    dtbd: Option<String>,
    profile: Option<SignatureProfile>,
    format: Option<MssFormat>,
    timeout: Option<Duration>,
    validity_date: Option<String>,
    services: Vec<AdditionalService>,
    batch: Vec<(Dtbs, String)>,
}

impl SignatureRequestBuilder {
    #[must_use]
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    #[must_use]
    pub fn with_dtbs(mut self, dtbs: Dtbs) -> Self {
        self.dtbs = Some(dtbs);
        self
    }

    #[must_use]
    pub fn with_dtbd(mut self, dtbd: impl Into<String>) -> Self {
        self.dtbd = Some(dtbd.into());
        self
    }

    /// Empty profiles are ignored.
    #[must_use]
    pub fn with_signature_profile(mut self, profile: SignatureProfile) -> Self {
        if !profile.is_empty() {
            self.profile = Some(profile);
        }
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: MssFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// How long the MSSP waits for the user (sent as milliseconds).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_validity_date(mut self, validity_date: impl Into<String>) -> Self {
        self.validity_date = Some(validity_date.into());
        self
    }

    #[must_use]
    pub fn with_additional_service(mut self, service: AdditionalService) -> Self {
        self.services.push(service);
        self
    }

    /// Attach a batch sub-signature to the same session.
    #[must_use]
    pub fn with_batch_signature(mut self, dtbd: impl Into<String>, dtbs: Dtbs) -> Self {
        self.batch.push((dtbs, dtbd.into()));
        self
    }

    /// Validate and build the request.
    ///
    /// # Errors
    /// `MissingParameter` when the identity or DTBS is absent;
    /// `WrongParameter` when more than the allowed number of batch
    /// sub-requests is attached.
    pub fn build(self) -> MssResult<SignatureRequest> {
        let identity = self
            .identity
            .ok_or_else(|| MssError::missing_parameter("MobileUser is required"))?;
        let dtbs = self
            .dtbs
            .ok_or_else(|| MssError::missing_parameter("DataToBeSigned is required"))?;

        if self.batch.len() > MAX_BATCH_SIGNATURES {
            return Err(MssError::wrong_parameter(format!(
                "At most {MAX_BATCH_SIGNATURES} batch signatures allowed, got {}",
                self.batch.len()
            )));
        }

        let mut additional_services = self.services;
        additional_services.extend(
            self.batch
                .iter()
                .map(|(dtbs, dtbd)| AdditionalService::batch_signature(dtbs, dtbd.clone())),
        );

        Ok(SignatureRequest {
            major_version: MAJOR_VERSION.to_string(),
            minor_version: MINOR_VERSION.to_string(),
            ap_info: None,
            messaging_mode: MESSAGING_MODE_SYNCH.to_string(),
            validity_date: self.validity_date,
            timeout: self.timeout.map(|t| t.as_millis().to_string()),
            signature_profile: self.profile,
            mobile_user: MobileUser::from(&identity),
            data_to_be_signed: Data::from(&dtbs),
            data_to_be_displayed: self.dtbd.map(Data::text),
            additional_services,
            mss_format: self.format.map(|f| f.as_uri().to_string()),
        })
    }
}

/// `MSS_ProfileReq`: certificate/profile query for a mobile user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRequest {
    #[serde(rename = "MajorVersion")]
    pub major_version: String,
    #[serde(rename = "MinorVersion")]
    pub minor_version: String,
    #[serde(rename = "AP_Info", skip_serializing_if = "Option::is_none")]
    pub ap_info: Option<ApInfo>,
    #[serde(rename = "MobileUser")]
    pub mobile_user: MobileUser,
    #[serde(rename = "Params", skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
}

impl ProfileRequest {
    #[must_use]
    pub fn new(identity: &Identity) -> Self {
        Self {
            major_version: MAJOR_VERSION.to_string(),
            minor_version: MINOR_VERSION.to_string(),
            ap_info: None,
            mobile_user: MobileUser::from(identity),
            params: None,
        }
    }
}

/// Request envelope. Exactly one message is carried; it is serialized as a
/// JSON object with a single root key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MssRequest {
    Signature(SignatureRequest),
    Authentication(SignatureRequest),
    ProfileQuery(ProfileRequest),
    Registration(RegistrationRequest),
}

impl MssRequest {
    /// Root key used on the wire.
    #[must_use]
    pub fn root_key(&self) -> &'static str {
        match self {
            Self::Signature(_) | Self::Authentication(_) => "MSS_SignatureReq",
            Self::ProfileQuery(_) => "MSS_ProfileReq",
            Self::Registration(_) => "MSS_RegistrationReq",
        }
    }

    #[must_use]
    pub fn ap_info(&self) -> Option<&ApInfo> {
        match self {
            Self::Signature(r) | Self::Authentication(r) => r.ap_info.as_ref(),
            Self::ProfileQuery(r) => r.ap_info.as_ref(),
            Self::Registration(r) => r.ap_info.as_ref(),
        }
    }

    pub(crate) fn set_ap_info(&mut self, ap_info: ApInfo) {
        match self {
            Self::Signature(r) | Self::Authentication(r) => r.ap_info = Some(ap_info),
            Self::ProfileQuery(r) => r.ap_info = Some(ap_info),
            Self::Registration(r) => r.ap_info = Some(ap_info),
        }
    }

    /// Serialize to the JSON request body.
    ///
    /// # Errors
    /// Returns an internal error if serialization fails.
    pub fn to_json(&self) -> MssResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for MssRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Signature(r) | Self::Authentication(r) => map.serialize_entry(self.root_key(), r)?,
            Self::ProfileQuery(r) => map.serialize_entry(self.root_key(), r)?,
            Self::Registration(r) => map.serialize_entry(self.root_key(), r)?,
        }
        map.end()
    }
}
