//! Registration (MReg) use-case messages.

use super::common::{ApInfo, MsspInfo};
use super::status::Status;
use crate::domain::constants::{status, MAJOR_VERSION, MINOR_VERSION};
use crate::infra::error::{MssError, MssResult};
use serde::{Deserialize, Serialize};

/// Named registration parameter (input or output of a use case).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Value", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "Required", skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(rename = "Encoding", skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(rename = "MimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Param {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Value as text; empty when absent.
    #[must_use]
    pub fn string_value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Value as an integer, `None` if it does not parse.
    #[must_use]
    pub fn int_value(&self) -> Option<i64> {
        self.string_value().trim().parse().ok()
    }

    #[must_use]
    pub fn bool_value(&self) -> bool {
        self.string_value().trim().eq_ignore_ascii_case("true")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Outputs", skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Param>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "NameSpace", skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(rename = "SessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(rename = "Inputs", skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<Param>>,
    #[serde(rename = "Groups", skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
    #[serde(rename = "Outputs", skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Param>>,
}

/// `MSS_RegistrationReq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(rename = "MajorVersion")]
    pub major_version: String,
    #[serde(rename = "MinorVersion")]
    pub minor_version: String,
    #[serde(rename = "AP_Info", skip_serializing_if = "Option::is_none")]
    pub ap_info: Option<ApInfo>,
    #[serde(rename = "UseCase")]
    pub use_case: UseCase,
}

impl RegistrationRequest {
    #[must_use]
    pub fn builder(namespace: impl Into<String>, name: impl Into<String>) -> RegistrationRequestBuilder {
        RegistrationRequestBuilder::new(namespace, name)
    }
}

/// Builder for [`RegistrationRequest`].
#[derive(Debug, Clone)]
pub struct RegistrationRequestBuilder {
    namespace: String,
    name: String,
    inputs: Vec<Param>,
}

impl RegistrationRequestBuilder {
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            inputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.push(Param::new(name, value));
        self
    }

    #[must_use]
    pub fn with_target_msisdn(self, msisdn: impl Into<String>) -> Self {
        self.with_param("targetmsisdn", msisdn)
    }

    #[must_use]
    pub fn with_target_iccid(self, iccid: impl Into<String>) -> Self {
        self.with_param("targeticcid", iccid)
    }

    #[must_use]
    pub fn with_target_imsi(self, imsi: impl Into<String>) -> Self {
        self.with_param("targetimsi", imsi)
    }

    #[must_use]
    pub fn with_target_ap_id(self, ap_id: impl Into<String>) -> Self {
        self.with_param("targetapid", ap_id)
    }

    /// # Errors
    /// `MissingParameter` when the use-case name or namespace is empty.
    pub fn build(self) -> MssResult<RegistrationRequest> {
        if self.name.trim().is_empty() {
            return Err(MssError::missing_parameter("UseCase name is required"));
        }
        if self.namespace.trim().is_empty() {
            return Err(MssError::missing_parameter("UseCase namespace is required"));
        }
        Ok(RegistrationRequest {
            major_version: MAJOR_VERSION.to_string(),
            minor_version: MINOR_VERSION.to_string(),
            ap_info: None,
            use_case: UseCase {
                name: Some(self.name),
                namespace: Some(self.namespace),
                inputs: Some(self.inputs),
                ..UseCase::default()
            },
        })
    }
}

/// `MSS_RegistrationResp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    #[serde(rename = "MSSP_Info", skip_serializing_if = "Option::is_none")]
    pub mssp_info: Option<MsspInfo>,
    #[serde(rename = "UseCase", skip_serializing_if = "Option::is_none")]
    pub use_case: Option<UseCase>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl RegistrationResponse {
    #[must_use]
    pub fn status_code(&self) -> Option<&str> {
        self.status.as_ref()?.code()
    }

    /// True iff the status code is `"100"`.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.status_code() == Some(status::REQUEST_OK)
    }

    #[must_use]
    pub fn outputs(&self) -> &[Param] {
        self.use_case
            .as_ref()
            .and_then(|u| u.outputs.as_deref())
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        self.use_case
            .as_ref()
            .and_then(|u| u.groups.as_deref())
            .unwrap_or(&[])
    }

    /// First output with the given name.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<&Param> {
        self.outputs()
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_target_params() {
        let request = RegistrationRequest::builder("http://mss.example.com/mreg", "ActivateUser")
            .with_target_msisdn("+35847001001")
            .with_target_ap_id("http://ap.example.com")
            .with_param("Language", "fi")
            .build()
            .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["UseCase"],
            json!({
                "Name": "ActivateUser",
                "NameSpace": "http://mss.example.com/mreg",
                "Inputs": [
                    {"Name": "targetmsisdn", "Value": "+35847001001"},
                    {"Name": "targetapid", "Value": "http://ap.example.com"},
                    {"Name": "Language", "Value": "fi"}
                ]
            })
        );
    }

    #[test]
    fn test_builder_requires_name() {
        let err = RegistrationRequest::builder("ns", " ").build().unwrap_err();
        assert_eq!(err.code(), "102");
    }

    #[test]
    fn test_response_accessors() {
        let response: RegistrationResponse = serde_json::from_value(json!({
            "UseCase": {
                "Name": "ActivateUser",
                "Outputs": [{"Name": "Code", "Value": "42"}, {"Name": "Done", "Value": "TRUE"}],
                "Groups": [{"Name": "g1", "Outputs": []}]
            },
            "Status": {"StatusCode": {"Value": "100"}}
        }))
        .unwrap();
        assert!(response.is_successful());
        assert_eq!(response.output("Code").and_then(Param::int_value), Some(42));
        assert!(response.output("Done").is_some_and(Param::bool_value));
        assert_eq!(response.groups().len(), 1);

        let failed = RegistrationResponse {
            status: Some(Status::with_code("101")),
            ..RegistrationResponse::default()
        };
        assert!(!failed.is_successful());
        assert!(failed.outputs().is_empty());
    }
}
