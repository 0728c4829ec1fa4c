//! SOAP-style fault envelope and fault-code derivation.

use super::common::string_or_number;
use crate::infra::error::{codes, MssError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fault returned instead of a regular response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    #[serde(rename = "Code", skip_serializing_if = "Option::is_none")]
    pub code: Option<FaultCode>,
    #[serde(rename = "Reason", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "Node", skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(rename = "Role", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "Detail", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "Details", skip_serializing_if = "Option::is_none")]
    pub details: Option<FaultDetails>,
    #[serde(rename = "Help", skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(rename = "SessionID", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(rename = "RollbackFault", skip_serializing_if = "Option::is_none")]
    pub rollback_fault: Option<Box<Fault>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultCode {
    #[serde(
        rename = "Value",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    #[serde(rename = "ValueNs", skip_serializing_if = "Option::is_none")]
    pub value_ns: Option<String>,
    #[serde(rename = "SubCode", skip_serializing_if = "Option::is_none")]
    pub sub_code: Option<Box<FaultCode>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultDetails {
    #[serde(rename = "FaultURL", skip_serializing_if = "Option::is_none")]
    pub fault_url: Option<String>,
    #[serde(rename = "Hostname", skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(rename = "FaultNode", skip_serializing_if = "Option::is_none")]
    pub fault_node: Option<String>,
    #[serde(rename = "HttpErrorCode", skip_serializing_if = "Option::is_none")]
    pub http_error_code: Option<String>,
}

impl Fault {
    /// Build a fault with a sub-code, as the MSSP reports application errors.
    #[must_use]
    pub fn with_code(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: Some(FaultCode {
                value: Some("env:Receiver".to_string()),
                value_ns: None,
                sub_code: Some(Box::new(FaultCode {
                    value: Some(code.into()),
                    value_ns: None,
                    sub_code: None,
                })),
            }),
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Decode a fault element, keeping every field that decodes.
    ///
    /// Fields of an unexpected shape (a plain-text `Details`, say) are
    /// dropped instead of failing the whole fault.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<Self>(value.clone()) {
            Ok(fault) => fault,
            Err(e) => {
                log::debug!("Decoding fault leniently: {e}");
                Self {
                    code: lenient_field(&value, "Code"),
                    reason: lenient_field(&value, "Reason"),
                    node: lenient_field(&value, "Node"),
                    role: lenient_field(&value, "Role"),
                    detail: lenient_field(&value, "Detail"),
                    details: lenient_field(&value, "Details"),
                    help: lenient_field(&value, "Help"),
                    session_id: lenient_field(&value, "SessionID"),
                    rollback_fault: value
                        .get("RollbackFault")
                        .filter(|v| v.is_object())
                        .map(|v| Box::new(Self::from_value(v.clone()))),
                }
            }
        }
    }

    /// Client-visible fault code.
    ///
    /// Takes `Code.SubCode.Value`, else `Code.Value`, else `"900"`, then
    /// strips every underscore (`"1_09"` becomes `"109"`).
    #[must_use]
    pub fn fault_code(&self) -> String {
        let raw = self
            .code
            .as_ref()
            .and_then(|code| {
                code.sub_code
                    .as_ref()
                    .and_then(|sub| non_empty(sub.value.as_deref()))
                    .or_else(|| non_empty(code.value.as_deref()))
            })
            .unwrap_or(codes::INTERNAL_ERROR);
        raw.replace('_', "")
    }

    /// `Reason`, or `INTERNAL_ERROR` when absent.
    #[must_use]
    pub fn fault_message(&self) -> &str {
        non_empty(self.reason.as_deref()).unwrap_or("INTERNAL_ERROR")
    }

    /// `Detail`, else `Reason`, else a generic text.
    #[must_use]
    pub fn fault_detail(&self) -> &str {
        non_empty(self.detail.as_deref())
            .or_else(|| non_empty(self.reason.as_deref()))
            .unwrap_or("Operation failed")
    }

    #[must_use]
    pub fn to_error(&self) -> MssError {
        MssError::new(self.fault_code(), self.fault_detail())
    }
}

fn lenient_field<T: DeserializeOwned>(value: &Value, key: &str) -> Option<T> {
    value
        .get(key)
        .and_then(|field| serde_json::from_value(field.clone()).ok())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Fault {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sub_code_wins_and_underscores_are_stripped() {
        let fault = parse(r#"{"Code":{"Value":"env:Receiver","SubCode":{"Value":"1_09"}}}"#);
        assert_eq!(fault.fault_code(), "109");
    }

    #[test]
    fn test_falls_back_to_code_value() {
        let fault = parse(r#"{"Code":{"Value":"900"}}"#);
        assert_eq!(fault.fault_code(), "900");

        let fault = parse(r#"{"Code":{"Value":"105","SubCode":{}}}"#);
        assert_eq!(fault.fault_code(), "105");
    }

    #[test]
    fn test_empty_fault_defaults_to_internal_error() {
        assert_eq!(parse("{}").fault_code(), "900");
        assert_eq!(parse(r#"{"Code":null}"#).fault_code(), "900");
        assert_eq!(parse("{}").fault_message(), "INTERNAL_ERROR");
        assert_eq!(parse("{}").fault_detail(), "Operation failed");
    }

    #[test]
    fn test_numeric_code_accepted() {
        let fault = parse(r#"{"Code":{"SubCode":{"Value":105}},"Reason":"Unknown user"}"#);
        let err = fault.to_error();
        assert_eq!(err.code(), "105");
        assert_eq!(err.message(), "Unknown user");
    }

    #[test]
    fn test_code_value_without_sub_code() {
        let fault = Fault::from_value(serde_json::json!({"Code": {"Value": "_401"}, "Reason": "USER_CANCEL"}));
        assert_eq!(fault.fault_code(), "401");
        assert_eq!(fault.to_error().message(), "USER_CANCEL");
    }

    #[test]
    fn test_mistyped_fields_are_dropped() {
        let fault = Fault::from_value(serde_json::json!({
            "Code": {"SubCode": {"Value": "105"}},
            "Reason": "UNKNOWN_USER",
            "Details": "plain text",
            "RollbackFault": {"Reason": "inner", "Details": 7},
            "Extra": [1, 2]
        }));
        assert_eq!(fault.fault_code(), "105");
        assert_eq!(fault.fault_detail(), "UNKNOWN_USER");
        assert!(fault.details.is_none());
        assert_eq!(
            fault.rollback_fault.and_then(|f| f.reason),
            Some("inner".to_string())
        );
    }

    #[test]
    fn test_mistyped_code_falls_back_to_internal_error() {
        let fault = Fault::from_value(serde_json::json!({"Code": "oops", "Reason": "x"}));
        assert_eq!(fault.fault_code(), "900");
        assert_eq!(fault.fault_message(), "x");
    }

    #[test]
    fn test_nested_rollback_fault_and_details_decode() {
        let fault = parse(
            r#"{"Reason":"x","Detail":"y","Details":{"HttpErrorCode":"500"},
                "RollbackFault":{"Reason":"inner"},"SessionID":"s1","Unknown":1}"#,
        );
        assert_eq!(fault.fault_detail(), "y");
        assert_eq!(
            fault.details.unwrap().http_error_code.as_deref(),
            Some("500")
        );
        assert_eq!(
            fault.rollback_fault.unwrap().reason.as_deref(),
            Some("inner")
        );
    }
}
