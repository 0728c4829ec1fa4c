//! Canned certificates, signatures and MSSP responses.
//!
//! `user.der` is issued by `ca.der` to `CN=Test User`, serial `0x1234`.
//! `signature.p7s` is a CMS signature by that user with both certificates
//! embedded; `sig_nocert.p7s` carries none.

use base64::Engine;
use serde_json::{json, Value};

pub const USER_CERT: &[u8] = include_bytes!("../../test-data/user.der");
pub const CA_CERT: &[u8] = include_bytes!("../../test-data/ca.der");
pub const SIGNATURE: &[u8] = include_bytes!("../../test-data/signature.p7s");
pub const SIGNATURE_WITHOUT_CERTS: &[u8] = include_bytes!("../../test-data/sig_nocert.p7s");

pub const AP_ID: &str = "http://ap.example.com";
pub const MSISDN: &str = "+35847001001";
pub const SIGNING: &str = "http://alauda.mobi/nonRepudiation";
pub const AUTHENTICATION: &str = "http://alauda.mobi/digitalSignature";

pub fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn success_status() -> Value {
    json!({"StatusCode": {"Value": "500"}, "StatusMessage": "SIGNATURE"})
}

/// `MSS_SignatureResp` carrying `signature`.
pub fn signature_response(signature: &[u8]) -> Value {
    json!({
        "MSS_SignatureResp": {
            "MajorVersion": "1",
            "MinorVersion": "1",
            "MSSP_TransID": "T1",
            "MobileUser": {"MSISDN": MSISDN},
            "MSS_Signature": {"Base64Signature": b64(signature)},
            "SignatureProfile": SIGNING,
            "Status": success_status()
        }
    })
}

/// One `MobileUserCertificate` entry.
pub fn certificate_chain(state: Option<&str>, profiles: &[&str]) -> Value {
    let mut chain = json!({
        "X509Certificate": [b64(USER_CERT), b64(CA_CERT)],
        "SignatureProfiles": profiles,
        "Algorithm": "RSA2048"
    });
    if let Some(state) = state {
        chain["State"] = json!(state);
    }
    chain
}

/// `MSS_ProfileResp` listing the given chains.
pub fn profile_response(chains: Vec<Value>) -> Value {
    json!({
        "MSS_ProfileResp": {
            "MajorVersion": "1",
            "MinorVersion": "1",
            "SignatureProfile": [SIGNING, AUTHENTICATION],
            "Status": {
                "StatusCode": {"Value": 100},
                "StatusDetail": {
                    "ProfileQueryExtension": {"MobileUserCertificate": chains}
                }
            }
        }
    })
}

/// Fault with an application sub-code.
pub fn fault(code: &str, reason: &str) -> Value {
    json!({
        "Fault": {
            "Code": {
                "Value": "env:Receiver",
                "SubCode": {"Value": code, "ValueNs": "http://uri.etsi.org/TS102204/v1.1.2#"}
            },
            "Reason": reason,
            "Detail": reason
        }
    })
}
