//! Protocol constants: format URIs, profile URIs, additional-service URIs,
//! DTBS MIME types and response status codes.

/// `MSS_Format` URIs.
pub mod formats {
    pub const PKCS7: &str = "http://uri.etsi.org/TS102204/v1.1.2#PKCS7";
    pub const CMS: &str = "http://uri.etsi.org/TS102204/v1.1.2#CMS-Signature";
    pub const KIURU_PKCS1: &str = "http://www.methics.fi/KiuruMSSP/v3.2.0#PKCS1";
    pub const FICOM_PKCS1: &str = "http://mss.ficom.fi/TS102204/v1.0.0#PKCS1";
}

/// Well-known signature profile URIs.
pub mod profiles {
    pub const AUTHENTICATION: &str = "http://alauda.mobi/digitalSignature";
    pub const SIGNING: &str = "http://alauda.mobi/nonRepudiation";
}

/// Additional service description URIs.
pub mod services {
    pub const VALIDATE: &str = "http://uri.etsi.org/TS102204/v1.1.2#validate";
    pub const BATCH_SIGN: &str = "http://www.methics.fi/KiuruMSSP/v5.0.0#batchsign";
    pub const NO_SPAM: &str = "http://mss.ficom.fi/TS102204/v1.0.0#noSpam";
    pub const EVENT_ID: &str = "http://mss.ficom.fi/TS102204/v1.0.0#eventId";
    pub const USER_LANG: &str = "http://mss.ficom.fi/TS102204/v1.0.0#userLang";
    pub const PERSON_ID: &str = "http://mss.ficom.fi/TS102204/v1.0.0#personIdentity";
    pub const FICOM_VALIDATE: &str = "http://mss.ficom.fi/TS102204/v1.0.0#validate";
    pub const DISPLAY_NAME: &str = "http://mss.ficom.fi/TS102204/v1.0.0#displayName";
}

/// MIME types for `DataToBeSigned`.
pub mod mime {
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const SHA1: &str = "application/x-sha1";
    pub const SHA256: &str = "application/x-sha256";
    pub const SHA384: &str = "application/x-sha384";
    pub const TEXT_UCS2: &str = "text/plain;ucs2";
    pub const TEXT_GSM: &str = "text/plain;gsm";
    pub const TEXT_UTF8: &str = "text/plain;UTF-8";
    pub const TEXT_PLAIN: &str = "text/plain";
}

/// `Encoding` values for `DataToBeSigned`.
pub mod encoding {
    pub const UTF8: &str = "UTF-8";
    pub const BASE64: &str = "base64";
}

/// Status codes of successful responses.
pub mod status {
    pub const SIGNATURE: &str = "500";
    pub const VALID_SIGNATURE: &str = "502";
    pub const REQUEST_OK: &str = "100";
}

/// Lifecycle state of an eligible certificate chain.
pub const CERT_STATE_ACTIVE: &str = "ACTIVE";

/// Protocol version stamped on every request.
pub const MAJOR_VERSION: &str = "1";
pub const MINOR_VERSION: &str = "1";

/// Messaging mode; this client only performs synchronous exchanges.
pub const MESSAGING_MODE_SYNCH: &str = "synch";

/// Default `AP_PWD` value when the AP does not use a password.
pub const DEFAULT_AP_PASSWORD: &str = "x";

/// Maximum number of batch sub-requests in one signature session.
pub const MAX_BATCH_SIGNATURES: usize = 9;

/// Default connect/read timeout for MSS exchanges, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
