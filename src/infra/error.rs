//! Error types for MSS protocol operations.
//!
//! Every failure surfaced by this crate is an [`MssError`]: a string code plus
//! a message. Callers branch on [`MssError::kind`] (or the raw code) to tell
//! "the remote party refused" apart from "the service could not be reached"
//! and "the request was malformed".

use thiserror::Error;

/// Result type for MSS operations
pub type MssResult<T> = Result<T, MssError>;

/// Numeric fault codes used by the MSS REST interface.
pub mod codes {
    pub const WRONG_PARAM: &str = "101";
    pub const MISSING_PARAM: &str = "102";
    pub const UNAUTHORIZED_ACCESS: &str = "104";
    pub const UNKNOWN_USER: &str = "105";
    pub const INVALID_SIGNATURE: &str = "503";
    pub const UNABLE_TO_PROVIDE_SERVICES: &str = "780";
    pub const INTERNAL_ERROR: &str = "900";
}

/// Coarse classification of an [`MssError`] code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    WrongParameter,
    MissingParameter,
    UnauthorizedAccess,
    UnknownUser,
    InvalidSignature,
    ServiceUnavailable,
    InternalError,
    /// Any other server-defined code (e.g. 109 unknown profile, 401 user cancel).
    Other,
}

impl ErrorKind {
    /// Classify a fault code string.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            codes::WRONG_PARAM => Self::WrongParameter,
            codes::MISSING_PARAM => Self::MissingParameter,
            codes::UNAUTHORIZED_ACCESS => Self::UnauthorizedAccess,
            codes::UNKNOWN_USER => Self::UnknownUser,
            codes::INVALID_SIGNATURE => Self::InvalidSignature,
            codes::UNABLE_TO_PROVIDE_SERVICES => Self::ServiceUnavailable,
            codes::INTERNAL_ERROR => Self::InternalError,
            _ => Self::Other,
        }
    }
}

/// Error raised by any MSS operation.
#[derive(Error, Debug, Clone, PartialEq, Eq, miette::Diagnostic)]
#[error("MSS error {code}: {message}")]
pub struct MssError {
    code: String,
    message: String,
}

impl MssError {
    /// Create an error with an explicit code.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn wrong_parameter(message: impl Into<String>) -> Self {
        Self::new(codes::WRONG_PARAM, message)
    }

    #[must_use]
    pub fn missing_parameter(message: impl Into<String>) -> Self {
        Self::new(codes::MISSING_PARAM, message)
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(codes::UNAUTHORIZED_ACCESS, message)
    }

    #[must_use]
    pub fn unknown_user(message: impl Into<String>) -> Self {
        Self::new(codes::UNKNOWN_USER, message)
    }

    #[must_use]
    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_SIGNATURE, message)
    }

    #[must_use]
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(codes::UNABLE_TO_PROVIDE_SERVICES, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, message)
    }

    /// Server or client fault code, underscore free (e.g. `"109"`).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_code(&self.code)
    }
}

impl From<reqwest::Error> for MssError {
    fn from(error: reqwest::Error) -> Self {
        MssError::internal(format!("HTTP error: {error}"))
    }
}

impl From<serde_json::Error> for MssError {
    fn from(error: serde_json::Error) -> Self {
        MssError::internal(format!("JSON error: {error}"))
    }
}

impl From<der::Error> for MssError {
    fn from(error: der::Error) -> Self {
        MssError::internal(format!("ASN.1 error: {error}"))
    }
}

impl From<base64::DecodeError> for MssError {
    fn from(error: base64::DecodeError) -> Self {
        MssError::internal(format!("base64 error: {error}"))
    }
}

impl From<std::io::Error> for MssError {
    fn from(error: std::io::Error) -> Self {
        MssError::internal(format!("IO error: {error}"))
    }
}

impl From<toml::de::Error> for MssError {
    fn from(error: toml::de::Error) -> Self {
        MssError::internal(format!("Config parse error: {error}"))
    }
}

impl From<toml::ser::Error> for MssError {
    fn from(error: toml::ser::Error) -> Self {
        MssError::internal(format!("Config serialize error: {error}"))
    }
}
