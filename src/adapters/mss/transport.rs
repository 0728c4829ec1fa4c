//! HTTP delivery of JSON bodies to the MSS REST endpoint.
//!
//! One POST per exchange, authenticated either with HMAC headers or with
//! pre-emptive HTTP Basic credentials. An I/O failure on the primary URL
//! is retried exactly once on the secondary URL, if one is configured.

use super::hmac_auth::HmacSigner;
use crate::domain::constants::DEFAULT_TIMEOUT_SECS;
use crate::domain::types::ServiceUrl;
use crate::infra::error::{ErrorKind, MssError, MssResult};
use std::time::Duration;

/// Request authentication scheme. The two schemes are never combined.
#[derive(Clone)]
pub enum AuthMode {
    /// HMAC-SHA256 signed `Authorization` and `Date` headers.
    ApiKey(HmacSigner),
    /// HTTP Basic with an AP name and password.
    Password { username: String, password: String },
}

impl AuthMode {
    #[must_use]
    pub fn api_key(ap_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::ApiKey(HmacSigner::new(ap_id, api_key))
    }

    #[must_use]
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "apikey",
            Self::Password { .. } => "password",
        }
    }
}

impl std::fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(signer) => f.debug_tuple("ApiKey").field(signer).finish(),
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Endpoint and connection settings.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub primary: ServiceUrl,
    pub secondary: Option<ServiceUrl>,
    /// Bound for both connecting and the whole exchange, per attempt.
    pub timeout: Duration,
    /// Whether to verify TLS certificates (should be true in production).
    pub verify_tls: bool,
}

impl TransportConfig {
    #[must_use]
    pub fn new(primary: ServiceUrl) -> Self {
        Self {
            primary,
            secondary: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: true,
        }
    }
}

/// Authenticated JSON-over-HTTP transport with single-retry failover.
#[derive(Debug)]
pub struct HttpTransport {
    config: TransportConfig,
    auth: AuthMode,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create the transport and its HTTP client.
    ///
    /// # Errors
    /// Returns an internal error if the HTTP client cannot be built.
    pub fn new(config: TransportConfig, auth: AuthMode) -> MssResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| MssError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            auth,
            client,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    #[must_use]
    pub fn auth(&self) -> &AuthMode {
        &self.auth
    }

    /// POST `body` and return the response body.
    ///
    /// Bodies of non-200 responses are returned as well, since the MSSP
    /// reports faults with error statuses.
    ///
    /// # Errors
    /// `ServiceUnavailable` once the primary URL and, if configured, the
    /// secondary URL have both failed at the I/O level.
    pub async fn post_json(&self, body: &str) -> MssResult<String> {
        let primary_err = match self.post_once(&self.config.primary, body).await {
            Ok(response) => return Ok(response),
            Err(e) if e.kind() != ErrorKind::ServiceUnavailable => return Err(e),
            Err(e) => e,
        };

        let Some(secondary) = &self.config.secondary else {
            log::error!("Connection to {} failed: {}", self.config.primary, primary_err.message());
            return Err(primary_err);
        };

        log::warn!(
            "Connection to {} failed: {}; retrying with {secondary}",
            self.config.primary,
            primary_err.message()
        );
        match self.post_once(secondary, body).await {
            Ok(response) => {
                log::info!("Secondary endpoint {secondary} answered");
                Ok(response)
            }
            Err(secondary_err) => {
                log::error!("Connection to {secondary} failed: {}", secondary_err.message());
                Err(MssError::service_unavailable(format!(
                    "Primary failed: {}; secondary failed: {}",
                    primary_err.message(),
                    secondary_err.message()
                )))
            }
        }
    }

    async fn post_once(&self, url: &ServiceUrl, body: &str) -> MssResult<String> {
        log::debug!("Connecting to {url}");
        log::debug!("Sending request {body}");

        let mut request = self
            .client
            .post(url.as_url().clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());

        request = match &self.auth {
            AuthMode::ApiKey(signer) => {
                let headers = signer.headers("POST", url.as_url(), body)?;
                request
                    .header(reqwest::header::DATE, headers.date)
                    .header(reqwest::header::AUTHORIZATION, headers.authorization)
            }
            AuthMode::Password { username, password } => {
                request.basic_auth(username, Some(password))
            }
        };

        let response = request.send().await.map_err(|e| MssError::service_unavailable(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MssError::service_unavailable(e.to_string()))?;

        if !status.is_success() {
            log::warn!("HTTP {status} from {url}");
        }
        log::debug!("Received response {text}");
        Ok(text)
    }
}
