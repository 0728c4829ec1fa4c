//! MSS protocol client.
//!
//! Builds typed requests, hands them to the [`HttpTransport`] and decodes
//! the responses. Faults returned by the MSSP surface as [`MssError`]s
//! carrying the fault code.

use super::protocol::{
    ApInfo, MssRequest, MssResponse, ProfileRequest, ProfileResponse, SignatureRequest,
    SignatureResponse,
};
use super::transport::{AuthMode, HttpTransport, TransportConfig};
use crate::domain::certificate::CertificateBundle;
use crate::domain::constants::{DEFAULT_AP_PASSWORD, DEFAULT_TIMEOUT_SECS};
use crate::domain::dtbs::Dtbs;
use crate::domain::types::{Identity, MssFormat, ServiceUrl, SignatureProfile};
use crate::infra::error::{MssError, MssResult};
use crate::services::cert_resolver::CertificateResolver;
use std::collections::BTreeMap;
use std::time::Duration;

/// Connection settings of an [`MssClient`].
#[derive(Debug, Clone)]
pub struct MssClientConfig {
    /// Primary REST endpoint (e.g., `https://mss.example.com/rest/service`).
    pub primary_url: ServiceUrl,
    /// Endpoint tried once when the primary fails at the I/O level.
    pub secondary_url: Option<ServiceUrl>,
    /// `AP_ID` stamped on every request.
    pub ap_id: String,
    /// `AP_PWD` stamped on every request.
    pub ap_password: String,
    /// Request authentication; required.
    pub auth: Option<AuthMode>,
    /// Connect and read timeout, per attempt.
    pub timeout: Duration,
    /// Whether to verify TLS certificates (should be true in production).
    pub verify_tls: bool,
}

impl MssClientConfig {
    /// Create a configuration for an AP.
    ///
    /// # Arguments
    /// * `primary_url` - REST endpoint of the MSSP
    /// * `ap_id` - Application Provider identifier
    #[must_use]
    pub fn new(primary_url: ServiceUrl, ap_id: impl Into<String>) -> Self {
        Self {
            primary_url,
            secondary_url: None,
            ap_id: ap_id.into(),
            ap_password: DEFAULT_AP_PASSWORD.to_string(),
            auth: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: true,
        }
    }

    /// Authenticate requests with an HMAC API key bound to the `AP_ID`.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.auth = Some(AuthMode::api_key(self.ap_id.clone(), api_key));
        self
    }

    /// Authenticate requests with HTTP Basic credentials.
    #[must_use]
    pub fn with_password(mut self, ap_name: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(AuthMode::password(ap_name, password));
        self
    }

    #[must_use]
    pub fn with_secondary_url(mut self, url: ServiceUrl) -> Self {
        self.secondary_url = Some(url);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable TLS verification (for testing only!).
    #[must_use]
    pub fn with_insecure_tls(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    #[must_use]
    pub fn with_ap_password(mut self, ap_password: impl Into<String>) -> Self {
        self.ap_password = ap_password.into();
        self
    }

    fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            primary: self.primary_url.clone(),
            secondary: self.secondary_url.clone(),
            timeout: self.timeout,
            verify_tls: self.verify_tls,
        }
    }
}

/// Client for the MSS REST interface.
///
/// Configuration is fixed at construction; every call is one
/// request/response exchange.
#[derive(Debug)]
pub struct MssClient {
    config: MssClientConfig,
    transport: HttpTransport,
}

impl MssClient {
    /// Create a new client.
    ///
    /// # Errors
    /// `MissingParameter` when no authentication or `AP_ID` is configured;
    /// an internal error if the HTTP client cannot be built.
    pub fn new(config: MssClientConfig) -> MssResult<Self> {
        if config.ap_id.trim().is_empty() {
            return Err(MssError::missing_parameter("AP_ID is required"));
        }
        let auth = config
            .auth
            .clone()
            .ok_or_else(|| MssError::missing_parameter("API key or password is required"))?;
        log::debug!(
            "MSS client for {} using {} authentication",
            config.primary_url,
            auth.name()
        );
        let transport = HttpTransport::new(config.transport_config(), auth)?;
        Ok(Self { config, transport })
    }

    #[must_use]
    pub fn config(&self) -> &MssClientConfig {
        &self.config
    }

    /// Send any request and decode the response.
    ///
    /// A fresh `AP_Info` (transaction ID, instant) is stamped on the request.
    ///
    /// # Errors
    /// The fault carried by the response, `ServiceUnavailable` when the MSSP
    /// cannot be reached or answers with something other than JSON.
    pub async fn send(&self, mut request: MssRequest) -> MssResult<MssResponse> {
        let ap_info = ApInfo::new(self.config.ap_id.clone(), self.config.ap_password.clone());
        log::debug!(
            "Sending {} with AP_TransID {}",
            request.root_key(),
            ap_info.ap_trans_id.as_deref().unwrap_or_default()
        );
        request.set_ap_info(ap_info);

        let body = request.to_json()?;
        let response_body = self.transport.post_json(&body).await?;
        MssResponse::from_json(&response_body)?.into_result()
    }

    /// Authenticate a mobile user. The message is what the user sees and
    /// signs.
    ///
    /// # Errors
    /// `MissingParameter` when the identity or profile is empty, otherwise
    /// as [`Self::send`].
    pub async fn authenticate(
        &self,
        identity: &Identity,
        message: &str,
        profile: &SignatureProfile,
    ) -> MssResult<SignatureResponse> {
        require_profile(profile)?;
        log::info!("Authenticating {identity}");
        let request = SignatureRequest::builder()
            .with_identity(require_identity(identity)?)
            .with_dtbs(Dtbs::text(message))
            .with_signature_profile(profile.clone())
            .build()?;
        self.send(MssRequest::Authentication(request))
            .await?
            .into_signature()
    }

    /// Raw profile query for a mobile user.
    ///
    /// # Errors
    /// As [`Self::send`].
    pub async fn query_profile(&self, identity: &Identity) -> MssResult<ProfileResponse> {
        log::debug!("Fetching profile of {identity}");
        let request = ProfileRequest::new(&require_identity(identity)?);
        self.send(MssRequest::ProfileQuery(request))
            .await?
            .into_profile()
    }

    /// All usable certificate chains of a mobile user, keyed by each
    /// signature profile they support.
    ///
    /// # Errors
    /// As [`Self::send`].
    pub async fn list_certificates(
        &self,
        identity: &Identity,
    ) -> MssResult<BTreeMap<SignatureProfile, CertificateBundle>> {
        Ok(self.resolver(identity).await?.by_profile())
    }

    /// Certificate chain for one signature profile; the empty bundle when
    /// the user has none.
    ///
    /// # Errors
    /// As [`Self::send`].
    pub async fn get_certificate(
        &self,
        identity: &Identity,
        profile: &SignatureProfile,
    ) -> MssResult<CertificateBundle> {
        Ok(self.resolver(identity).await?.for_profile(profile))
    }

    /// Sign a digest and return the CMS signature.
    ///
    /// # Arguments
    /// * `identity` - Mobile user
    /// * `message` - Text shown to the user
    /// * `digest` - Digest to sign
    /// * `mime_type` - MIME type of the digest (e.g., `application/x-sha256`)
    /// * `profile` - Signature profile
    ///
    /// # Errors
    /// `MissingParameter` for an empty identity or profile,
    /// `ServiceUnavailable` when no signature is returned, otherwise as
    /// [`Self::send`].
    pub async fn sign(
        &self,
        identity: &Identity,
        message: &str,
        digest: &[u8],
        mime_type: &str,
        profile: &SignatureProfile,
    ) -> MssResult<Vec<u8>> {
        self.sign_with_format(identity, message, digest, mime_type, profile, MssFormat::Cms)
            .await
    }

    /// Sign a digest and return a raw PKCS#1 signature.
    ///
    /// # Errors
    /// See [`Self::sign`].
    pub async fn sign_pkcs1(
        &self,
        identity: &Identity,
        message: &str,
        digest: &[u8],
        mime_type: &str,
        profile: &SignatureProfile,
    ) -> MssResult<Vec<u8>> {
        self.sign_with_format(
            identity,
            message,
            digest,
            mime_type,
            profile,
            MssFormat::KiuruPkcs1,
        )
        .await
    }

    /// Sign a digest, requesting the given signature format.
    ///
    /// # Errors
    /// See [`Self::sign`].
    pub async fn sign_with_format(
        &self,
        identity: &Identity,
        message: &str,
        digest: &[u8],
        mime_type: &str,
        profile: &SignatureProfile,
        format: MssFormat,
    ) -> MssResult<Vec<u8>> {
        require_profile(profile)?;
        log::info!("Signing with {identity} ({})", format.as_uri());
        let request = SignatureRequest::builder()
            .with_identity(require_identity(identity)?)
            .with_dtbs(Dtbs::bytes(digest, mime_type))
            .with_dtbd(message)
            .with_signature_profile(profile.clone())
            .with_format(format)
            .build()?;
        let response = self.sign_request(request).await?;
        if !response.is_successful() {
            log::warn!(
                "Signature response status {}",
                response.status_code().unwrap_or("<none>")
            );
        }
        response.raw_signature()
    }

    /// Send a prepared signature request (batch signing, extra services).
    ///
    /// # Errors
    /// As [`Self::send`].
    pub async fn sign_request(&self, request: SignatureRequest) -> MssResult<SignatureResponse> {
        self.send(MssRequest::Signature(request))
            .await?
            .into_signature()
    }

    async fn resolver(&self, identity: &Identity) -> MssResult<CertificateResolver> {
        let response = self.query_profile(identity).await?;
        let chains = response
            .status
            .as_ref()
            .map(|s| s.mobile_user_certificates())
            .unwrap_or_default();
        Ok(CertificateResolver::new(chains))
    }
}

fn require_identity(identity: &Identity) -> MssResult<Identity> {
    if identity.as_str().trim().is_empty() {
        return Err(MssError::missing_parameter("MSISDN or UserIdentifier is required"));
    }
    Ok(identity.clone())
}

fn require_profile(profile: &SignatureProfile) -> MssResult<()> {
    if profile.is_empty() {
        return Err(MssError::missing_parameter("SignatureProfile is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MssClientConfig {
        MssClientConfig::new(
            ServiceUrl::new("http://127.0.0.1:1/rest/service").unwrap(),
            "http://ap.example.com",
        )
    }

    #[test]
    fn test_client_requires_authentication() {
        let err = MssClient::new(config()).unwrap_err();
        assert_eq!(err.code(), "102");
        assert!(MssClient::new(config().with_api_key("key")).is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let cfg = config().with_password("ap", "pw");
        assert_eq!(cfg.ap_password, "x");
        assert_eq!(cfg.timeout, Duration::from_secs(120));
        assert!(cfg.verify_tls);
        assert!(!cfg.with_insecure_tls().verify_tls);
    }

    #[tokio::test]
    async fn test_missing_profile_fails_before_sending() {
        let client = MssClient::new(config().with_api_key("key")).unwrap();
        let identity = Identity::Msisdn("+35847001001".into());
        let err = client
            .authenticate(&identity, "Login", &SignatureProfile::new(""))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "102");

        let err = client
            .sign(&identity, "Sign", &[0u8; 32], "application/x-sha256", &SignatureProfile::new(" "))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "102");
    }

    #[tokio::test]
    async fn test_empty_identity_is_missing_parameter() {
        let client = MssClient::new(config().with_api_key("key")).unwrap();
        let err = client
            .query_profile(&Identity::Msisdn(String::new()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "102");
    }
}
