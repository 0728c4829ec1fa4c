//! HMAC-SHA256 request authentication.
//!
//! The MAC covers `date`, `method`, `host[:port]`, `path` and `body`, each
//! terminated by a newline. The `Authorization` header carries
//! `Basic base64(base64(AP_ID) + ":" + hex(mac))`.

use crate::infra::error::{MssError, MssResult};
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// RFC 2822 date layout used in the `Date` header.
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Format a timestamp for the `Date` header.
#[must_use]
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

/// `host` plus `:port` when the URL uses a non-default port for its scheme.
#[must_use]
pub fn host_header(url: &url::Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Canonical string covered by the MAC.
#[must_use]
pub fn signing_string(date: &str, method: &str, host: &str, path: &str, body: &str) -> String {
    let mut out = String::with_capacity(date.len() + method.len() + host.len() + path.len() + body.len() + 5);
    for field in [date, method, host, path, body] {
        out.push_str(field);
        out.push('\n');
    }
    out
}

/// Lowercase hex HMAC-SHA256 of `data` keyed by `api_key`.
///
/// # Errors
/// Returns an internal error if the key cannot be used.
pub fn compute_mac(api_key: &str, data: &str) -> MssResult<String> {
    let mut mac = HmacSha256::new_from_slice(api_key.as_bytes())
        .map_err(|e| MssError::internal(format!("Invalid HMAC key: {e}")))?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// `Authorization` header value for an AP and a computed MAC.
#[must_use]
pub fn authorization_header(ap_id: &str, mac_hex: &str) -> String {
    let engine = base64::engine::general_purpose::STANDARD;
    let user_id = engine.encode(ap_id.as_bytes());
    format!("Basic {}", engine.encode(format!("{user_id}:{mac_hex}")))
}

/// Headers attached to one authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmacHeaders {
    pub date: String,
    pub authorization: String,
}

/// Signs requests for one AP.
#[derive(Clone)]
pub struct HmacSigner {
    ap_id: String,
    api_key: String,
}

impl HmacSigner {
    #[must_use]
    pub fn new(ap_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            ap_id: ap_id.into(),
            api_key: api_key.into(),
        }
    }

    #[must_use]
    pub fn ap_id(&self) -> &str {
        &self.ap_id
    }

    /// Compute the headers for a request sent now.
    ///
    /// # Errors
    /// Returns an internal error if the MAC cannot be computed.
    pub fn headers(&self, method: &str, url: &url::Url, body: &str) -> MssResult<HmacHeaders> {
        self.headers_at(Utc::now(), method, url, body)
    }

    /// Compute the headers for a request sent at `at`.
    ///
    /// # Errors
    /// Returns an internal error if the MAC cannot be computed.
    pub fn headers_at(
        &self,
        at: DateTime<Utc>,
        method: &str,
        url: &url::Url,
        body: &str,
    ) -> MssResult<HmacHeaders> {
        let date = format_date(at);
        let data = signing_string(&date, method, &host_header(url), url.path(), body);
        log::trace!("HMAC signing string: {data:?}");
        let mac = compute_mac(&self.api_key, &data)?;
        Ok(HmacHeaders {
            authorization: authorization_header(&self.ap_id, &mac),
            date,
        })
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("ap_id", &self.ap_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
