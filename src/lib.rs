//! MSS REST Client Library
//!
//! A client for Mobile Signature Service (ETSI TS 102 204) REST interfaces:
//! authenticate mobile users, fetch their certificates and obtain
//! signatures over digests, with a streaming adapter for document signing.
//!
//! ```no_run
//! use mss_rest_client::{Identity, MssClient, MssClientConfig, ServiceUrl, SignatureProfile};
//!
//! # async fn run() -> mss_rest_client::MssResult<()> {
//! let config = MssClientConfig::new(
//!     ServiceUrl::new("https://mss.example.com/rest/service")?,
//!     "http://ap.example.com",
//! )
//! .with_api_key("secret");
//! let client = MssClient::new(config)?;
//! let identity = Identity::msisdn("+35847001001")?;
//! let response = client
//!     .authenticate(&identity, "Log in to example.com", &SignatureProfile::authentication())
//!     .await?;
//! println!("Authenticated: {:?}", response.subject_attribute("CN")?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod infra;
pub mod services;

pub use adapters::mss::protocol::{
    MssRequest, MssResponse, RegistrationRequest, RegistrationResponse, SignatureRequest,
    SignatureResponse,
};
pub use adapters::mss::{AuthMode, MssClient, MssClientConfig};
pub use domain::{CertificateBundle, Dtbs, Identity, MssCertificate, MssFormat, ServiceUrl, SignatureProfile};
pub use infra::config::{ClientConfiguration, ConfigManager};
pub use infra::error::{MssError, MssResult};
pub use services::{DigestSink, DocumentSigner, RegistrationClient, SignatureContainer, SignatureFormat};
