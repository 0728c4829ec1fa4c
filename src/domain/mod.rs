//! Domain layer: protocol-independent value types.
//!
//! - `types`: identities, signature profiles, signature formats, endpoints
//! - `dtbs`: data-to-be-signed payloads
//! - `certificate`: parsed certificates and per-profile certificate bundles
//! - `signed_data`: CMS SignedData parsing and certificate extraction
//! - `subject`: distinguished-name attribute aliases

pub mod certificate;
pub mod constants;
pub mod dtbs;
pub mod signed_data;
pub mod subject;
pub mod types;

pub use certificate::{CertificateBundle, MssCertificate};
pub use dtbs::Dtbs;
pub use types::{Identity, MssFormat, ServiceUrl, SignatureProfile};
