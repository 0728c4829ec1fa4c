//! Service layer module root.
//! Contains certificate selection, remote signing and registration services.

pub mod cert_resolver;
pub mod document;
pub mod registration;
pub mod remote_signer;

pub use cert_resolver::CertificateResolver;
pub use document::{DocumentSigner, SignatureContainer};
pub use registration::RegistrationClient;
pub use remote_signer::{DigestSink, RemoteKey, SignatureFormat};
