//! MSS REST adapter.
//!
//! - `protocol`: JSON message model
//! - `hmac_auth`: API-key request signing
//! - `transport`: HTTP POST with primary/secondary failover
//! - `client`: typed operations on top of the transport

pub mod client;
pub mod hmac_auth;
pub mod protocol;
pub mod transport;

pub use client::{MssClient, MssClientConfig};
pub use hmac_auth::HmacSigner;
pub use transport::{AuthMode, HttpTransport, TransportConfig};
