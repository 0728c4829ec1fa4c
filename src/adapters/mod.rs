//! Adapter layer modules for external system integration.
//!
//! Provides adapters for:
//! - The MSSP REST interface (message model, authentication, transport)

pub mod mss;
