//! JSON message model of the MSS REST interface.
//!
//! Every exchanged body is an object with a single root key naming the
//! message (`MSS_SignatureReq`, `MSS_SignatureResp`, `Fault`, ...). Field
//! names follow the wire format through serde renames.

pub mod common;
pub mod fault;
pub mod registration;
pub mod request;
pub mod response;
pub mod services;
pub mod status;

pub use common::{ApInfo, Data, MobileUser, MssSignature};
pub use fault::Fault;
pub use registration::{RegistrationRequest, RegistrationRequestBuilder, RegistrationResponse};
pub use request::{MssRequest, ProfileRequest, SignatureRequest, SignatureRequestBuilder};
pub use response::{MssResponse, ProfileResponse, ReceiptResponse, SignatureResponse, StatusResponse};
pub use services::AdditionalService;
pub use status::{MobileUserCertificate, Status};
