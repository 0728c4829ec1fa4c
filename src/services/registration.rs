//! Registration (MReg) client.

use crate::adapters::mss::client::MssClient;
use crate::adapters::mss::protocol::{MssRequest, RegistrationRequest, RegistrationResponse};
use crate::infra::error::MssResult;

/// Sends registration use-case requests through an [`MssClient`].
#[derive(Debug, Clone, Copy)]
pub struct RegistrationClient<'a> {
    client: &'a MssClient,
}

impl<'a> RegistrationClient<'a> {
    #[must_use]
    pub fn new(client: &'a MssClient) -> Self {
        Self { client }
    }

    /// Send a registration request.
    ///
    /// A response without status `100` is returned as-is; check
    /// [`RegistrationResponse::is_successful`].
    ///
    /// # Errors
    /// The fault returned by the MSSP, or a transport failure.
    pub async fn send(&self, request: RegistrationRequest) -> MssResult<RegistrationResponse> {
        let use_case = request.use_case.name.clone().unwrap_or_default();
        log::info!("Sending registration use case {use_case}");
        let response = self
            .client
            .send(MssRequest::Registration(request))
            .await?
            .into_registration()?;
        if !response.is_successful() {
            log::warn!(
                "Registration use case {use_case} returned status {}",
                response.status_code().unwrap_or("<none>")
            );
        }
        Ok(response)
    }
}
