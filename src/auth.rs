//! Credential verification against the backend.

use reqwest::Method;
use tracing::info;

use crate::{prelude::*, Credentials, Error, HttpClient};

/// Checks credentials by calling `POST /admin/login` with Basic auth.
///
/// 200 confirms the credentials, 401 rejects them; anything else is an
/// error. The service holds no state beyond the transport.
#[derive(Debug, Clone)]
pub struct AuthenticationService {
    http: HttpClient,
}

impl AuthenticationService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Returns `Ok(true)` for valid credentials and `Ok(false)` for a 401.
    pub async fn login(&self, credentials: &Credentials) -> Result<bool> {
        let (status, _) = self
            .http
            .send(Method::POST, "/admin/login", Some(credentials), None)
            .await?;

        match status {
            200 => {
                info!(username = %credentials.username, "login succeeded");
                Ok(true)
            }
            401 => Ok(false),
            status => Err(Error::UnexpectedStatus { status }),
        }
    }
}
