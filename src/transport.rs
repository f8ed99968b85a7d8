use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::error::NetatmoError;
use crate::oauth::provider::TokenProvider;

/// HTTP client whose requests carry a token from a [`TokenProvider`].
///
/// Every request asks the provider for a token first, so expired tokens are
/// refreshed transparently before the request leaves.
#[derive(Clone)]
pub struct AuthorizedTransport {
    http: reqwest::Client,
    provider: Arc<dyn TokenProvider>,
}

impl AuthorizedTransport {
    pub fn new(http: reqwest::Client, provider: Arc<dyn TokenProvider>) -> Self {
        Self { http, provider }
    }

    pub fn provider(&self) -> &Arc<dyn TokenProvider> {
        &self.provider
    }

    /// Issue an authenticated GET request.
    ///
    /// Token retrieval errors are returned unchanged; failures to send the
    /// request become [`NetatmoError::TransportError`].
    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, NetatmoError> {
        let token = self.provider.token().await?;

        let header = HeaderValue::from_str(&format!(
            "{} {}",
            token.auth_type(),
            token.access_token
        ))
        .map_err(|e| NetatmoError::ProtocolError(format!("Invalid access token: {e}")))?;

        self.http
            .get(url)
            .query(query)
            .header(AUTHORIZATION, header)
            .send()
            .await
            .map_err(|e| NetatmoError::TransportError(Box::new(e)))
    }
}

impl std::fmt::Debug for AuthorizedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedTransport").finish_non_exhaustive()
    }
}
