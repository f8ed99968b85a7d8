use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::NetatmoError;
use crate::oauth::token::{refresh_token, Token};

/// Source of currently-valid tokens.
///
/// Implementations decide on their own whether the token they hold is still
/// good and refresh it when it is not.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<Token, NetatmoError>;
}

impl std::fmt::Debug for dyn TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl<P: TokenProvider + ?Sized> TokenProvider for Arc<P> {
    async fn token(&self) -> Result<Token, NetatmoError> {
        (**self).token().await
    }
}

/// Holds a token and refreshes it against the token endpoint once it expires.
pub struct RefreshingTokenProvider {
    http: reqwest::Client,
    token_url: String,
    config: Config,
    current: Mutex<Token>,
}

impl RefreshingTokenProvider {
    pub fn new(http: reqwest::Client, token_url: &str, config: Config, token: Token) -> Self {
        Self {
            http,
            token_url: token_url.to_string(),
            config,
            current: Mutex::new(token),
        }
    }
}

#[async_trait]
impl TokenProvider for RefreshingTokenProvider {
    async fn token(&self) -> Result<Token, NetatmoError> {
        let mut current = self.current.lock().await;
        if current.is_valid() {
            return Ok(current.clone());
        }

        tracing::debug!(expiry = ?current.expiry, "Access token expired, refreshing");
        let fresh = refresh_token(
            &self.http,
            &self.token_url,
            &self.config,
            &current.refresh_token,
        )
        .await
        .map_err(|e| {
            tracing::warn!("Token refresh failed: {e}");
            NetatmoError::RefreshFailed(e)
        })?;

        tracing::debug!(expiry = ?fresh.expiry, "Access token refreshed");
        *current = fresh.clone();
        Ok(fresh)
    }
}

impl std::fmt::Debug for RefreshingTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshingTokenProvider")
            .field("token_url", &self.token_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
