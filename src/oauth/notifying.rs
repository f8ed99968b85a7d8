use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::NetatmoError;
use crate::oauth::provider::TokenProvider;
use crate::oauth::token::{tokens_differ, Token};

/// Callback invoked with the new token whenever the token material changes.
///
/// Runs while the provider's lock is held: it must return promptly and must
/// not request a token from the same provider.
pub type TokenUpdateFn = Arc<dyn Fn(&Token) + Send + Sync>;

/// Wraps a [`TokenProvider`] and reports every change of token exactly once.
///
/// Retrievals are serialized. The lock is held across the base provider's
/// call, so when many callers find the token expired at the same time only
/// the first one refreshes and the rest see the refreshed token.
pub struct NotifyingTokenProvider<P> {
    base: P,
    callback: TokenUpdateFn,
    last: Mutex<Option<Token>>,
}

impl<P: TokenProvider> NotifyingTokenProvider<P> {
    /// A provider that has observed nothing yet; the first successful
    /// retrieval always notifies.
    pub fn new(base: P, callback: TokenUpdateFn) -> Self {
        Self {
            base,
            callback,
            last: Mutex::new(None),
        }
    }

    /// A provider that treats `seed` as already observed, e.g. a token the
    /// caller just loaded or received.
    pub fn seeded(base: P, seed: Token, callback: TokenUpdateFn) -> Self {
        Self {
            base,
            callback,
            last: Mutex::new(Some(seed)),
        }
    }

    /// The most recently observed token, without touching the base provider.
    pub async fn last_observed(&self) -> Option<Token> {
        self.last.lock().await.clone()
    }
}

#[async_trait]
impl<P: TokenProvider> TokenProvider for NotifyingTokenProvider<P> {
    async fn token(&self) -> Result<Token, NetatmoError> {
        let mut last = self.last.lock().await;

        let token = self.base.token().await?;

        if tokens_differ(last.as_ref(), Some(&token)) {
            tracing::debug!(expiry = ?token.expiry, "Token changed, notifying");
            (self.callback)(&token);
            *last = Some(token.clone());
        }

        Ok(token)
    }
}

impl<P> std::fmt::Debug for NotifyingTokenProvider<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyingTokenProvider").finish_non_exhaustive()
    }
}
