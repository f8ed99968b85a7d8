use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use crate::config::{Config, Endpoints, SCOPE};
use crate::error::NetatmoError;
use crate::oauth::notifying::{NotifyingTokenProvider, TokenUpdateFn};
use crate::oauth::provider::{RefreshingTokenProvider, TokenProvider};
use crate::oauth::token::{exchange_code, Token};
use crate::transport::AuthorizedTransport;
use crate::types::DeviceCollection;
use crate::weather::read_stations;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Netatmo weather station API.
///
/// A new client is unauthenticated. It becomes authenticated through
/// [`Client::exchange`] or [`Client::init_with_token`]; both can be called
/// again later and replace the previous session outright.
pub struct Client {
    config: Config,
    endpoints: Endpoints,
    http: reqwest::Client,
    update_callback: Option<TokenUpdateFn>,
    redirect_url: Mutex<Option<String>>,
    session: RwLock<Option<AuthorizedTransport>>,
}

impl Client {
    /// Create an unauthenticated client against the public Netatmo API.
    ///
    /// `update_callback` is called with every new token, e.g. to persist it.
    pub fn new(
        config: Config,
        update_callback: Option<TokenUpdateFn>,
    ) -> Result<Self, NetatmoError> {
        Self::with_endpoints(config, Endpoints::default(), update_callback)
    }

    pub fn with_endpoints(
        config: Config,
        endpoints: Endpoints,
        update_callback: Option<TokenUpdateFn>,
    ) -> Result<Self, NetatmoError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| NetatmoError::TransportError(Box::new(e)))?;
        Ok(Self::with_http_client(config, endpoints, http, update_callback))
    }

    /// Use a preconfigured `reqwest::Client` for both token and data requests.
    pub fn with_http_client(
        config: Config,
        endpoints: Endpoints,
        http: reqwest::Client,
        update_callback: Option<TokenUpdateFn>,
    ) -> Self {
        Self {
            config,
            endpoints,
            http,
            update_callback,
            redirect_url: Mutex::new(None),
            session: RwLock::new(None),
        }
    }

    /// Build the URL the user visits to grant access.
    ///
    /// `redirect_url` is remembered and sent again by [`Client::exchange`].
    pub fn auth_code_url(&self, redirect_url: &str, state: &str) -> Result<String, NetatmoError> {
        let url = reqwest::Url::parse_with_params(
            &self.endpoints.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", redirect_url),
                ("scope", SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| {
            NetatmoError::ConfigError(format!(
                "Invalid authorization URL '{}': {e}",
                self.endpoints.auth_url
            ))
        })?;

        *self
            .redirect_url
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(redirect_url.to_string());
        Ok(url.into())
    }

    /// Exchange an authorization code for a token and authenticate the client.
    ///
    /// On failure the client keeps whatever session it had before.
    pub async fn exchange(&self, code: &str, state: &str) -> Result<(), NetatmoError> {
        let redirect_url = self
            .redirect_url
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        let token = exchange_code(
            &self.http,
            &self.endpoints.token_url,
            &self.config,
            code,
            state,
            redirect_url.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::warn!("Authorization code exchange failed: {e}");
            NetatmoError::ExchangeFailed(e)
        })?;

        tracing::info!("Authorization code exchanged");
        self.init_with_token(token);
        Ok(())
    }

    /// Authenticate the client with an existing token, e.g. one loaded from disk.
    ///
    /// The token counts as already observed: no update callback fires until
    /// it actually changes.
    pub fn init_with_token(&self, token: Token) {
        let base = RefreshingTokenProvider::new(
            self.http.clone(),
            &self.endpoints.token_url,
            self.config.clone(),
            token.clone(),
        );
        let provider: Arc<dyn TokenProvider> = match &self.update_callback {
            Some(callback) => Arc::new(NotifyingTokenProvider::seeded(
                base,
                token,
                Arc::clone(callback),
            )),
            None => Arc::new(base),
        };

        let transport = AuthorizedTransport::new(self.http.clone(), provider);
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(transport);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// The current token, refreshed first if it has expired.
    ///
    /// Goes through the same provider as regular requests, so a refresh here
    /// also triggers the update callback.
    pub async fn current_token(&self) -> Result<Token, NetatmoError> {
        let transport = self.session()?;
        transport.provider().token().await
    }

    /// Stations owned by the user and their modules.
    pub async fn read(&self) -> Result<DeviceCollection, NetatmoError> {
        let transport = self.session()?;
        read_stations(&transport, &self.endpoints.device_url).await
    }

    // Requests work on a snapshot of the session, so a concurrent
    // init_with_token never swaps the transport out from under them.
    fn session(&self) -> Result<AuthorizedTransport, NetatmoError> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or(NetatmoError::NotAuthenticated)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("endpoints", &self.endpoints)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
