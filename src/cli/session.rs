use std::path::PathBuf;
use std::sync::Arc;

use crate::client::Client;
use crate::config::{env, resolve_token_file, Config, Endpoints};
use crate::error::NetatmoError;
use crate::oauth::cache::{load_token, save_token};
use crate::oauth::notifying::TokenUpdateFn;
use crate::oauth::token::Token;

/// Global command-line options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub base_url: Option<String>,
    pub token_file: Option<String>,
}

impl ClientOptions {
    pub fn config(&self) -> Result<Config, NetatmoError> {
        let client_id = required(self.client_id.as_deref(), "--client-id", env::CLIENT_ID_VAR)?;
        let client_secret = required(
            self.client_secret.as_deref(),
            "--client-secret",
            env::CLIENT_SECRET_VAR,
        )?;
        Ok(Config::new(client_id, client_secret))
    }

    pub fn endpoints(&self) -> Result<Endpoints, NetatmoError> {
        match self.base_url.as_deref() {
            Some(base) => Endpoints::with_base_url(base),
            None => Endpoints::from_env(),
        }
    }

    pub fn token_file(&self) -> PathBuf {
        resolve_token_file(self.token_file.as_deref())
    }
}

fn required(value: Option<&str>, flag: &str, var: &str) -> Result<String, NetatmoError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(NetatmoError::ConfigError(format!(
            "Missing {flag}: pass it on the command line or set {var}"
        ))),
    }
}

/// Build a client that writes every refreshed token back to the token file.
pub fn build_client(opts: &ClientOptions) -> Result<Client, NetatmoError> {
    let path = opts.token_file();
    let persist: TokenUpdateFn = Arc::new(move |token: &Token| {
        if let Err(e) = save_token(&path, token) {
            tracing::warn!("Could not persist refreshed token: {e}");
        }
    });
    Client::with_endpoints(opts.config()?, opts.endpoints()?, Some(persist))
}

/// Build a client and authenticate it with the saved token, if there is one.
pub fn restore_session(opts: &ClientOptions) -> Result<Client, NetatmoError> {
    let client = build_client(opts)?;
    match load_token(&opts.token_file())? {
        Some(token) => client.init_with_token(token),
        None => tracing::debug!("No saved token at {}", opts.token_file().display()),
    }
    Ok(client)
}
