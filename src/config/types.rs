use std::fmt;

use crate::error::NetatmoError;

/// Base URL of the Netatmo API. Authorization, token, and device endpoints hang off it.
pub const DEFAULT_BASE_URL: &str = "https://api.netatmo.net/";

/// The only scope this client ever asks for.
pub const SCOPE: &str = "read_station";

/// Application credentials from the Netatmo app registration at
/// <https://dev.netatmo.com/apps>.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
}

impl Config {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

// The secret must never end up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Fully-qualified URLs for the three endpoints the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth_url: String,
    pub token_url: String,
    pub device_url: String,
}

impl Endpoints {
    /// Derive all endpoints from a base URL, e.g. a local mock server.
    pub fn with_base_url(base_url: &str) -> Result<Self, NetatmoError> {
        let mut base = reqwest::Url::parse(base_url).map_err(|e| {
            NetatmoError::ConfigError(format!("Invalid base URL '{base_url}': {e}"))
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| -> Result<String, NetatmoError> {
            base.join(path).map(String::from).map_err(|e| {
                NetatmoError::ConfigError(format!("Invalid endpoint path '{path}': {e}"))
            })
        };

        Ok(Self {
            auth_url: join("oauth2/authorize")?,
            token_url: join("oauth2/token")?,
            device_url: join("api/getstationsdata")?,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_url: format!("{DEFAULT_BASE_URL}oauth2/authorize"),
            token_url: format!("{DEFAULT_BASE_URL}oauth2/token"),
            device_url: format!("{DEFAULT_BASE_URL}api/getstationsdata"),
        }
    }
}
