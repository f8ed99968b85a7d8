use std::path::PathBuf;

use crate::error::NetatmoError;

use super::types::{Config, Endpoints};

pub const CLIENT_ID_VAR: &str = "NETATMO_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "NETATMO_CLIENT_SECRET";
pub const BASE_URL_VAR: &str = "NETATMO_BASE_URL";
pub const TOKEN_FILE_VAR: &str = "NETATMO_TOKEN_FILE";

impl Config {
    /// Read the app credentials from `NETATMO_CLIENT_ID` and `NETATMO_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self, NetatmoError> {
        Ok(Self {
            client_id: required_var(CLIENT_ID_VAR)?,
            client_secret: required_var(CLIENT_SECRET_VAR)?,
        })
    }
}

impl Endpoints {
    /// Endpoints rooted at `NETATMO_BASE_URL` if set, the public API otherwise.
    pub fn from_env() -> Result<Self, NetatmoError> {
        match std::env::var(BASE_URL_VAR) {
            Ok(base) if !base.is_empty() => Endpoints::with_base_url(&base),
            _ => Ok(Endpoints::default()),
        }
    }
}

/// `~/.netatmo/token.json`.
pub fn default_token_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".netatmo")
        .join("token.json")
}

/// Token file precedence: explicit path, then `NETATMO_TOKEN_FILE`, then the default.
pub fn resolve_token_file(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    match std::env::var(TOKEN_FILE_VAR) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => default_token_file(),
    }
}

fn required_var(name: &str) -> Result<String, NetatmoError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(NetatmoError::ConfigError(format!(
            "Environment variable '{name}' is not set"
        ))),
    }
}
