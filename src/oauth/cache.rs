use std::path::Path;

use crate::error::NetatmoError;
use crate::oauth::token::Token;

/// Load a previously saved token. A missing file is not an error.
pub fn load_token(path: &Path) -> Result<Option<Token>, NetatmoError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let token = serde_json::from_str(&data).map_err(|e| {
        NetatmoError::ConfigError(format!("Invalid token file {}: {e}", path.display()))
    })?;
    Ok(Some(token))
}

pub fn save_token(path: &Path, token: &Token) -> Result<(), NetatmoError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(token).map_err(|e| {
        NetatmoError::ProtocolError(format!("Failed to serialize token: {e}"))
    })?;
    std::fs::write(path, data)?;
    tracing::debug!(path = %path.display(), "Token saved");
    Ok(())
}
