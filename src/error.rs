#[derive(Debug, thiserror::Error)]
pub enum NetatmoError {
    #[error("Not authenticated: no token available. Run: netatmo login")]
    NotAuthenticated,

    #[error("Authorization code exchange failed: {0}")]
    ExchangeFailed(#[source] TokenRequestError),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(#[source] TokenRequestError),

    #[error("got error {code}: {message} (HTTP status {status})")]
    Upstream {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("got non-ok HTTP status {status}: {body}")]
    UpstreamUnstructured { status: u16, body: String },

    #[error("Transport error: {0}")]
    TransportError(Box<dyn std::error::Error + Send + Sync>),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("OAuth callback error: {0}")]
    CallbackError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failure of a single call to the OAuth token endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TokenRequestError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", format_rejection(.status, .error.as_deref(), .description.as_deref(), .body))]
    Rejected {
        status: u16,
        error: Option<String>,
        description: Option<String>,
        body: String,
    },

    #[error("malformed token response: {0}")]
    Malformed(String),

    #[error("token expired and refresh token is not set")]
    NoRefreshToken,
}

fn format_rejection(
    status: &u16,
    error: Option<&str>,
    description: Option<&str>,
    body: &str,
) -> String {
    match (error, description) {
        (Some(e), Some(d)) => format!("token endpoint returned {status}: {e} ({d})"),
        (Some(e), None) => format!("token endpoint returned {status}: {e}"),
        _ => format!("token endpoint returned {status}: {body}"),
    }
}

impl NetatmoError {
    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            NetatmoError::NotAuthenticated => "not_authenticated",
            NetatmoError::ExchangeFailed(_) => "exchange_failed",
            NetatmoError::RefreshFailed(_) => "refresh_failed",
            NetatmoError::Upstream { .. } => "upstream_error",
            NetatmoError::UpstreamUnstructured { .. } => "upstream_error",
            NetatmoError::TransportError(_) => "transport_error",
            NetatmoError::ProtocolError(_) => "parse_error",
            NetatmoError::ConfigError(_) => "config_error",
            NetatmoError::CallbackError(_) => "callback_error",
            NetatmoError::IoError(_) => "io_error",
        }
    }

    /// HTTP status reported by the device endpoint, if this is an upstream error.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetatmoError::Upstream { status, .. } => Some(*status),
            NetatmoError::UpstreamUnstructured { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if let Some(status) = self.status() {
            obj.insert("status".into(), serde_json::Value::from(status));
        }
        if let NetatmoError::Upstream { code, .. } = self {
            obj.insert("upstreamCode".into(), serde_json::Value::from(*code));
        }
        obj.insert("message".into(), serde_json::Value::String(self.to_string()));
        obj.insert("code".into(), serde_json::Value::String(self.code().to_string()));
        serde_json::json!({ "error": obj })
    }
}
