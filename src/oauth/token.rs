use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Config, SCOPE};
use crate::error::TokenRequestError;

/// Tokens are treated as expired this long before their actual expiry, so a
/// request never leaves with a credential that dies in flight.
const EXPIRY_DELTA_SECS: i64 = 10;

/// An OAuth2 token as issued by the Netatmo token endpoint.
///
/// Tokens are never mutated: a refresh always produces a new value.
#[derive(Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expiry: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            refresh_token: refresh_token.into(),
            expiry,
        }
    }

    /// Scheme for the `Authorization` header. Defaults to `Bearer`.
    pub fn auth_type(&self) -> &str {
        if self.token_type.is_empty() {
            "Bearer"
        } else {
            &self.token_type
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            // An expiry too close to the start of time to subtract from is long past.
            Some(expiry) => expiry
                .checked_sub_signed(Duration::seconds(EXPIRY_DELTA_SECS))
                .map_or(true, |deadline| deadline <= now),
            None => false,
        }
    }

    /// A token is usable if it carries an access credential that has not expired.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.is_expired()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("refresh_token", &"<redacted>")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Whether `new` represents different token material than `old`.
///
/// Only the refresh credential, the access credential and the expiry take part
/// in the comparison; the token type does not. Two absent tokens are equal, an
/// absent token differs from any present one.
pub fn tokens_differ(old: Option<&Token>, new: Option<&Token>) -> bool {
    match (old, new) {
        (None, None) => false,
        (None, Some(_)) | (Some(_), None) => true,
        (Some(old), Some(new)) => {
            old.refresh_token != new.refresh_token
                || old.access_token != new.access_token
                || old.expiry != new.expiry
        }
    }
}

/// Raw token response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    // Netatmo sends a misspelled duplicate of `expires_in`.
    #[serde(default)]
    expire_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, now: DateTime<Utc>) -> Result<Token, TokenRequestError> {
        let expiry = match self.expires_in.or(self.expire_in).filter(|secs| *secs > 0) {
            Some(secs) => Some(
                Duration::try_seconds(secs)
                    .and_then(|lifetime| now.checked_add_signed(lifetime))
                    .ok_or_else(|| {
                        TokenRequestError::Malformed(format!("expires_in out of range: {secs}"))
                    })?,
            ),
            None => None,
        };
        Ok(Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_default(),
            refresh_token: self.refresh_token.unwrap_or_default(),
            expiry,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Trade an authorization code for a token.
pub async fn exchange_code(
    http: &reqwest::Client,
    token_url: &str,
    config: &Config,
    code: &str,
    state: &str,
    redirect_uri: Option<&str>,
) -> Result<Token, TokenRequestError> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("state", state),
        ("scope", SCOPE),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];
    if let Some(uri) = redirect_uri {
        form.push(("redirect_uri", uri));
    }
    request_token(http, token_url, &form).await
}

/// Use a refresh credential to obtain a new token.
///
/// If the endpoint does not rotate the refresh credential, the one passed in
/// is carried over to the returned token.
pub async fn refresh_token(
    http: &reqwest::Client,
    token_url: &str,
    config: &Config,
    refresh_tok: &str,
) -> Result<Token, TokenRequestError> {
    if refresh_tok.is_empty() {
        return Err(TokenRequestError::NoRefreshToken);
    }
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_tok),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];
    let mut token = request_token(http, token_url, &form).await?;
    if token.refresh_token.is_empty() {
        token.refresh_token = refresh_tok.to_string();
    }
    Ok(token)
}

async fn request_token(
    http: &reqwest::Client,
    token_url: &str,
    form: &[(&str, &str)],
) -> Result<Token, TokenRequestError> {
    let resp = http.post(token_url).form(form).send().await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();
        return Err(TokenRequestError::Rejected {
            status: status.as_u16(),
            error: parsed.as_ref().map(|e| e.error.clone()),
            description: parsed.and_then(|e| e.error_description),
            body,
        });
    }

    parse_token_response(&body, Utc::now())
}

fn parse_token_response(body: &str, now: DateTime<Utc>) -> Result<Token, TokenRequestError> {
    let token_resp: TokenResponse = serde_json::from_str(body)
        .map_err(|e| TokenRequestError::Malformed(format!("{e}")))?;
    if token_resp.access_token.is_empty() {
        return Err(TokenRequestError::Malformed(
            "server response missing access_token".to_string(),
        ));
    }
    token_resp.into_token(now)
}
