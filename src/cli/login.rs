use std::time::Duration;

use tokio::net::TcpListener;

use crate::error::NetatmoError;
use crate::oauth::cache::save_token;
use crate::oauth::callback::listen_for_callback;

use super::session::{build_client, ClientOptions};

/// Print the authorization URL for a manual login.
pub fn run_auth_url(
    opts: &ClientOptions,
    redirect_url: &str,
    state: Option<&str>,
) -> Result<(), NetatmoError> {
    let client = build_client(opts)?;
    let state = state.map(str::to_string).unwrap_or_else(new_state);
    let url = client.auth_code_url(redirect_url, &state)?;
    println!("{url}");
    Ok(())
}

/// Exchange a code obtained through a manual login and save the token.
pub async fn run_exchange(
    opts: &ClientOptions,
    code: &str,
    state: &str,
    redirect_url: Option<&str>,
) -> Result<(), NetatmoError> {
    let client = build_client(opts)?;
    if let Some(redirect_url) = redirect_url {
        // The token endpoint checks the redirect URL against the one used at login.
        client.auth_code_url(redirect_url, state)?;
    }
    client.exchange(code, state).await?;
    persist_current_token(opts, &client).await
}

/// Full browser login: open the authorization page, catch the redirect on a
/// local port, exchange the code, save the token.
pub async fn run_login(
    opts: &ClientOptions,
    port: u16,
    timeout: Duration,
) -> Result<(), NetatmoError> {
    let client = build_client(opts)?;

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let port = listener.local_addr()?.port();
    let redirect_url = format!("http://localhost:{port}/callback");

    let state = new_state();
    let auth_url = client.auth_code_url(&redirect_url, &state)?;

    if webbrowser::open(&auth_url).is_err() {
        tracing::warn!("Could not open browser automatically");
    }
    eprintln!("If your browser did not open, visit:\n{auth_url}");

    let params = listen_for_callback(listener, &state, timeout).await?;
    client.exchange(&params.code, &params.state).await?;
    persist_current_token(opts, &client).await
}

async fn persist_current_token(
    opts: &ClientOptions,
    client: &crate::client::Client,
) -> Result<(), NetatmoError> {
    let token = client.current_token().await?;
    let path = opts.token_file();
    save_token(&path, &token)?;
    println!("Authentication successful. Token saved to {}", path.display());
    if let Some(expiry) = token.expiry {
        println!("Token expires: {}", expiry.to_rfc3339());
    }
    Ok(())
}

fn new_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
