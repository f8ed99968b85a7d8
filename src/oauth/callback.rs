use std::collections::HashMap;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::NetatmoError;

const MAX_REQUEST_LINE: usize = 4096;

/// Parameters delivered to the redirect URL by the authorization server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// Wait for the browser to hit the local redirect URL and return its parameters.
///
/// The returned `state` is checked against `expected_state`.
pub async fn listen_for_callback(
    listener: TcpListener,
    expected_state: &str,
    timeout: Duration,
) -> Result<CallbackParams, NetatmoError> {
    let accept_future = async {
        let (mut stream, _) = listener.accept().await?;

        // Only the request line matters, and it may arrive over several reads.
        let mut buf = vec![0u8; MAX_REQUEST_LINE];
        let mut filled = 0;
        while filled < buf.len() && !buf[..filled].windows(2).any(|w| w == b"\r\n") {
            let n = stream.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        let request = String::from_utf8_lossy(&buf[..filled]);

        let outcome = parse_callback_request(&request).and_then(|params| {
            if params.state == expected_state {
                Ok(params)
            } else {
                Err(NetatmoError::CallbackError(
                    "State mismatch in callback request".to_string(),
                ))
            }
        });

        let (status, heading) = match &outcome {
            Ok(_) => ("200 OK", "Authentication successful!"),
            Err(_) => ("400 Bad Request", "Authentication failed."),
        };
        let body = format!(
            "<!DOCTYPE html><html><body><h1>{heading}</h1>\
             <p>You can close this window and return to the terminal.</p></body></html>"
        );
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await?;
        stream.shutdown().await?;

        outcome
    };

    tokio::time::timeout(timeout, accept_future)
        .await
        .map_err(|_| {
            NetatmoError::CallbackError(format!(
                "Timed out waiting for OAuth callback after {}s",
                timeout.as_secs()
            ))
        })?
}

fn parse_callback_request(request: &str) -> Result<CallbackParams, NetatmoError> {
    // "GET /callback?code=...&state=... HTTP/1.1"
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| NetatmoError::CallbackError("Malformed callback request".to_string()))?;

    let url = reqwest::Url::parse("http://localhost")
        .and_then(|base| base.join(target))
        .map_err(|e| NetatmoError::CallbackError(format!("Malformed callback target: {e}")))?;
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    if let Some(error) = params.get("error") {
        return Err(NetatmoError::CallbackError(format!(
            "Authorization denied: {error}"
        )));
    }

    let code = params
        .get("code")
        .filter(|c| !c.is_empty())
        .cloned()
        .ok_or_else(|| {
            NetatmoError::CallbackError(
                "No authorization code found in callback request".to_string(),
            )
        })?;

    Ok(CallbackParams {
        code,
        state: params.get("state").cloned().unwrap_or_default(),
    })
}
