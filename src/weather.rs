use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::NetatmoError;
use crate::transport::AuthorizedTransport;
use crate::types::DeviceCollection;

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Fetch the stations owned by the user, with their modules.
pub async fn read_stations(
    transport: &AuthorizedTransport,
    device_url: &str,
) -> Result<DeviceCollection, NetatmoError> {
    let response = transport
        .get(device_url, &[("app_type", "app_station")])
        .await?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        NetatmoError::TransportError(
            format!("error reading body for status code {}: {e}", status.as_u16()).into(),
        )
    })?;

    if status != StatusCode::OK {
        tracing::debug!(status = status.as_u16(), "Device endpoint returned an error");
        return Err(upstream_error(status.as_u16(), body));
    }

    serde_json::from_str(&body)
        .map_err(|e| NetatmoError::ProtocolError(format!("Failed to parse station data: {e}")))
}

fn upstream_error(status: u16, body: String) -> NetatmoError {
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(resp) if !resp.error.message.is_empty() => NetatmoError::Upstream {
            status,
            code: resp.error.code,
            message: resp.error.message,
        },
        _ => NetatmoError::UpstreamUnstructured { status, body },
    }
}
