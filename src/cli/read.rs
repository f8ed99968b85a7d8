use std::io::IsTerminal;

use crate::error::NetatmoError;

use super::output::print_stations;
use super::session::{restore_session, ClientOptions};

/// Fetch and print the user's stations.
pub async fn run_read(opts: &ClientOptions, json: bool) -> Result<(), NetatmoError> {
    let client = restore_session(opts)?;
    let stations = client.read().await?;

    if json {
        let out = serde_json::to_string_pretty(&stations)
            .map_err(|e| NetatmoError::ProtocolError(format!("{e}")))?;
        println!("{out}");
    } else {
        print_stations(&stations, std::io::stdout().is_terminal());
    }
    Ok(())
}

/// Print the current token as JSON, refreshing it first if it expired.
pub async fn run_token(opts: &ClientOptions) -> Result<(), NetatmoError> {
    let client = restore_session(opts)?;
    let token = client.current_token().await?;
    let out = serde_json::to_string_pretty(&token)
        .map_err(|e| NetatmoError::ProtocolError(format!("{e}")))?;
    println!("{out}");
    Ok(())
}
