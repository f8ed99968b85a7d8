pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod oauth;
pub mod transport;
pub mod types;
pub mod weather;

pub use client::Client;
pub use config::{Config, Endpoints};
pub use error::{NetatmoError, TokenRequestError};
pub use oauth::{NotifyingTokenProvider, Token, TokenProvider, TokenUpdateFn};
pub use transport::AuthorizedTransport;
pub use types::{DashboardData, Device, DeviceCollection, Module};
