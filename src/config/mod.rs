pub mod env;
pub mod types;

pub use env::{default_token_file, resolve_token_file};
pub use types::{Config, Endpoints, DEFAULT_BASE_URL, SCOPE};
