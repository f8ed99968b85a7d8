pub mod cache;
pub mod callback;
pub mod notifying;
pub mod provider;
pub mod token;

pub use cache::{load_token, save_token};
pub use callback::{listen_for_callback, CallbackParams};
pub use notifying::{NotifyingTokenProvider, TokenUpdateFn};
pub use provider::{RefreshingTokenProvider, TokenProvider};
pub use token::{exchange_code, refresh_token, tokens_differ, Token};
