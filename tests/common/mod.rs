pub mod http_mock;

use std::sync::{Arc, Mutex};

use netatmo::{Client, Config, Endpoints, Token, TokenUpdateFn};

/// Client pointed at a mock server, recording every token passed to the update callback.
#[allow(dead_code)]
pub fn recording_client(base_url: &str) -> (Client, Arc<Mutex<Vec<Token>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: TokenUpdateFn = Arc::new(move |t: &Token| sink.lock().unwrap().push(t.clone()));
    let endpoints = Endpoints::with_base_url(base_url).unwrap();
    let client = Client::with_endpoints(Config::new("a", "b"), endpoints, Some(callback)).unwrap();
    (client, seen)
}

#[allow(dead_code)]
pub fn expired_token(access: &str, refresh: &str) -> Token {
    Token::new(
        access,
        refresh,
        Some(chrono::Utc::now() - chrono::Duration::minutes(5)),
    )
}

#[allow(dead_code)]
pub fn fresh_token(access: &str, refresh: &str) -> Token {
    Token::new(
        access,
        refresh,
        Some(chrono::Utc::now() + chrono::Duration::hours(3)),
    )
}
