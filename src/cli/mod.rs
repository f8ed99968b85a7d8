pub mod login;
pub mod output;
pub mod read;
pub mod session;
