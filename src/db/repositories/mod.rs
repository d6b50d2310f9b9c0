pub mod activity;
pub mod credential;
pub mod reset_token;
pub mod session;
