pub mod prelude;

pub mod credentials;
pub mod login_activity;
pub mod reset_tokens;
pub mod sessions;
