pub use super::credentials::Entity as Credentials;
pub use super::login_activity::Entity as LoginActivity;
pub use super::reset_tokens::Entity as ResetTokens;
pub use super::sessions::Entity as Sessions;
