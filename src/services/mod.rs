pub mod activity_service;
pub mod credential_service;
pub mod credential_service_impl;
pub mod reset_service;
pub mod reset_service_impl;
pub mod session_service;
pub mod session_service_impl;

pub use activity_service::{ActivityService, AttemptStatus};
pub use credential_service::{CredentialError, CredentialService};
pub use credential_service_impl::SeaOrmCredentialServiceImpl;
pub use reset_service::{ResetError, ResetService};
pub use reset_service_impl::SeaOrmResetServiceImpl;
pub use session_service::{ClientContext, SessionError, SessionService};
pub use session_service_impl::SeaOrmSessionServiceImpl;
