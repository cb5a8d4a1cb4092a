pub mod auth;

#[allow(clippy::module_inception)]
pub mod session;

pub mod user;

pub use auth::AuthService;
pub use session::{BootstrapOutcome, Session};
pub use user::{RegisterRequest, Section, UserPublic, UserRole};
