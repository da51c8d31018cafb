// Request authentication delegated to the external auth service

pub mod client;
pub mod errors;
pub mod middleware;

pub use client::{AuthClient, AuthenticatedUser};
pub use errors::AuthError;
pub use middleware::require_auth;
