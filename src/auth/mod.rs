//! Bearer token authentication: authenticator, grants, HTTP middleware.

pub mod authenticator;
pub mod grant;
pub mod middleware;

pub use authenticator::TokenAuthenticator;
pub use grant::{AccessGrant, WILDCARD_SCOPE};
pub use middleware::{bearer_token, require_bearer, AuthError};
