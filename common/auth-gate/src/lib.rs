pub mod authenticator;
pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod options;
pub mod roles;

pub use authenticator::Authenticator;
pub use claims::{derive_context, AuthContext, WireClaims};
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use middleware::{handle, AuthLayer, AuthService};
pub use options::AuthOptions;
pub use roles::ROLE_ADMIN;
