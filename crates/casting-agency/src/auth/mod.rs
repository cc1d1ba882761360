//! Token verification.
//!
//! - `claims` - verified claim set and permission checks
//! - `jwks` - identity provider key set, fetched and cached
//! - `jwt` - signature and registered-claim validation

pub mod claims;
pub mod jwks;
pub mod jwt;

pub use claims::Claims;
pub use jwks::JwksClient;
pub use jwt::JwtValidator;
