//! Secret types for values that must never reach logs.
//!
//! Re-exports [`secrecy`]. `SecretString` prints as `[REDACTED]` under
//! `{:?}`, so structs holding one can derive `Debug` safely. The value is
//! zeroized on drop and only reachable through `expose_secret()`.
//!
//! Use `SecretString` for the database URL (it embeds credentials) and for
//! bearer tokens held outside the request path.
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! let url = SecretString::from("postgresql://user:pw@db/casting");
//! assert!(!format!("{url:?}").contains("pw"));
//! assert_eq!(url.expose_secret(), "postgresql://user:pw@db/casting");
//! ```

pub use secrecy::{ExposeSecret, SecretString};
