//! # Casting Agency Test Utilities
//!
//! Shared test utilities for the Casting Agency service.
//!
//! This crate provides:
//! - Deterministic signing keys (`TestKeypair` for EdDSA, `TestRsaKey` for RS256)
//! - Claim builders (`TestTokenBuilder`)
//! - A wiremock-backed JWKS endpoint (`mount_jwks`)
//! - Server test harness (`TestCastingServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ca_test_utils::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: PgPool) -> Result<()> {
//!     let server = TestCastingServer::spawn(pool).await?;
//!     let token = server.token_with_permissions(&["get:actors"]);
//!
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/actors", server.url()))
//!         .bearer_auth(token)
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod crypto_fixtures;
pub mod jwks_mock;
pub mod server_harness;
pub mod token_builders;

pub use crypto_fixtures::*;
pub use jwks_mock::*;
pub use server_harness::*;
pub use token_builders::*;
