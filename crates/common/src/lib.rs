//! Utilities shared across the Casting Agency crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT utilities (size limit, key ID extraction, iat validation)
pub mod jwt;
