//! Casting Agency Service Library
//!
//! CRUD HTTP backend for actors and movies. Every resource endpoint requires
//! a bearer token issued by an external identity provider and a permission
//! string (`get:actors`, `post:movies`, ...) in that token.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs -> handlers/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - JWKS client and JWT validation
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Authentication, permission gate, HTTP metrics
//! - `models` - Rows, request bodies, response envelopes
//! - `observability` - Prometheus metrics
//! - `repositories` - PostgreSQL access
//! - `routes` - Axum router setup

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
