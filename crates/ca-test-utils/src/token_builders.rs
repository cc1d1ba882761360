//! Builder for test JWT claims.

use chrono::{Duration, Utc};
use serde_json::json;

/// Issuer the test server is configured to accept.
pub const TEST_ISSUER: &str = "https://casting-agency.test/";

/// Audience the test server is configured to accept.
pub const TEST_AUDIENCE: &str = "casting";

/// Builder for test JWT claims.
///
/// Defaults to a token the test server accepts: correct issuer and
/// audience, valid for an hour, with an empty permissions list.
///
/// # Example
/// ```rust,ignore
/// let claims = TestTokenBuilder::new()
///     .with_permissions(&["get:actors", "post:actors"])
///     .expires_in(600)
///     .build();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    iss: String,
    aud: String,
    exp: i64,
    iat: i64,
    permissions: Option<Vec<String>>,
}

impl TestTokenBuilder {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: "auth0|test-user".to_string(),
            iss: TEST_ISSUER.to_string(),
            aud: TEST_AUDIENCE.to_string(),
            exp: (now + Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
            permissions: Some(Vec::new()),
        }
    }

    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    pub fn issuer(mut self, issuer: &str) -> Self {
        self.iss = issuer.to_string();
        self
    }

    pub fn audience(mut self, audience: &str) -> Self {
        self.aud = audience.to_string();
        self
    }

    pub fn with_permissions(mut self, permissions: &[&str]) -> Self {
        self.permissions = Some(permissions.iter().map(ToString::to_string).collect());
        self
    }

    /// Omit the `permissions` claim entirely.
    pub fn without_permissions(mut self) -> Self {
        self.permissions = None;
        self
    }

    /// Set expiration in seconds from now.
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Expired an hour ago, well past any allowed clock skew.
    pub fn expired(self) -> Self {
        self.expires_in(-3600)
    }

    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Build the claims as a JSON value.
    pub fn build(self) -> serde_json::Value {
        let mut claims = json!({
            "sub": self.sub,
            "iss": self.iss,
            "aud": self.aud,
            "exp": self.exp,
            "iat": self.iat,
        });
        if let Some(permissions) = self.permissions {
            claims["permissions"] = json!(permissions);
        }
        claims
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
