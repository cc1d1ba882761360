//! JWT claims structure.
//!
//! The `sub` field is redacted in Debug output to prevent exposure in logs.

use crate::errors::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Claim set of a verified access token.
///
/// `aud` is checked during verification and not retained.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user or client id) - redacted in Debug output.
    #[serde(default)]
    pub sub: String,

    /// Issuer.
    #[serde(default)]
    pub iss: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Space-separated OAuth scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Permission strings granted by the identity provider's RBAC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iss", &self.iss)
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .field("scope", &self.scope)
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl Claims {
    /// Check that `permission` was granted.
    ///
    /// # Errors
    ///
    /// - `AuthError::PermissionsMissing` - the token carries no permissions list
    /// - `AuthError::PermissionDenied` - the list does not contain `permission`
    pub fn require_permission(&self, permission: &str) -> Result<(), AuthError> {
        let permissions = self
            .permissions
            .as_ref()
            .ok_or(AuthError::PermissionsMissing)?;

        if permissions.iter().any(|p| p == permission) {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn claims_with(permissions: Option<Vec<&str>>) -> Claims {
        Claims {
            sub: "auth0|secret-user".to_string(),
            iss: "https://casting.example.com/".to_string(),
            exp: 1_900_000_000,
            iat: Some(1_899_990_000),
            scope: Some("openid profile".to_string()),
            permissions: permissions.map(|p| p.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn test_claims_debug_redacts_sub() {
        let debug_str = format!("{:?}", claims_with(None));

        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret-user"));
        assert!(debug_str.contains("casting.example.com"));
    }

    #[test]
    fn test_require_permission() {
        let claims = claims_with(Some(vec!["get:actors", "get:movies"]));

        assert!(claims.require_permission("get:actors").is_ok());
        assert_eq!(
            claims.require_permission("delete:actors"),
            Err(AuthError::PermissionDenied)
        );
    }

    #[test]
    fn test_require_permission_without_list() {
        assert_eq!(
            claims_with(None).require_permission("get:actors"),
            Err(AuthError::PermissionsMissing)
        );
        assert_eq!(
            claims_with(Some(vec![])).require_permission("get:actors"),
            Err(AuthError::PermissionDenied)
        );
    }

    #[test]
    fn test_deserialize_auth0_payload() {
        let json = r#"{
            "iss": "https://casting.example.com/",
            "sub": "auth0|123",
            "aud": ["casting", "https://casting.example.com/userinfo"],
            "iat": 1700000000,
            "exp": 1700086400,
            "azp": "client",
            "scope": "openid",
            "permissions": ["get:actors"]
        }"#;

        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.exp, 1_700_086_400);
        assert_eq!(claims.permissions, Some(vec!["get:actors".to_string()]));
    }
}
