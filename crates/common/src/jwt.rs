//! JWT helpers used before and after signature verification.
//!
//! Signature checks live in the service (they need the fetched key set).
//! This module holds the pieces that don't:
//! - a hard size limit applied before any parsing
//! - `kid` extraction from the unverified header, for key selection
//! - `iat` validation with clock skew tolerance
//! - decoding of Ed25519 public keys published as OKP JWKs
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::{extract_kid, validate_iat, DEFAULT_CLOCK_SKEW};
//!
//! let kid = extract_kid(token)?;
//! // ... look up the key, verify the signature ...
//! validate_iat(claims.iat, DEFAULT_CLOCK_SKEW)?;
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum accepted JWT size in bytes (8KB).
///
/// Identity provider access tokens with a full permission list stay well
/// under 2KB. Anything larger is rejected before base64 decoding.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Default clock skew tolerance (5 minutes).
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(300);

/// Upper bound for configurable clock skew (10 minutes).
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(600);

// =============================================================================
// Error Types
// =============================================================================

/// Structural problems found before signature verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds [`MAX_JWT_SIZE_BYTES`].
    #[error("Token exceeds the maximum allowed size")]
    TokenTooLarge,

    /// Token is not `header.payload.signature`, or the header is not base64url JSON.
    #[error("Token is not a well-formed JWT")]
    MalformedToken,

    /// Header has no usable `kid`.
    #[error("Token header has no key ID")]
    MissingKid,

    /// `iat` is further in the future than the clock skew allows.
    #[error("Token issued-at is in the future")]
    IatTooFarInFuture,
}

// =============================================================================
// Functions
// =============================================================================

/// Extract the `kid` (key ID) from a JWT header without verifying the signature.
///
/// The returned value must only be used to look up a key in a trusted key
/// set; the token still has to be verified with that key.
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds `MAX_JWT_SIZE_BYTES`
/// - `MalformedToken` - wrong number of segments, bad base64url, or non-JSON header
/// - `MissingKid` - `kid` absent, empty, or not a string
pub fn extract_kid(token: &str) -> Result<String, JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    let mut parts = token.split('.');
    let (Some(header_part), Some(_), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!(target: "common.jwt", "Token rejected: invalid JWT format");
        return Err(JwtValidationError::MalformedToken);
    };

    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT header base64");
        JwtValidationError::MalformedToken
    })?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT header JSON");
        JwtValidationError::MalformedToken
    })?;

    header
        .get("kid")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or(JwtValidationError::MissingKid)
}

/// Validate the `iat` (issued-at) claim against the current time.
///
/// # Errors
///
/// Returns `JwtValidationError::IatTooFarInFuture` if `iat` is more than
/// `clock_skew` ahead of now.
pub fn validate_iat(iat: i64, clock_skew: Duration) -> Result<(), JwtValidationError> {
    let now = chrono::Utc::now().timestamp();
    validate_iat_at(iat, clock_skew, now)
}

/// `iat` validation against an explicit `now`, for boundary tests.
pub(crate) fn validate_iat_at(
    iat: i64,
    clock_skew: Duration,
    now: i64,
) -> Result<(), JwtValidationError> {
    // clock_skew is bounded by MAX_CLOCK_SKEW
    #[allow(clippy::cast_possible_wrap)]
    let clock_skew_secs = clock_skew.as_secs() as i64;
    let max_iat = now + clock_skew_secs;

    if iat > max_iat {
        tracing::debug!(
            target: "common.jwt",
            iat = iat,
            now = now,
            max_allowed = max_iat,
            "Token rejected: iat too far in the future"
        );
        return Err(JwtValidationError::IatTooFarInFuture);
    }

    Ok(())
}

/// Decode an Ed25519 public key from a JWK `x` field (base64url, no padding).
///
/// # Errors
///
/// Returns `base64::DecodeError` if `x` is not valid base64url.
pub fn decode_ed25519_public_key_jwk(x_b64url: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(x_b64url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_wrap)]
mod tests {
    use super::*;

    fn token_with_header(header: &str) -> String {
        let header_b64 = URL_SAFE_NO_PAD.encode(header);
        format!("{header_b64}.payload.signature")
    }

    #[test]
    fn test_extract_kid_rs256_header() {
        let token = token_with_header(r#"{"alg":"RS256","typ":"JWT","kid":"auth0-key-1"}"#);
        assert_eq!(extract_kid(&token).unwrap(), "auth0-key-1");
    }

    #[test]
    fn test_extract_kid_missing_kid() {
        let token = token_with_header(r#"{"alg":"RS256","typ":"JWT"}"#);
        assert_eq!(extract_kid(&token), Err(JwtValidationError::MissingKid));
    }

    #[test]
    fn test_extract_kid_empty_or_non_string_kid() {
        let empty = token_with_header(r#"{"alg":"RS256","kid":""}"#);
        assert_eq!(extract_kid(&empty), Err(JwtValidationError::MissingKid));

        let numeric = token_with_header(r#"{"alg":"RS256","kid":42}"#);
        assert_eq!(extract_kid(&numeric), Err(JwtValidationError::MissingKid));
    }

    #[test]
    fn test_extract_kid_wrong_segment_count() {
        assert_eq!(extract_kid(""), Err(JwtValidationError::MalformedToken));
        assert_eq!(extract_kid("single"), Err(JwtValidationError::MalformedToken));
        assert_eq!(extract_kid("only.two"), Err(JwtValidationError::MalformedToken));
        assert_eq!(
            extract_kid("one.two.three.four"),
            Err(JwtValidationError::MalformedToken)
        );
    }

    #[test]
    fn test_extract_kid_bad_header_encoding() {
        assert_eq!(
            extract_kid("!!!invalid!!!.payload.signature"),
            Err(JwtValidationError::MalformedToken)
        );
        let not_json = token_with_header("not json");
        assert_eq!(extract_kid(&not_json), Err(JwtValidationError::MalformedToken));
    }

    #[test]
    fn test_extract_kid_size_limit() {
        let oversized = "a".repeat(MAX_JWT_SIZE_BYTES + 1);
        assert_eq!(extract_kid(&oversized), Err(JwtValidationError::TokenTooLarge));

        let header_b64 = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","kid":"key"}"#);
        let filler = MAX_JWT_SIZE_BYTES - header_b64.len() - 2;
        let token = format!("{header_b64}.{}.", "a".repeat(filler));
        assert_eq!(token.len(), MAX_JWT_SIZE_BYTES);
        assert_eq!(extract_kid(&token).unwrap(), "key");
    }

    #[test]
    fn test_validate_iat_now_and_past() {
        let now = chrono::Utc::now().timestamp();
        assert!(validate_iat(now, DEFAULT_CLOCK_SKEW).is_ok());
        assert!(validate_iat(now - 3600, DEFAULT_CLOCK_SKEW).is_ok());
    }

    #[test]
    fn test_validate_iat_far_future() {
        let future = chrono::Utc::now().timestamp() + 86_400;
        assert_eq!(
            validate_iat(future, DEFAULT_CLOCK_SKEW),
            Err(JwtValidationError::IatTooFarInFuture)
        );
    }

    #[test]
    fn test_validate_iat_boundary() {
        let now = 1_700_000_000_i64;
        assert!(validate_iat_at(now + 300, DEFAULT_CLOCK_SKEW, now).is_ok());
        assert_eq!(
            validate_iat_at(now + 301, DEFAULT_CLOCK_SKEW, now),
            Err(JwtValidationError::IatTooFarInFuture)
        );
    }

    #[test]
    fn test_decode_ed25519_public_key_jwk() {
        let x = "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo";
        assert_eq!(decode_ed25519_public_key_jwk(x).unwrap().len(), 32);
        assert!(decode_ed25519_public_key_jwk("not-valid-base64url!!!").is_err());
    }
}
