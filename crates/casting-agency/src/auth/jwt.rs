//! JWT validation.
//!
//! Validates bearer tokens against keys from the identity provider's JWKS.
//!
//! # Security
//!
//! - Tokens are size-checked before parsing
//! - The algorithm is pinned by the JWK (RS256 for RSA, EdDSA for OKP),
//!   never taken from the token header
//! - `exp`, `aud` and `iss` are always validated; `iat`, when present, may
//!   not be further in the future than the clock skew

use crate::auth::claims::Claims;
use crate::auth::jwks::{Jwk, JwksClient};
use crate::errors::{ApiError, AuthError};
use common::jwt::{decode_ed25519_public_key_jwk, extract_kid, validate_iat};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// JWT validator backed by a [`JwksClient`].
pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    /// Leeway for `exp` and tolerance for future `iat`.
    clock_skew: Duration,
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        clock_skew: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            clock_skew,
        }
    }

    /// Validate a JWT and return its claims.
    ///
    /// 1. Size check and `kid` extraction from the unverified header
    /// 2. Key lookup in the JWKS
    /// 3. Signature, `exp`, `aud` and `iss` verification
    /// 4. `iat` check with clock skew tolerance
    ///
    /// # Errors
    ///
    /// `ApiError::Auth` for every token problem, `ApiError::ServiceUnavailable`
    /// if the key set cannot be fetched.
    #[instrument(skip_all, name = "ca.auth.jwt.validate")]
    pub async fn validate(&self, token: &str) -> Result<Claims, ApiError> {
        let kid = extract_kid(token).map_err(|e| {
            tracing::debug!(target: "ca.auth.jwt", error = ?e, "Token kid extraction failed");
            AuthError::Malformed
        })?;

        let jwk = self.jwks_client.get_key(&kid).await?;

        let claims = self.verify_token(token, &jwk)?;

        if let Some(iat) = claims.iat {
            validate_iat(iat, self.clock_skew).map_err(|e| {
                tracing::debug!(target: "ca.auth.jwt", error = ?e, "Token iat validation failed");
                AuthError::InvalidClaims
            })?;
        }

        tracing::debug!(target: "ca.auth.jwt", "Token validated successfully");
        Ok(claims)
    }

    fn verify_token(&self, token: &str, jwk: &Jwk) -> Result<Claims, AuthError> {
        let (decoding_key, algorithm) = decoding_key(jwk)?;

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = self.clock_skew.as_secs();
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(target: "ca.auth.jwt", error = %e, "Token verification failed");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    ErrorKind::InvalidAudience
                    | ErrorKind::InvalidIssuer
                    | ErrorKind::ImmatureSignature
                    | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
                    _ => AuthError::InvalidToken,
                }
            })
    }
}

/// Build the verification key for a JWK and the only algorithm it accepts.
fn decoding_key(jwk: &Jwk) -> Result<(DecodingKey, Algorithm), AuthError> {
    match jwk.kty.as_str() {
        "RSA" => {
            expect_alg(jwk, "RS256")?;
            let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
                tracing::error!(target: "ca.auth.jwt", kid = %jwk.kid, "RSA JWK missing n or e");
                return Err(AuthError::InvalidToken);
            };
            let key = DecodingKey::from_rsa_components(n, e).map_err(|e| {
                tracing::error!(target: "ca.auth.jwt", error = %e, "Invalid RSA key components");
                AuthError::InvalidToken
            })?;
            Ok((key, Algorithm::RS256))
        }
        "OKP" => {
            expect_alg(jwk, "EdDSA")?;
            if jwk.crv.as_deref().is_some_and(|crv| crv != "Ed25519") {
                tracing::warn!(target: "ca.auth.jwt", kid = %jwk.kid, "Unsupported OKP curve");
                return Err(AuthError::InvalidToken);
            }
            let x = jwk.x.as_deref().ok_or_else(|| {
                tracing::error!(target: "ca.auth.jwt", kid = %jwk.kid, "JWK missing x field");
                AuthError::InvalidToken
            })?;
            let public_key_bytes = decode_ed25519_public_key_jwk(x).map_err(|e| {
                tracing::error!(target: "ca.auth.jwt", error = %e, "Invalid public key encoding");
                AuthError::InvalidToken
            })?;
            Ok((DecodingKey::from_ed_der(&public_key_bytes), Algorithm::EdDSA))
        }
        other => {
            tracing::warn!(target: "ca.auth.jwt", kty = %other, "Unexpected JWK key type");
            Err(AuthError::InvalidToken)
        }
    }
}

fn expect_alg(jwk: &Jwk, expected: &str) -> Result<(), AuthError> {
    match jwk.alg.as_deref() {
        Some(alg) if alg != expected => {
            tracing::warn!(target: "ca.auth.jwt", alg = %alg, kty = %jwk.kty, "JWK algorithm does not match key type");
            Err(AuthError::InvalidToken)
        }
        _ => Ok(()),
    }
}
