//! JWKS client for fetching and caching the identity provider's public keys.
//!
//! Keys are fetched from the configured `/.well-known/jwks.json` URL and
//! cached with a TTL. An empty or expired cache is refreshed before lookup;
//! an unknown `kid` against a valid cache is rejected without refetching.

use crate::errors::{ApiError, AuthError};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::instrument;

/// Default cache TTL in seconds (5 minutes).
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Timeout for a single JWKS fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON Web Key from the JWKS endpoint.
///
/// RSA keys carry `n` and `e`; OKP (Ed25519) keys carry `crv` and `x`.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type: "RSA" or "OKP".
    pub kty: String,

    /// Key ID - used to select the correct key for verification.
    pub kid: String,

    #[serde(default)]
    pub alg: Option<String>,

    /// Key use (should be "sig").
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,

    /// Curve name ("Ed25519").
    #[serde(default)]
    pub crv: Option<String>,

    /// Ed25519 public key (base64url).
    #[serde(default)]
    pub x: Option<String>,

    /// RSA modulus (base64url).
    #[serde(default)]
    pub n: Option<String>,

    /// RSA public exponent (base64url).
    #[serde(default)]
    pub e: Option<String>,
}

/// JWKS document.
#[derive(Debug, Clone, Deserialize)]
pub struct JwksResponse {
    pub keys: Vec<Jwk>,
}

struct CachedJwks {
    keys: HashMap<String, Jwk>,
    expires_at: Instant,
}

/// Thread-safe JWKS client with a TTL cache.
pub struct JwksClient {
    jwks_url: String,
    http_client: reqwest::Client,
    cache: Arc<RwLock<Option<CachedJwks>>>,
    cache_ttl: Duration,
}

impl JwksClient {
    /// Create a client with the default cache TTL.
    pub fn new(jwks_url: String) -> Self {
        Self::with_ttl(jwks_url, Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
    }

    /// Create a client with a custom cache TTL.
    pub fn with_ttl(jwks_url: String, cache_ttl: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(target: "ca.auth.jwks", error = %e, "Failed to build HTTP client with custom config, using defaults");
                reqwest::Client::new()
            });

        Self {
            jwks_url,
            http_client,
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    /// Get a JWK by key ID.
    ///
    /// # Errors
    ///
    /// - `ApiError::ServiceUnavailable` if the key set cannot be fetched
    /// - `ApiError::Auth(AuthError::UnknownKey)` if no key has this `kid`
    #[instrument(skip(self), name = "ca.auth.jwks.get_key", fields(kid = %kid))]
    pub async fn get_key(&self, kid: &str) -> Result<Jwk, ApiError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.expires_at > Instant::now() {
                    if let Some(key) = cached.keys.get(kid) {
                        tracing::debug!(target: "ca.auth.jwks", kid = %kid, "JWKS cache hit");
                        return Ok(key.clone());
                    }
                    tracing::debug!(target: "ca.auth.jwks", kid = %kid, "Key not found in JWKS cache");
                    return Err(AuthError::UnknownKey.into());
                }
            }
        }

        self.refresh_cache().await?;

        let cache = self.cache.read().await;
        if let Some(key) = cache.as_ref().and_then(|cached| cached.keys.get(kid)) {
            return Ok(key.clone());
        }

        tracing::warn!(target: "ca.auth.jwks", kid = %kid, "Key not found in JWKS after refresh");
        Err(AuthError::UnknownKey.into())
    }

    #[instrument(skip(self), name = "ca.auth.jwks.refresh")]
    async fn refresh_cache(&self) -> Result<(), ApiError> {
        tracing::debug!(target: "ca.auth.jwks", url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(target: "ca.auth.jwks", error = %e, "Failed to fetch JWKS");
                ApiError::ServiceUnavailable(format!("JWKS fetch failed: {e}"))
            })?;

        if !response.status().is_success() {
            tracing::error!(
                target: "ca.auth.jwks",
                status = %response.status(),
                "JWKS endpoint returned error"
            );
            return Err(ApiError::ServiceUnavailable(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response.json().await.map_err(|e| {
            tracing::error!(target: "ca.auth.jwks", error = %e, "Failed to parse JWKS response");
            ApiError::ServiceUnavailable(format!("JWKS response invalid: {e}"))
        })?;

        let keys: HashMap<String, Jwk> = jwks
            .keys
            .into_iter()
            .map(|key| (key.kid.clone(), key))
            .collect();

        tracing::info!(
            target: "ca.auth.jwks",
            key_count = keys.len(),
            "JWKS cache refreshed"
        );

        let now = Instant::now();
        let expires_at = now.checked_add(self.cache_ttl).unwrap_or_else(|| {
            tracing::warn!(
                target: "ca.auth.jwks",
                ttl_seconds = self.cache_ttl.as_secs(),
                "JWKS cache TTL out of range, using default"
            );
            now.checked_add(Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
                .unwrap_or(now)
        });

        let mut cache = self.cache.write().await;
        *cache = Some(CachedJwks { keys, expires_at });

        Ok(())
    }
}
