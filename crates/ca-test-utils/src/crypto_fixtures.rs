//! Deterministic signing keys for testing.
//!
//! Ed25519 keys are derived from a one-byte seed; the RSA key is a fixed
//! 2048-bit fixture. Both publish themselves as JWKs.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use ring::signature::{Ed25519KeyPair, KeyPair};
use serde::Serialize;

/// Ed25519 keypair that signs EdDSA tokens.
pub struct TestKeypair {
    pub kid: String,
    public_key_bytes: Vec<u8>,
    private_key_pkcs8: Vec<u8>,
}

impl TestKeypair {
    /// The same seed always produces the same keypair.
    pub fn new(seed: u8, kid: &str) -> Self {
        let mut seed_bytes = [0u8; 32];
        seed_bytes[0] = seed;
        for (i, byte) in seed_bytes.iter_mut().enumerate().skip(1) {
            *byte = seed.wrapping_mul(i as u8).wrapping_add(i as u8);
        }

        let key_pair = Ed25519KeyPair::from_seed_unchecked(&seed_bytes)
            .expect("Failed to create test keypair");

        Self {
            kid: kid.to_string(),
            public_key_bytes: key_pair.public_key().as_ref().to_vec(),
            private_key_pkcs8: build_pkcs8_from_seed(&seed_bytes),
        }
    }

    /// Sign `claims` with this key, `kid` in the header.
    pub fn sign_token<T: Serialize>(&self, claims: &T) -> String {
        let encoding_key = EncodingKey::from_ed_der(&self.private_key_pkcs8);
        let mut header = Header::new(Algorithm::EdDSA);
        header.typ = Some("JWT".to_string());
        header.kid = Some(self.kid.clone());

        encode(&header, claims, &encoding_key).expect("Failed to sign token")
    }

    /// Public half as an OKP JWK.
    pub fn jwk_json(&self) -> serde_json::Value {
        serde_json::json!({
            "kty": "OKP",
            "kid": self.kid,
            "crv": "Ed25519",
            "x": URL_SAFE_NO_PAD.encode(&self.public_key_bytes),
            "alg": "EdDSA",
            "use": "sig"
        })
    }
}

/// Build a PKCS#8 v1 document from an Ed25519 seed.
fn build_pkcs8_from_seed(seed: &[u8; 32]) -> Vec<u8> {
    let mut pkcs8 = Vec::with_capacity(48);

    // SEQUENCE, 46 bytes
    pkcs8.extend_from_slice(&[0x30, 0x2e]);
    // version INTEGER 0
    pkcs8.extend_from_slice(&[0x02, 0x01, 0x00]);
    // AlgorithmIdentifier { OID 1.3.101.112 }
    pkcs8.extend_from_slice(&[0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70]);
    // privateKey OCTET STRING { OCTET STRING seed }
    pkcs8.extend_from_slice(&[0x04, 0x22, 0x04, 0x20]);
    pkcs8.extend_from_slice(seed);

    pkcs8
}

const RSA_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/rsa_test_key.pem");

/// Modulus of the fixture key, base64url.
const RSA_MODULUS_B64URL: &str = "yfjFNMAPgSiza6zchcTmrTstOXVCV7mOWC5swYYekAFAJuwcaXKgpw8nalFCLv58cycDZQrKtAmNmzakS8F-XOOup0yofuI3NT78ynA3EX5AT0VWfB7AuMiblfqjCklbBRDWVKwCF6J4W3hUdfBYxj88Xe5r7cEAjjbSGTVhxaJGb3E8-4sQRnajQWHylY_fGNo8uhYu8nY511qiRToryZANIXoFvRSZ8zz52wX6dCNz6dwaexRGFt8gqDS34f-yn7UZwS891bTY-NNZ0GM2jauoZ5Cm5HBfJj09wm_G28nZTe-Q_8lZlCIe9xagoAAidfJ7ZOABaTDjTPcb9BdHPQ";

/// Exponent 65537, base64url.
const RSA_EXPONENT_B64URL: &str = "AQAB";

/// RSA key that signs RS256 tokens, as an Auth0 tenant would.
pub struct TestRsaKey {
    pub kid: String,
}

impl TestRsaKey {
    pub fn new(kid: &str) -> Self {
        Self {
            kid: kid.to_string(),
        }
    }

    pub fn sign_token<T: Serialize>(&self, claims: &T) -> String {
        let encoding_key = EncodingKey::from_rsa_pem(RSA_PRIVATE_KEY_PEM.as_bytes())
            .expect("RSA fixture key should parse");
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.kid.clone());

        encode(&header, claims, &encoding_key).expect("Failed to sign token")
    }

    pub fn jwk_json(&self) -> serde_json::Value {
        serde_json::json!({
            "kty": "RSA",
            "kid": self.kid,
            "alg": "RS256",
            "use": "sig",
            "n": RSA_MODULUS_B64URL,
            "e": RSA_EXPONENT_B64URL
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_is_deterministic() {
        let first = TestKeypair::new(1, "k");
        let second = TestKeypair::new(1, "k");
        assert_eq!(first.jwk_json(), second.jwk_json());
    }

    #[test]
    fn test_different_seeds_produce_different_keys() {
        assert_ne!(
            TestKeypair::new(1, "k").jwk_json()["x"],
            TestKeypair::new(2, "k").jwk_json()["x"]
        );
    }

    #[test]
    fn test_signed_token_carries_kid() {
        let token = TestKeypair::new(1, "ed-kid").sign_token(&serde_json::json!({"sub": "x"}));
        let header = jsonwebtoken::decode_header(&token).expect("header should decode");
        assert_eq!(header.kid.as_deref(), Some("ed-kid"));
        assert_eq!(header.alg, Algorithm::EdDSA);
    }

    #[test]
    fn test_rsa_key_signs() {
        let token = TestRsaKey::new("rsa-kid").sign_token(&serde_json::json!({"sub": "x"}));
        let header = jsonwebtoken::decode_header(&token).expect("header should decode");
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("rsa-kid"));
    }
}
