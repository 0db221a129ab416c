//! # Token Issue and Verification
//!
//! HS256 JWTs with a fixed five-hour lifetime. The token endpoint
//! accepts an arbitrary JSON payload and keeps its fields as claims;
//! the only requirement is an `email` string.

use chrono::{Duration, Utc};
use hub_core::{doc_str, Document, HubError, HubResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::Claims;

/// Access token lifetime
pub const TOKEN_TTL_HOURS: i64 = 5;

/// Claim fields the issuer controls; client-sent values are discarded
const RESERVED_CLAIMS: [&str; 3] = ["email", "iat", "exp"];

/// Issues and verifies InventoHub access tokens
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Overrides the token lifetime. Tests use this to mint tokens
    /// that are already expired.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Signs the payload into a token. The payload must carry an
    /// `email` string.
    pub fn issue(&self, payload: Document) -> HubResult<String> {
        let claims = self.build_claims(payload)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| HubError::Serialization(format!("failed to sign token: {e}")))
    }

    fn build_claims(&self, mut payload: Document) -> HubResult<Claims> {
        let email = doc_str(&payload, "email")
            .ok_or_else(|| HubError::InvalidRequest("token payload requires an email".into()))?
            .to_string();
        for reserved in RESERVED_CLAIMS {
            payload.remove(reserved);
        }

        let now = Utc::now();
        Ok(Claims {
            email,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            extra: payload,
        })
    }

    /// Decodes a token, checking the signature and expiry
    pub fn verify(&self, token: &str) -> HubResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| HubError::Unauthorized(format!("token rejected: {e}")))
    }
}
