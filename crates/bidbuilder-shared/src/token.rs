//! Signed, time-limited bearer tokens.
//!
//! Tokens are JWTs signed with an HMAC algorithm. The payload carries the
//! user id as the `sub` claim (a string, for compatibility with other JWT
//! consumers) together with `iat` and `exp`.

use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOKEN_TTL_MINUTES;
use crate::error::TokenError;
use crate::types::UserId;

/// Payload stored in the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Issues and validates bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Build an issuer. Only the HMAC family (HS256/HS384/HS512) is accepted
    /// because the signing material is a shared secret.
    pub fn new(secret: &str, algorithm: &str, lifetime: Duration) -> Result<Self, TokenError> {
        let algorithm = Algorithm::from_str(algorithm.trim())
            .map_err(|_| TokenError::UnsupportedAlgorithm(algorithm.to_string()))?;

        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(TokenError::UnsupportedAlgorithm(format!("{algorithm:?}")));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            lifetime,
        })
    }

    /// HS256 issuer with the default 60 minute lifetime.
    pub fn hs256(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            lifetime: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `user_id` with the configured lifetime.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_with_lifetime(user_id, self.lifetime)
    }

    /// Issue a token with an explicit lifetime, overriding the default.
    pub fn issue_with_lifetime(
        &self,
        user_id: UserId,
        lifetime: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: Some(user_id.to_string()),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate signature and expiry, then return the subject as a user id.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            use jsonwebtoken::errors::ErrorKind;
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        let sub = data.claims.sub.ok_or(TokenError::MissingSubject)?;
        sub.parse::<UserId>().map_err(|_| TokenError::Invalid)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
