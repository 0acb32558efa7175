//! Signed bearer credentials.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use quillpad_config::AuthConfig;
use quillpad_core::{BlogError, Id};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One hundred years.
pub const MAX_TTL_HOURS: u64 = 24 * 365 * 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Id, username: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            username: username.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn user_id(&self) -> Option<Id> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),
    #[error("token subject '{0}' is not a user id")]
    BadSubject(String),
}

impl TokenError {
    /// The string is not a JWT at all, as opposed to a real token that is
    /// forged, expired or names a bad subject.
    pub fn is_malformed(&self) -> bool {
        use jsonwebtoken::errors::ErrorKind;

        match self {
            TokenError::Rejected(err) => matches!(
                err.kind(),
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_)
            ),
            TokenError::BadSubject(_) => false,
        }
    }
}

/// Issues and checks HS256 tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    /// Lifetimes beyond [`MAX_TTL_HOURS`] are capped.
    pub fn from_config(config: &AuthConfig) -> Self {
        let hours = config.token_ttl_hours().min(MAX_TTL_HOURS) as i64;
        Self::new(config.jwt_secret().as_bytes(), Duration::hours(hours))
    }

    pub fn issue(&self, user_id: Id, username: &str) -> Result<String, BlogError> {
        let claims = Claims::new(user_id, username, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| BlogError::internal(format!("token signing failed: {e}")))
    }

    /// Verifies the signature and expiry and returns the user id the token was issued to.
    pub fn verify(&self, token: &str) -> Result<Id, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)?.claims;
        claims
            .user_id()
            .ok_or_else(|| TokenError::BadSubject(claims.sub.clone()))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}

/// The token part of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", Duration::hours(1))
    }

    #[test]
    fn issued_token_verifies_to_user() {
        let issuer = issuer();
        let token = issuer.issue(42, "ann").unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), 42);
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = issuer().issue(1, "ann").unwrap();
        let other = TokenIssuer::new(b"another-secret", Duration::hours(1));
        assert!(matches!(other.verify(&token), Err(TokenError::Rejected(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new(b"test-secret", Duration::hours(-2));
        let token = issuer.issue(1, "ann").unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[rstest]
    #[case("not-a-token")]
    #[case("a.b")]
    #[case("@@@.@@@.@@@")]
    fn garbage_is_malformed(#[case] token: &str) {
        let err = issuer().verify(token).unwrap_err();
        assert!(err.is_malformed(), "{err}");
    }

    #[test]
    fn forged_or_expired_tokens_are_not_malformed() {
        let forged = TokenIssuer::new(b"another-secret", Duration::hours(1))
            .issue(1, "ann")
            .unwrap();
        assert!(!issuer().verify(&forged).unwrap_err().is_malformed());

        let expired = TokenIssuer::new(b"test-secret", Duration::hours(-2))
            .issue(1, "ann")
            .unwrap();
        assert!(!issuer().verify(&expired).unwrap_err().is_malformed());
    }

    #[test]
    fn claims_carry_username_and_lifetime() {
        let claims = Claims::new(7, "ann", Duration::hours(3));
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "ann");
        assert_eq!(claims.exp - claims.iat, 3 * 3600);
    }

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer  abc ", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearer", None)]
    #[case("Bearer   ", None)]
    #[case("", None)]
    fn bearer_parsing(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }
}
