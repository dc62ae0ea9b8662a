//! HS256 session tokens binding a numeric `user_id`.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::user::UserId;
use crate::error::{Error, Result};

pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn issue(&self, user: UserId) -> Result<String> {
        let now = Utc::now();
        let claims = Claims { user_id: user.0, iat: now.timestamp(), exp: (now + self.ttl).timestamp() };
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Rejects bad signatures, expired tokens and any algorithm other than HS256.
    pub fn verify(&self, token: &str) -> Result<UserId> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!("token validation failed: {e}");
            Error::InvalidOrExpiredToken
        })?;
        Ok(UserId(data.claims.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify() {
        let issuer = TokenIssuer::new("test-secret");
        let token = issuer.issue(UserId(42)).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), UserId(42));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenIssuer::new("one").issue(UserId(1)).unwrap();
        assert!(matches!(TokenIssuer::new("two").verify(&token), Err(Error::InvalidOrExpiredToken)));
    }

    #[test]
    fn garbage_and_empty_are_rejected() {
        let issuer = TokenIssuer::new("test-secret");
        assert!(matches!(issuer.verify(""), Err(Error::InvalidOrExpiredToken)));
        assert!(matches!(issuer.verify("not.a.token"), Err(Error::InvalidOrExpiredToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new("test-secret");
        let past = Utc::now() - Duration::hours(48);
        let claims = Claims { user_id: 7, iat: past.timestamp(), exp: (past + Duration::hours(1)).timestamp() };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap();
        assert!(matches!(issuer.verify(&token), Err(Error::InvalidOrExpiredToken)));
    }

    #[test]
    fn other_hmac_algorithm_is_rejected() {
        let issuer = TokenIssuer::new("test-secret");
        let now = Utc::now();
        let claims = Claims { user_id: 7, iat: now.timestamp(), exp: (now + Duration::hours(1)).timestamp() };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS512), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap();
        assert!(matches!(issuer.verify(&token), Err(Error::InvalidOrExpiredToken)));
    }
}
