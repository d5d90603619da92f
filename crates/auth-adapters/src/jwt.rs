//! HS256 JWT implementation of the `AuthTokens` port.

use chrono::{Duration, Utc};
use domains::{AuthTokens, DomainError, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

pub struct JwtTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokens {
    pub fn new(secret: &[u8], ttl_minutes: i64) -> Self {
        JwtTokens {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(ttl_minutes),
        }
    }
}

impl AuthTokens for JwtTokens {
    fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| DomainError::Internal(format!("token signing failed: {err}")))
    }

    fn verify(&self, token: &str) -> Result<Uuid> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| DomainError::Unauthorized("invalid or expired token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_roundtrip() {
        let tokens = JwtTokens::new(b"test-secret", 60);
        let user = Uuid::now_v7();
        let token = tokens.issue(user).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), user);
    }

    #[test]
    fn wrong_key_and_tampering_are_rejected() {
        let tokens = JwtTokens::new(b"test-secret", 60);
        let other = JwtTokens::new(b"other-secret", 60);
        let token = tokens.issue(Uuid::now_v7()).unwrap();

        assert!(matches!(other.verify(&token), Err(DomainError::Unauthorized(_))));
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(tokens.verify(&tampered), Err(DomainError::Unauthorized(_))));
    }
}
