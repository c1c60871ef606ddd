//! Access token claim inspection
//!
//! The client never verifies token signatures (that is the server's job); it
//! only reads the registered claims to decide whether a preemptive refresh is
//! due before the token is sent.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// Claims the client inspects in an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Expiry, seconds since epoch
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl AccessClaims {
    /// Decode the claims of a JWT without verifying its signature.
    ///
    /// Expired tokens still decode; expiry is the caller's decision to make
    /// via [`AccessClaims::is_expired`].
    pub fn decode(token: &str) -> CoreResult<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::RS256];
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data =
            jsonwebtoken::decode::<Self>(token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(data.claims)
    }

    /// Whether the token was expired at `now` (seconds since epoch)
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp < now
    }

    /// Whether the token is expired right now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};

    fn signed_token(exp: i64) -> String {
        let claims = AccessClaims {
            exp,
            user_id: Some(7),
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    #[test]
    fn decodes_claims_without_verifying_signature() {
        let token = signed_token(Utc::now().timestamp() + 300);
        let claims = AccessClaims::decode(&token).unwrap();
        assert_eq!(claims.user_id, Some(7));
        assert!(!claims.is_expired());
    }

    #[test]
    fn decodes_expired_tokens() {
        let token = signed_token(Utc::now().timestamp() - 300);
        let claims = AccessClaims::decode(&token).unwrap();
        assert!(claims.is_expired());
    }

    #[test]
    fn expiry_comparison_is_strict() {
        let claims = AccessClaims {
            exp: 1_000,
            user_id: None,
        };
        assert!(!claims.is_expired_at(1_000));
        assert!(claims.is_expired_at(1_001));
    }

    #[test]
    fn rejects_garbage() {
        assert!(AccessClaims::decode("not-a-token").is_err());
    }
}
