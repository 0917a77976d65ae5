use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims carried by a session token.
///
/// `manager_id` is the subject's manager linkage, carried through from the
/// identity row at login so authorization does not need a second lookup: a
/// subject with a manager pointer is a technician, one without is a manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: Uuid, manager_id: Option<Uuid>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub,
            manager_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT signing key is not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Signing(jsonwebtoken::errors::Error),

    // Covers tampered, malformed, and expired tokens alike. Callers surface
    // one generic failure; the detail stays in server logs.
    #[error("Invalid JWT token: {0}")]
    Verification(jsonwebtoken::errors::Error),
}

/// Sign `claims` into an opaque token string.
pub fn issue(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(TokenError::Signing)
}

/// Verify a token's signature and expiry, returning its claims.
///
/// The algorithm is pinned to HS256 on this side; the token's own header
/// cannot select a different one. Zero leeway: a token whose expiry is at
/// or before the verification instant is rejected.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(TokenError::Verification)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-key";

    fn technician_claims() -> Claims {
        Claims::new(Uuid::new_v4(), Some(Uuid::new_v4()), 24)
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let claims = technician_claims();
        let token = issue(&claims, SECRET).unwrap();
        let decoded = verify(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn manager_claims_round_trip_without_manager_id() {
        let claims = Claims::new(Uuid::new_v4(), None, 24);
        let token = issue(&claims, SECRET).unwrap();
        let decoded = verify(&token, SECRET).unwrap();
        assert_eq!(decoded.manager_id, None);
        assert_eq!(decoded, claims);
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let token = issue(&technician_claims(), SECRET).unwrap();
        assert!(matches!(
            verify(&token, "a-different-key"),
            Err(TokenError::Verification(_))
        ));
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let token = issue(&technician_claims(), SECRET).unwrap();

        // Flip one byte anywhere in the token; no partial validity.
        for position in [token.len() / 3, token.len() / 2, token.len() - 1] {
            let mut bytes = token.clone().into_bytes();
            bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert!(
                verify(&tampered, SECRET).is_err(),
                "tampered byte at {} was accepted",
                position
            );
        }
    }

    #[test]
    fn verify_rejects_expired_token_with_valid_signature() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            manager_id: None,
            iat: (now - Duration::hours(25)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = issue(&claims, SECRET).unwrap();
        assert!(matches!(
            verify(&token, SECRET),
            Err(TokenError::Verification(_))
        ));
    }

    #[test]
    fn zero_leeway_rejects_a_just_expired_token() {
        // With the jsonwebtoken default leeway of 60s this token would
        // still verify; the codec pins leeway to zero.
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            manager_id: None,
            iat: (now - Duration::hours(1)).timestamp(),
            exp: now.timestamp() - 1,
        };
        let token = issue(&claims, SECRET).unwrap();
        assert!(verify(&token, SECRET).is_err());
    }

    #[test]
    fn verify_rejects_malformed_token() {
        assert!(verify("not.a.token", SECRET).is_err());
        assert!(verify("", SECRET).is_err());
    }

    #[test]
    fn empty_secret_is_refused_on_both_sides() {
        let claims = technician_claims();
        assert!(matches!(issue(&claims, ""), Err(TokenError::MissingSecret)));
        let token = issue(&claims, SECRET).unwrap();
        assert!(matches!(verify(&token, ""), Err(TokenError::MissingSecret)));
    }
}
