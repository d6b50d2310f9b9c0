//! Session token signing and verification.
//!
//! Tokens are HS256 JWTs carrying the student id and display name. Signature
//! verification is a separate check from session-table lookup: a token that
//! fails here signals tampering, not mere absence or expiry.

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Student id
    pub sub: String,

    /// Display name from the directory
    pub name: String,

    /// Session id. Repeat logins within the same second would otherwise
    /// mint byte-identical tokens and collide on the unique token column.
    pub jti: String,

    /// Unix timestamp expiry
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: i64,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    pub fn sign(&self, student_id: &str, name: &str, session_id: &str) -> Result<String> {
        let claims = Claims {
            sub: student_id.to_string(),
            name: name.to_string(),
            jti: session_id.to_string(),
            exp: (Utc::now() + chrono::Duration::minutes(self.ttl_minutes)).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verifies the signature only. Session-table expiry is checked by the
    /// session service before this runs, so `exp` is not validated here;
    /// a stale-but-genuine token must report "expired", never "tampered".
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let signer = TokenSigner::new("test-secret", 30);
        let token = signer.sign("2024-00001", "Juan Dela Cruz", "sess-1").unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "2024-00001");
        assert_eq!(claims.name, "Juan Dela Cruz");
        assert_eq!(claims.jti, "sess-1");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_tokens_distinct_per_session() {
        // Same student, same second; the session id must still make the
        // tokens differ.
        let signer = TokenSigner::new("test-secret", 30);
        let first = signer.sign("2024-00001", "Juan Dela Cruz", "sess-1").unwrap();
        let second = signer.sign("2024-00001", "Juan Dela Cruz", "sess-2").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let signer = TokenSigner::new("test-secret", 30);
        let other = TokenSigner::new("other-secret", 30);

        let token = signer.sign("2024-00001", "Juan Dela Cruz", "sess-1").unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let signer = TokenSigner::new("test-secret", 30);
        let token = signer.sign("2024-00001", "Juan Dela Cruz", "sess-1").unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(signer.verify(&tampered).is_err());
    }

    #[test]
    fn test_stale_token_still_verifies() {
        // exp is the session registry's concern; signature check must not
        // mask a session expiry as tampering.
        let signer = TokenSigner::new("test-secret", -5);
        let token = signer.sign("2024-00002", "Maria Santos", "sess-1").unwrap();
        assert!(signer.verify(&token).is_ok());
    }
}
