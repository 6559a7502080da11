use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{AuthConfig, ConfigError};
use crate::constants::token::{ALGORITHM, VALIDITY_DAYS};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),

    /// Bad signature, wrong algorithm or malformed token.
    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account name
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens with a fixed validity window.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &ALGORITHM)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        // Expiry is checked against an explicit clock in `verify_at`.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            validity: Duration::days(VALIDITY_DAYS),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        Self::new(&config.secret_key)
    }

    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        Ok(encode(&Header::new(ALGORITHM), &claims, &self.encoding)?)
    }

    /// Returns the subject of a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Invalid)?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("unit-test-secret").unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn issued_token_verifies_to_subject() {
        let issuer = issuer();
        let token = issuer.issue("alice").unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn token_expires_after_seven_days() {
        let issuer = issuer();
        let now = fixed_now();
        let token = issuer.issue_at("alice", now).unwrap();

        let almost = now + Duration::days(7) - Duration::seconds(1);
        assert_eq!(issuer.verify_at(&token, almost).unwrap(), "alice");

        let expiry = now + Duration::days(7);
        assert!(matches!(
            issuer.verify_at(&token, expiry),
            Err(TokenError::Expired)
        ));
        assert!(matches!(
            issuer.verify_at(&token, expiry + Duration::days(30)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn altered_signature_is_rejected() {
        let issuer = issuer();
        let token = issuer.issue("alice").unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let first = signature.chars().next().unwrap();
        let replacement = if first == 'A' { 'B' } else { 'A' };
        let tampered = format!("{head}.{replacement}{}", &signature[1..]);

        assert!(matches!(
            issuer.verify(&tampered),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn swapped_payload_is_rejected() {
        let issuer = issuer();
        let alice = issuer.issue("alice").unwrap();
        let mallory = issuer.issue("mallory").unwrap();

        let alice_parts: Vec<&str> = alice.split('.').collect();
        let mallory_parts: Vec<&str> = mallory.split('.').collect();
        let forged = format!(
            "{}.{}.{}",
            alice_parts[0], mallory_parts[1], alice_parts[2]
        );

        assert!(matches!(issuer.verify(&forged), Err(TokenError::Invalid)));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = issuer().issue("alice").unwrap();
        let other = TokenIssuer::new("another-secret").unwrap();
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let issuer = issuer();
        assert!(matches!(issuer.verify(""), Err(TokenError::Invalid)));
        assert!(matches!(
            issuer.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        assert!(matches!(
            TokenIssuer::new(""),
            Err(ConfigError::MissingSecret)
        ));
    }
}
