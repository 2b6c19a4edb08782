//! Principal tokens issued by the identity provider.
//!
//! The identity provider and the dashboard share a signing secret. A token is
//! `<user_id>.<expires_unix>.<hex hmac>`, where the MAC is HMAC-SHA256 over
//! `v1:<user_id>:<expires_unix>`. The dashboard only verifies; `issue` exists
//! for the CLI and tests.

use std::time::Duration;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use courtside_core::{UserId, UserIdError};

use crate::models::Principal;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a token is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The token is not `<user>.<expires>.<mac>`.
    #[error("malformed token")]
    Malformed,

    /// The user id segment is not a valid user id.
    #[error("invalid user id: {0}")]
    InvalidUserId(#[from] UserIdError),

    /// The token's expiry is in the past.
    #[error("token expired")]
    Expired,

    /// The MAC does not match.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The signing key could not be used.
    #[error("signing key error: {0}")]
    Key(String),
}

/// Verifies (and, for development, issues) principal tokens.
#[derive(Clone)]
pub struct IdentityVerifier {
    signing_secret: SecretString,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("signing_secret", &"[REDACTED]")
            .finish()
    }
}

impl IdentityVerifier {
    /// Create a verifier for the shared signing secret.
    #[must_use]
    pub const fn new(signing_secret: SecretString) -> Self {
        Self { signing_secret }
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    ///
    /// Returns an `IdentityError` describing why the token was rejected.
    pub fn verify(&self, token: &str) -> Result<Principal, IdentityError> {
        self.verify_at(token, unix_now())
    }

    /// Verify a token as of `now` (seconds since the Unix epoch).
    ///
    /// # Errors
    ///
    /// Returns an `IdentityError` describing why the token was rejected.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Principal, IdentityError> {
        let mut parts = token.split('.');
        let (Some(user), Some(expires), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(IdentityError::Malformed);
        };

        let user_id = UserId::parse(user)?;
        let expires_at: i64 = expires.parse().map_err(|_| IdentityError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| IdentityError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(signing_input(&user_id, expires_at).as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| IdentityError::SignatureMismatch)?;

        // Checked after the MAC so forged tokens never learn about expiry.
        if expires_at <= now {
            return Err(IdentityError::Expired);
        }

        debug!(user_id = %user_id, "Principal token verified");
        Ok(Principal::new(user_id))
    }

    /// Issue a token for `user_id` valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Key` if the signing key cannot be used.
    pub fn issue(&self, user_id: &UserId, ttl: Duration) -> Result<String, IdentityError> {
        let ttl = i64::try_from(ttl.as_secs()).map_err(|e| IdentityError::Key(e.to_string()))?;
        self.issue_until(user_id, unix_now().saturating_add(ttl))
    }

    /// Issue a token for `user_id` that expires at `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Key` if the signing key cannot be used.
    pub fn issue_until(&self, user_id: &UserId, expires_at: i64) -> Result<String, IdentityError> {
        let mut mac = self.mac()?;
        mac.update(signing_input(user_id, expires_at).as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{user_id}.{expires_at}.{signature}"))
    }

    fn mac(&self) -> Result<HmacSha256, IdentityError> {
        HmacSha256::new_from_slice(self.signing_secret.expose_secret().as_bytes())
            .map_err(|e| IdentityError::Key(e.to_string()))
    }
}

fn signing_input(user_id: &UserId, expires_at: i64) -> String {
    format!("v1:{user_id}:{expires_at}")
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NOW: i64 = 1_780_000_000;

    fn verifier() -> IdentityVerifier {
        IdentityVerifier::new(SecretString::from("test-signing-secret".to_string()))
    }

    fn user() -> UserId {
        UserId::parse("user_2abcDEF").unwrap()
    }

    #[test]
    fn test_issued_token_verifies() {
        let v = verifier();
        let token = v.issue_until(&user(), NOW + 60).unwrap();
        let principal = v.verify_at(&token, NOW).unwrap();
        assert_eq!(principal.user_id, user());
    }

    #[test]
    fn test_token_matches_manual_mac() {
        let mut mac = HmacSha256::new_from_slice(b"test-signing-secret").unwrap();
        mac.update(format!("v1:user_2abcDEF:{}", NOW + 60).as_bytes());
        let token = format!(
            "user_2abcDEF.{}.{}",
            NOW + 60,
            hex::encode(mac.finalize().into_bytes())
        );
        assert!(verifier().verify_at(&token, NOW).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let v = verifier();
        let token = v.issue_until(&user(), NOW).unwrap();
        assert_eq!(v.verify_at(&token, NOW), Err(IdentityError::Expired));
    }

    #[test]
    fn test_other_secret_rejected() {
        let other = IdentityVerifier::new(SecretString::from("another-secret".to_string()));
        let token = other.issue_until(&user(), NOW + 60).unwrap();
        assert_eq!(
            verifier().verify_at(&token, NOW),
            Err(IdentityError::SignatureMismatch)
        );
    }

    #[test]
    fn test_tampered_user_rejected() {
        let v = verifier();
        let token = v.issue_until(&user(), NOW + 60).unwrap();
        let tampered = token.replacen("user_2abcDEF", "user_evil", 1);
        assert_eq!(
            v.verify_at(&tampered, NOW),
            Err(IdentityError::SignatureMismatch)
        );
    }

    #[test]
    fn test_tampered_expiry_rejected() {
        let v = verifier();
        let token = v.issue_until(&user(), NOW + 60).unwrap();
        let tampered = token.replacen(&(NOW + 60).to_string(), &(NOW + 6000).to_string(), 1);
        assert_eq!(
            v.verify_at(&tampered, NOW),
            Err(IdentityError::SignatureMismatch)
        );
    }

    #[test]
    fn test_malformed_tokens() {
        let v = verifier();
        for token in ["", "abc", "a.b", "a.b.c.d", "user.notanumber.00", "user.10.zz"] {
            assert_eq!(
                v.verify_at(token, NOW),
                Err(IdentityError::Malformed),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_invalid_user_segment() {
        let v = verifier();
        assert!(matches!(
            v.verify_at("bad user.10.00", NOW),
            Err(IdentityError::InvalidUserId(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", verifier());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-signing-secret"));
    }
}
