//! Development token minting.
//!
//! In production the identity provider issues tokens; this command signs one
//! with the same shared secret so the API can be exercised locally.
//!
//! # Environment Variables
//!
//! - `IDENTITY_SIGNING_SECRET` - Shared signing secret

use std::time::Duration;

use secrecy::SecretString;

use courtside_admin::services::IdentityVerifier;
use courtside_core::UserId;

use super::CommandError;

/// Print a bearer token for `user` valid for `ttl_hours`.
///
/// # Errors
///
/// Returns `CommandError` if the secret is missing or the user id is invalid.
pub fn issue(user: &str, ttl_hours: u64) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let secret = std::env::var("IDENTITY_SIGNING_SECRET")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("IDENTITY_SIGNING_SECRET"))?;
    let user_id =
        UserId::parse(user).map_err(|e| CommandError::InvalidArgument(format!("user: {e}")))?;

    let ttl = Duration::from_secs(ttl_hours.saturating_mul(3600));
    let token = IdentityVerifier::new(secret).issue(&user_id, ttl)?;

    tracing::info!(user_id = %user_id, ttl_hours, "Issued token");
    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }
    Ok(())
}
