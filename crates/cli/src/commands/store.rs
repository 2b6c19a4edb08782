//! Store bootstrap command.
//!
//! Creates the first store for a user so the dashboard has a tenant to open.

use courtside_admin::db::{Catalog, PgCatalog};
use courtside_core::UserId;

use super::{CommandError, connect};

/// Create a store owned by `user`.
///
/// # Errors
///
/// Returns `CommandError` if the arguments are invalid or the insert fails.
pub async fn create(user: &str, name: &str) -> Result<(), CommandError> {
    let owner =
        UserId::parse(user).map_err(|e| CommandError::InvalidArgument(format!("user: {e}")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::InvalidArgument(
            "name must not be empty".to_string(),
        ));
    }

    let catalog = PgCatalog::new(connect().await?);
    let store = catalog.create_store(&owner, name).await?;

    tracing::info!(
        store_id = %store.id,
        user_id = %owner,
        "Store created: {}",
        store.name
    );
    Ok(())
}
