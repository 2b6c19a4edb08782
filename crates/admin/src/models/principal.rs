//! Authenticated request identity.

use serde::{Deserialize, Serialize};

use courtside_core::UserId;

/// The verified identity behind a request.
///
/// Produced once per request by the authentication middleware and handed to
/// the service layer explicitly; nothing reads it from ambient context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Identity-provider user id.
    pub user_id: UserId,
}

impl Principal {
    /// Create a principal for `user_id`.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
