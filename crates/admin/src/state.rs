//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::Catalog;
use crate::services::IdentityVerifier;

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Arc<dyn Catalog>,
    identity: IdentityVerifier,
}

impl AppState {
    /// Build state from a persistence gateway and a token verifier.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, identity: IdentityVerifier) -> Self {
        Self {
            inner: Arc::new(AppStateInner { catalog, identity }),
        }
    }

    /// The persistence gateway.
    #[must_use]
    pub fn catalog(&self) -> &dyn Catalog {
        self.inner.catalog.as_ref()
    }

    /// Verifier for bearer tokens.
    #[must_use]
    pub fn identity(&self) -> &IdentityVerifier {
        &self.inner.identity
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("identity", &self.inner.identity)
            .finish_non_exhaustive()
    }
}
