//! Server state management.

use std::sync::Arc;

use revdb_core::VersionedStore;

use crate::rate_limit::RateLimiter;

/// Shared application state.
///
/// The store is constructed once by the caller and shared with the compaction
/// task; handlers only ever reach it through this state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<VersionedStore>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(store: Arc<VersionedStore>, limiter: RateLimiter) -> Self {
        Self {
            store,
            limiter: Arc::new(limiter),
        }
    }
}
