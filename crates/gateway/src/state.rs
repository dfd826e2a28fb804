//! Application state for dependency injection.

use std::sync::Arc;

use user_service_lib::service::UserSync;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_sync: Arc<dyn UserSync>,
}

impl AppState {
    /// Create new app state.
    pub fn new(user_sync: Arc<dyn UserSync>) -> Self {
        Self { user_sync }
    }
}
