//! Global application state.
//!
//! Used for access to common resources such as the item repository.

use crate::feature::item::item_repository::DynItemRepository;
use axum::extract::FromRef;

/// Global application state.
///
/// Holds the repository handle injected at construction time and shared by
/// every request handler.
#[derive(Clone, FromRef)]
pub struct AppState {
    items: DynItemRepository,
}

impl AppState {
    /// Constructs a new [`AppState`].
    pub fn new(items: DynItemRepository) -> Self {
        Self { items }
    }

    /// Returns the item repository.
    pub fn items(&self) -> &DynItemRepository {
        &self.items
    }
}
