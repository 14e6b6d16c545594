//! Inventory Port - interface to the actor's item collection
//!
//! Items are owned by the host's inventory; the engine reads their fields,
//! flips equipped flags, decrements consumable uses, and asks for removal
//! when a consumable auto-destroys.

use async_trait::async_trait;

use questforge_domain::{ActorId, Item, ItemId};

/// Errors from inventory operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("Item not found: {item} on actor {actor}")]
    NotFound { actor: String, item: String },

    #[error("Inventory error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

/// Port for the actor-owned item collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryPort: Send + Sync {
    /// Fetch one item; `None` when the id is not in the collection.
    async fn get(&self, actor: ActorId, item: ItemId) -> Result<Option<Item>, InventoryError>;

    /// Every item the actor carries.
    async fn list(&self, actor: ActorId) -> Result<Vec<Item>, InventoryError>;

    /// Persist changed item fields (equipped flag, uses bar).
    async fn update(&self, actor: ActorId, item: &Item) -> Result<(), InventoryError>;

    /// Remove an item from the collection.
    async fn remove(&self, actor: ActorId, item: ItemId) -> Result<(), InventoryError>;

    /// Create a new item in the collection, returning the stored copy.
    async fn create(&self, actor: ActorId, item: &Item) -> Result<Item, InventoryError>;
}
