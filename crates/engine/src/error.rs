//! Unified error type for the application services.

use thiserror::Error;

use crate::application::ports::outbound::{
    InventoryError, RollError, StoreError, TransportError,
};
use questforge_domain::DomainError;

/// Errors surfaced by the engine services.
///
/// Domain validation failures abort before any state mutates; port failures
/// are surfaced without automatic retry - updates are absolute values, so
/// the caller may safely re-issue them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Roll(#[from] RollError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The requested action does not apply to the addressed item or actor
    /// (e.g. a ranged attack with a melee weapon).
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

impl EngineError {
    pub fn invalid_action(msg: impl Into<String>) -> Self {
        Self::InvalidAction(msg.into())
    }
}
