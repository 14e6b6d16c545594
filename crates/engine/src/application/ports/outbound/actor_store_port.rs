//! Actor Store Port - interface to the host's actor document store
//!
//! Updates are partial, absolute-value patches: re-issuing the same patch is
//! idempotent, so a failed update may be retried by the caller without risk
//! of double-application. The engine never retries on its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use questforge_domain::{
    ActorId, AttributeField, AttributeKey, Character, CharacterDetails, EquipmentSlots, WoundTrack,
};

/// Errors from actor document operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The requesting user may not modify this actor
    #[error("Permission denied updating actor {0}")]
    PermissionDenied(String),

    /// The update raced a newer revision of the document
    #[error("Stale state conflict updating actor {0}")]
    StaleState(String),

    #[error("Actor not found: {0}")]
    NotFound(String),

    /// Host-side failure with operation context
    #[error("Store error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

/// A partial actor update. Absent fields are left untouched by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorPatch {
    pub wounds: Option<WoundTrack>,
    pub luck: Option<WoundTrack>,
    pub initiative: Option<i32>,
    pub attributes: Option<BTreeMap<AttributeKey, AttributeField>>,
    pub details: Option<CharacterDetails>,
    pub equipment: Option<EquipmentSlots>,
}

impl ActorPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wounds(mut self, wounds: WoundTrack) -> Self {
        self.wounds = Some(wounds);
        self
    }

    pub fn with_luck(mut self, luck: WoundTrack) -> Self {
        self.luck = Some(luck);
        self
    }

    pub fn with_attributes(mut self, attributes: BTreeMap<AttributeKey, AttributeField>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_equipment(mut self, equipment: EquipmentSlots) -> Self {
        self.equipment = Some(equipment);
        self
    }
}

/// Port for reading and patching actor documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorStorePort: Send + Sync {
    /// Read the authoritative actor state.
    async fn get(&self, id: ActorId) -> Result<Character, StoreError>;

    /// Issue a single absolute-value update request.
    async fn update(&self, id: ActorId, patch: ActorPatch) -> Result<(), StoreError>;
}
