//! Message Transport Port - relay for cross-client events
//!
//! Damage against an actor the current client does not control is handed to
//! the privileged client through this port. Delivery is at-most-once with no
//! acknowledgement; the engine never retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use questforge_domain::ActorId;

/// Events relayed between clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// Apply `amount` damage to the actor's wounds on the privileged client
    ApplyDamage { actor_id: ActorId, amount: i32 },
}

/// Errors from the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Transport send failed: {0}")]
    SendFailed(String),
}

/// Port for the host's socket relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageTransportPort: Send + Sync {
    /// Hand an event to the privileged client.
    async fn send_to_privileged(&self, event: HostEvent) -> Result<(), TransportError>;

    /// Broadcast an event to every connected client.
    async fn broadcast(&self, event: HostEvent) -> Result<(), TransportError>;
}
