//! In-memory host adapter
//!
//! Implements the actor store, the inventory collection, and the message
//! transport over process-local maps. Backs the integration tests and
//! headless demos; real deployments adapt the host's document store instead.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    ActorPatch, ActorStorePort, HostEvent, InventoryError, InventoryPort, MessageTransportPort,
    StoreError, TransportError,
};
use questforge_domain::{ActorId, Character, Item, ItemId};

#[derive(Default)]
pub struct InMemoryHost {
    actors: RwLock<HashMap<ActorId, Character>>,
    items: RwLock<HashMap<ActorId, BTreeMap<ItemId, Item>>>,
    privileged: RwLock<Vec<HostEvent>>,
    broadcasts: RwLock<Vec<HostEvent>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_actor(&self, actor: Character) {
        self.actors.write().await.insert(actor.id, actor);
    }

    pub async fn actor(&self, id: ActorId) -> Option<Character> {
        self.actors.read().await.get(&id).cloned()
    }

    pub async fn insert_item(&self, actor: ActorId, item: Item) {
        self.items
            .write()
            .await
            .entry(actor)
            .or_default()
            .insert(item.id, item);
    }

    pub async fn item(&self, actor: ActorId, item: ItemId) -> Option<Item> {
        self.items
            .read()
            .await
            .get(&actor)
            .and_then(|inventory| inventory.get(&item))
            .cloned()
    }

    /// Events handed to the privileged client so far.
    pub async fn privileged_events(&self) -> Vec<HostEvent> {
        self.privileged.read().await.clone()
    }

    /// Events broadcast to all clients so far.
    pub async fn broadcast_events(&self) -> Vec<HostEvent> {
        self.broadcasts.read().await.clone()
    }
}

#[async_trait]
impl ActorStorePort for InMemoryHost {
    async fn get(&self, id: ActorId) -> Result<Character, StoreError> {
        self.actors
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: ActorId, patch: ActorPatch) -> Result<(), StoreError> {
        let mut actors = self.actors.write().await;
        let actor = actors
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(wounds) = patch.wounds {
            actor.wounds = wounds;
        }
        if let Some(luck) = patch.luck {
            actor.luck = luck;
        }
        if let Some(initiative) = patch.initiative {
            actor.initiative = initiative;
        }
        if let Some(attributes) = patch.attributes {
            actor.attributes = attributes;
        }
        if let Some(details) = patch.details {
            actor.details = details;
        }
        if let Some(equipment) = patch.equipment {
            actor.equipment = equipment;
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryPort for InMemoryHost {
    async fn get(&self, actor: ActorId, item: ItemId) -> Result<Option<Item>, InventoryError> {
        Ok(self.item(actor, item).await)
    }

    async fn list(&self, actor: ActorId) -> Result<Vec<Item>, InventoryError> {
        Ok(self
            .items
            .read()
            .await
            .get(&actor)
            .map(|inventory| inventory.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn update(&self, actor: ActorId, item: &Item) -> Result<(), InventoryError> {
        let mut items = self.items.write().await;
        let inventory = items
            .get_mut(&actor)
            .ok_or_else(|| InventoryError::NotFound {
                actor: actor.to_string(),
                item: item.id.to_string(),
            })?;
        if !inventory.contains_key(&item.id) {
            return Err(InventoryError::NotFound {
                actor: actor.to_string(),
                item: item.id.to_string(),
            });
        }
        inventory.insert(item.id, item.clone());
        Ok(())
    }

    async fn remove(&self, actor: ActorId, item: ItemId) -> Result<(), InventoryError> {
        let mut items = self.items.write().await;
        let removed = items
            .get_mut(&actor)
            .and_then(|inventory| inventory.remove(&item));
        if removed.is_none() {
            return Err(InventoryError::NotFound {
                actor: actor.to_string(),
                item: item.to_string(),
            });
        }
        Ok(())
    }

    async fn create(&self, actor: ActorId, item: &Item) -> Result<Item, InventoryError> {
        self.items
            .write()
            .await
            .entry(actor)
            .or_default()
            .insert(item.id, item.clone());
        Ok(item.clone())
    }
}

#[async_trait]
impl MessageTransportPort for InMemoryHost {
    async fn send_to_privileged(&self, event: HostEvent) -> Result<(), TransportError> {
        self.privileged.write().await.push(event);
        Ok(())
    }

    async fn broadcast(&self, event: HostEvent) -> Result<(), TransportError> {
        self.broadcasts.write().await.push(event);
        Ok(())
    }
}
