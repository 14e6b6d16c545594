//! Equipment service - slot assignment keyed by drag-and-drop requests
//!
//! The slot computation happens synchronously on a local copy of the actor;
//! one absolute update request is issued afterwards. If the host rejects it
//! the local copy is discarded and the next read re-derives state from the
//! authoritative document, so equipment operations are never half-applied.
//!
//! Invalid requests (unknown slot keys, items missing from the inventory,
//! class/slot mismatches) are silent no-ops logged at diagnostic level -
//! they originate from user drag gestures that may be semantically invalid.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::ports::outbound::{ActorPatch, ActorStorePort, InventoryPort};
use crate::error::EngineError;
use questforge_domain::{
    ActorId, AttributeEffect, Character, EquipOutcome, ItemId, SlotKey,
};

pub struct EquipmentService {
    store: Arc<dyn ActorStorePort>,
    inventory: Arc<dyn InventoryPort>,
}

impl EquipmentService {
    pub fn new(store: Arc<dyn ActorStorePort>, inventory: Arc<dyn InventoryPort>) -> Self {
        Self { store, inventory }
    }

    /// Equip an item into the slot named by the sheet's drop event.
    ///
    /// `requested_slot` accepts concrete keys (`"sword"`, `"ring3"`,
    /// `"amulet"`) and the group aliases `"ring"` / `"bracelet"`, which
    /// assign the first empty slot of the group.
    pub async fn equip(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
        requested_slot: &str,
    ) -> Result<EquipOutcome, EngineError> {
        let mut actor = self.store.get(actor_id).await?;
        let Some(item) = self.inventory.get(actor_id, item_id).await? else {
            debug!(%item_id, "equip target not in inventory; ignoring");
            return Ok(EquipOutcome::Rejected);
        };

        let outcome = match requested_slot.parse::<SlotKey>() {
            Ok(key) => actor.equipment.equip(&item, key),
            Err(_) if requested_slot == "ring" => actor.equipment.equip_ring(&item, None),
            Err(_) if requested_slot == "bracelet" => actor.equipment.equip_bracelet(&item, None),
            Err(err) => {
                debug!(slot = requested_slot, %err, "malformed slot key; ignoring");
                return Ok(EquipOutcome::Rejected);
            }
        };

        if outcome.is_rejected() {
            debug!(item = %item.name, slot = requested_slot, "equip rejected");
            return Ok(outcome);
        }

        self.sync_after_change(actor_id, &mut actor).await?;
        info!(item = %item.name, slot = requested_slot, ?outcome, "item equipped");
        Ok(outcome)
    }

    /// Clear the item's slot, wherever it is.
    pub async fn unequip(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
    ) -> Result<Option<SlotKey>, EngineError> {
        let mut actor = self.store.get(actor_id).await?;
        let Some(cleared) = actor.equipment.unequip(item_id) else {
            debug!(%item_id, "unequip target not equipped; ignoring");
            return Ok(None);
        };

        self.sync_after_change(actor_id, &mut actor).await?;
        info!(%item_id, slot = %cleared, "item unequipped");
        Ok(Some(cleared))
    }

    /// Re-sync derived state after the slot mapping changed: weapon equipped
    /// flags, equipment-sourced attribute values, then one actor update.
    async fn sync_after_change(
        &self,
        actor_id: ActorId,
        actor: &mut Character,
    ) -> Result<(), EngineError> {
        let equipped = actor.equipment.occupant_ids();
        let items = self.inventory.list(actor_id).await?;

        for item in &items {
            let mut item = item.clone();
            let id = item.id;
            if let Some(weapon) = item.as_weapon_mut() {
                let is_equipped = equipped.contains(&id);
                if weapon.equipped != is_equipped {
                    weapon.equipped = is_equipped;
                    self.inventory.update(actor_id, &item).await?;
                }
            }
        }

        // Effects from equippable items apply only while equipped.
        let effects: Vec<AttributeEffect> = items
            .iter()
            .filter(|item| equipped.contains(&item.id))
            .flat_map(|item| item.worn_effects().iter().cloned())
            .collect();
        actor.apply_attribute_modifiers(&effects);

        self.store
            .update(
                actor_id,
                ActorPatch::new()
                    .with_equipment(actor.equipment.clone())
                    .with_attributes(actor.attributes.clone()),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{MockActorStorePort, MockInventoryPort};
    use questforge_domain::{
        ActorKind, AttributeKey, BodySlot, GameConfig, Item, WeaponReach,
    };

    fn elf() -> Character {
        Character::create_initial_state("Aelric", ActorKind::Elf, &GameConfig::standard())
            .expect("seeded character")
    }

    fn store_for(actor: &Character) -> MockActorStorePort {
        let mut store = MockActorStorePort::new();
        let snapshot = actor.clone();
        store.expect_get().returning(move |_| Ok(snapshot.clone()));
        store
    }

    fn inventory_with(items: Vec<Item>) -> MockInventoryPort {
        let mut inventory = MockInventoryPort::new();
        let by_id: std::collections::HashMap<ItemId, Item> =
            items.iter().map(|i| (i.id, i.clone())).collect();
        inventory
            .expect_get()
            .returning(move |_, id| Ok(by_id.get(&id).cloned()));
        inventory
            .expect_list()
            .returning(move |_| Ok(items.clone()));
        inventory.expect_update().returning(|_, _| Ok(()));
        inventory
    }

    #[tokio::test]
    async fn unequipped_sword_dropped_on_boots_lands_in_sword_slot() {
        let actor = elf();
        let blade = Item::weapon("Longsword", WeaponReach::Melee);
        let (actor_id, blade_id) = (actor.id, blade.id);

        let mut store = store_for(&actor);
        store
            .expect_update()
            .withf(move |_, patch| {
                patch
                    .equipment
                    .as_ref()
                    .is_some_and(|slots| slots.sword == Some(blade_id) && slots.boots.is_none())
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let inventory = inventory_with(vec![blade.clone()]);

        let service = EquipmentService::new(Arc::new(store), Arc::new(inventory));
        let outcome = service
            .equip(actor_id, blade_id, "boots")
            .await
            .expect("equip resolves");
        assert_eq!(outcome, EquipOutcome::Placed(SlotKey::Body(BodySlot::Sword)));
    }

    #[tokio::test]
    async fn malformed_slot_key_is_a_silent_no_op() {
        let actor = elf();
        let blade = Item::weapon("Longsword", WeaponReach::Melee);
        let (actor_id, blade_id) = (actor.id, blade.id);

        let mut store = store_for(&actor);
        store.expect_update().never();
        let mut inventory = inventory_with(vec![blade]);
        inventory.expect_update().never();

        let service = EquipmentService::new(Arc::new(store), Arc::new(inventory));
        let outcome = service
            .equip(actor_id, blade_id, "backpack7")
            .await
            .expect("no-op");
        assert!(outcome.is_rejected());
    }

    #[tokio::test]
    async fn missing_item_is_a_silent_no_op() {
        let actor = elf();
        let actor_id = actor.id;

        let mut store = store_for(&actor);
        store.expect_update().never();
        let inventory = inventory_with(vec![]);

        let service = EquipmentService::new(Arc::new(store), Arc::new(inventory));
        let outcome = service
            .equip(actor_id, ItemId::new(), "sword")
            .await
            .expect("no-op");
        assert!(outcome.is_rejected());
    }

    #[tokio::test]
    async fn ring_group_alias_assigns_first_empty_slot() {
        let actor = elf();
        let band = Item::gear("Ring of Ash", questforge_domain::AccessoryKind::Ring);
        let (actor_id, band_id) = (actor.id, band.id);

        let mut store = store_for(&actor);
        store
            .expect_update()
            .withf(move |_, patch| {
                patch
                    .equipment
                    .as_ref()
                    .is_some_and(|slots| slots.rings[0] == Some(band_id))
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let inventory = inventory_with(vec![band.clone()]);

        let service = EquipmentService::new(Arc::new(store), Arc::new(inventory));
        let outcome = service
            .equip(actor_id, band_id, "ring")
            .await
            .expect("equip resolves");
        assert_eq!(outcome, EquipOutcome::Placed(SlotKey::Ring(0)));
    }

    #[tokio::test]
    async fn equipping_armor_folds_its_effects_into_attributes() {
        let actor = elf();
        let mut mail = Item::armor("Mail Shirt", questforge_domain::ArmorPiece::BodyArmor);
        if let questforge_domain::ItemKind::Armor(data) = &mut mail.kind {
            data.effects
                .push(AttributeEffect::new(AttributeKey::Toughness, 1, "Mail Shirt"));
        }
        let (actor_id, mail_id) = (actor.id, mail.id);

        let mut store = store_for(&actor);
        store
            .expect_update()
            .withf(|_, patch| {
                patch.attributes.as_ref().is_some_and(|attrs| {
                    attrs
                        .get(&AttributeKey::Toughness)
                        .is_some_and(|field| field.total() == 4)
                })
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let inventory = inventory_with(vec![mail.clone()]);

        let service = EquipmentService::new(Arc::new(store), Arc::new(inventory));
        let outcome = service
            .equip(actor_id, mail_id, "head")
            .await
            .expect("equip resolves");
        // Armor self-slots regardless of the requested slot.
        assert_eq!(outcome, EquipOutcome::Placed(SlotKey::Body(BodySlot::Body)));
    }

    #[tokio::test]
    async fn unequip_restores_base_attribute_values() {
        let mut actor = elf();
        let mut mail = Item::armor("Mail Shirt", questforge_domain::ArmorPiece::BodyArmor);
        if let questforge_domain::ItemKind::Armor(data) = &mut mail.kind {
            data.effects
                .push(AttributeEffect::new(AttributeKey::Toughness, 1, "Mail Shirt"));
        }
        // Start with the mail equipped and its bonus applied.
        actor.equipment.equip_to_body(&mail, BodySlot::Body);
        let worn: Vec<AttributeEffect> = mail.worn_effects().to_vec();
        actor.apply_attribute_modifiers(&worn);
        assert_eq!(actor.attribute_total(AttributeKey::Toughness), 4);
        let (actor_id, mail_id) = (actor.id, mail.id);

        let mut store = store_for(&actor);
        store
            .expect_update()
            .withf(|_, patch| {
                patch.attributes.as_ref().is_some_and(|attrs| {
                    attrs
                        .get(&AttributeKey::Toughness)
                        .is_some_and(|field| field.total() == 3)
                }) && patch
                    .equipment
                    .as_ref()
                    .is_some_and(|slots| slots.body.is_none())
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let inventory = inventory_with(vec![mail.clone()]);

        let service = EquipmentService::new(Arc::new(store), Arc::new(inventory));
        let cleared = service
            .unequip(actor_id, mail_id)
            .await
            .expect("unequip resolves");
        assert_eq!(cleared, Some(SlotKey::Body(BodySlot::Body)));
    }

    #[tokio::test]
    async fn weapon_equipped_flag_syncs_to_inventory() {
        let actor = elf();
        let blade = Item::weapon("Longsword", WeaponReach::Melee);
        let (actor_id, blade_id) = (actor.id, blade.id);

        let mut store = store_for(&actor);
        store.expect_update().returning(|_, _| Ok(()));
        let mut inventory = MockInventoryPort::new();
        let stored = blade.clone();
        let listed = blade.clone();
        inventory
            .expect_get()
            .returning(move |_, _| Ok(Some(stored.clone())));
        inventory
            .expect_list()
            .returning(move |_| Ok(vec![listed.clone()]));
        inventory
            .expect_update()
            .withf(move |_, item| {
                item.id == blade_id && item.as_weapon().is_some_and(|w| w.equipped)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = EquipmentService::new(Arc::new(store), Arc::new(inventory));
        service
            .equip(actor_id, blade_id, "sword")
            .await
            .expect("equip resolves");
    }
}
