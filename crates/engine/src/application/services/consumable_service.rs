//! Consumable service - the item use pipeline
//!
//! Healing first, then effect duplication onto the actor, then the uses bar
//! decrement and the auto-destroy check. A formula failure aborts the whole
//! action before anything mutates, so a broken potion is never consumed.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::dto::ConsumableReport;
use crate::application::ports::outbound::{
    ActorPatch, ActorStorePort, InventoryPort, RollEvaluatorPort,
};
use crate::error::EngineError;
use questforge_domain::{ActorId, AttributeMod, HealAmount, ItemId};

pub struct ConsumableService {
    rolls: Arc<dyn RollEvaluatorPort>,
    store: Arc<dyn ActorStorePort>,
    inventory: Arc<dyn InventoryPort>,
}

impl ConsumableService {
    pub fn new(
        rolls: Arc<dyn RollEvaluatorPort>,
        store: Arc<dyn ActorStorePort>,
        inventory: Arc<dyn InventoryPort>,
    ) -> Self {
        Self {
            rolls,
            store,
            inventory,
        }
    }

    /// Use a consumable owned by the actor.
    pub async fn use_item(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
    ) -> Result<ConsumableReport, EngineError> {
        let mut actor = self.store.get(actor_id).await?;
        let mut item = self
            .inventory
            .get(actor_id, item_id)
            .await?
            .ok_or_else(|| {
                EngineError::invalid_action(format!("item {item_id} not in inventory"))
            })?;
        let consumable = item
            .as_consumable()
            .cloned()
            .ok_or_else(|| EngineError::invalid_action(format!("{} is not consumable", item.name)))?;

        if consumable.uses.is_depleted() {
            return Err(EngineError::invalid_action(format!(
                "{} has no uses remaining",
                item.name
            )));
        }

        // Resolve the heal roll before mutating anything, so a formula
        // failure aborts the action with state intact.
        let heal = &consumable.heal;
        let mut healed = None;
        if heal.apply_heal {
            if heal.heal_all {
                healed = Some(actor.wounds.apply_heal(HealAmount::All));
            } else if let Some(formula) = heal.formula.as_deref() {
                let outcome = self
                    .rolls
                    .evaluate(formula, &HashMap::new())
                    .await?;
                healed = Some(actor.wounds.apply_heal(HealAmount::Amount(outcome.total)));
            } else {
                debug!(item = %item.name, "heal requested without a formula; skipping");
            }
        }

        // Duplicate the attached effect definitions onto the actor as
        // transient attribute mods.
        let mut effects_applied = 0;
        if consumable.effect.apply_effect {
            for effect in &consumable.effect.effects {
                if let Some(field) = actor.attributes.get_mut(&effect.attribute) {
                    field.add_mod(AttributeMod::new(effect.label.clone(), effect.amount));
                    effects_applied += 1;
                } else {
                    debug!(
                        attribute = %effect.attribute,
                        "consumable effect targets an attribute the actor lacks"
                    );
                }
            }
        }

        let uses_remaining = match item.as_consumable_mut() {
            Some(data) => data.uses.apply_damage(1),
            None => 0,
        };
        let destroyed = consumable.auto_destroy && uses_remaining == 0;
        if destroyed {
            self.inventory.remove(actor_id, item_id).await?;
        } else {
            self.inventory.update(actor_id, &item).await?;
        }

        self.store
            .update(
                actor_id,
                ActorPatch::new()
                    .with_wounds(actor.wounds)
                    .with_attributes(actor.attributes.clone()),
            )
            .await?;

        info!(
            item = %item.name,
            healed = ?healed,
            effects = effects_applied,
            uses_remaining,
            destroyed,
            "consumable used"
        );
        Ok(ConsumableReport {
            healed,
            effects_applied,
            uses_remaining,
            destroyed,
        })
    }
}
