//! Combat service - melee and ranged attack pipelines
//!
//! One attack roll is evaluated per pipeline run; every selected target is
//! checked independently against that single total. Hit determination for
//! one target never depends on another target's damage application.
//!
//! Damage crossing the trust boundary (a non-privileged client attacking an
//! actor it does not control) is handed to the privileged client over the
//! transport port; delivery is at-most-once and never retried here.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{AttackReport, DamageRouting, TargetReport};
use crate::application::ports::outbound::{
    ActorPatch, ActorStorePort, HostEvent, InventoryPort, MessageTransportPort, RollEvaluatorPort,
};
use crate::error::EngineError;
use questforge_domain::{
    damage_formula, ActorId, AttributeKey, Character, CombatTable, DomainError, Item, ItemId,
    ToHitStrategy,
};

/// The attack die every to-hit comparison reads.
const ATTACK_DIE: &str = "1d6";

/// Orchestrates attack resolution against the host's collaborators.
pub struct CombatService {
    rolls: Arc<dyn RollEvaluatorPort>,
    store: Arc<dyn ActorStorePort>,
    inventory: Arc<dyn InventoryPort>,
    transport: Arc<dyn MessageTransportPort>,
    to_hit: Box<dyn ToHitStrategy>,
}

impl CombatService {
    /// Build a service resolving hits through the fixed combat table.
    pub fn new(
        rolls: Arc<dyn RollEvaluatorPort>,
        store: Arc<dyn ActorStorePort>,
        inventory: Arc<dyn InventoryPort>,
        transport: Arc<dyn MessageTransportPort>,
    ) -> Self {
        Self {
            rolls,
            store,
            inventory,
            transport,
            to_hit: Box::new(CombatTable),
        }
    }

    /// Swap in an alternative to-hit formulation.
    pub fn with_to_hit_strategy(mut self, strategy: Box<dyn ToHitStrategy>) -> Self {
        self.to_hit = strategy;
        self
    }

    /// The minimum attack-roll total needed for these skills, for sheet
    /// tooltips and chat cards.
    pub fn required_roll(
        &self,
        attacker_ws: i32,
        target_ws: i32,
    ) -> Result<i32, DomainError> {
        self.to_hit.required_roll(attacker_ws, target_ws)
    }

    /// Melee attack: the roll is compared per target against the to-hit
    /// strategy indexed by the target's weapon skill.
    ///
    /// Skill validation happens for every target before the die is rolled,
    /// so a validation failure aborts with no state mutated.
    pub async fn melee_attack(
        &self,
        attacker_id: ActorId,
        weapon_id: ItemId,
        target_ids: &[ActorId],
        privileged: bool,
    ) -> Result<AttackReport, EngineError> {
        if target_ids.is_empty() {
            warn!("No targets selected. Select one or more targets to attack.");
            return Err(EngineError::invalid_action("no targets selected"));
        }

        let attacker = self.store.get(attacker_id).await?;
        let weapon = self.fetch_weapon(attacker_id, weapon_id).await?;
        if !weapon.is_melee_weapon() {
            return Err(EngineError::invalid_action(format!(
                "{} is not a melee weapon",
                weapon.name
            )));
        }

        let attacker_ws = attacker.attribute_total(AttributeKey::WeaponSkill);
        let mut checked = Vec::with_capacity(target_ids.len());
        for &target_id in target_ids {
            let target = self.store.get(target_id).await?;
            let target_ws = target.attribute_total(AttributeKey::WeaponSkill);
            let required = self.to_hit.required_roll(attacker_ws, target_ws)?;
            checked.push((target, required));
        }

        let variables = HashMap::from([("weaponSkill".to_string(), attacker_ws)]);
        let roll = self.rolls.evaluate(ATTACK_DIE, &variables).await?;
        debug!(total = roll.total, "melee attack roll");

        let mut targets = Vec::with_capacity(checked.len());
        for (mut target, required) in checked {
            let hit = roll.total >= required;
            let (formula, total, routing) = if hit {
                self.roll_and_route_damage(&weapon, &attacker, &mut target, privileged)
                    .await?
            } else {
                (None, None, DamageRouting::NotApplied)
            };
            targets.push(TargetReport {
                target_id: target.id,
                required_roll: required,
                hit,
                damage_formula: formula,
                damage_total: total,
                routing,
            });
        }

        info!(
            attacker = %attacker.name,
            roll = roll.total,
            hits = targets.iter().filter(|t| t.hit).count(),
            "melee attack resolved"
        );
        Ok(AttackReport {
            attacker_id,
            attack_roll: roll.total,
            targets,
        })
    }

    /// Ranged attack: a hit needs the roll to reach the attacker's own
    /// ballistic skill total; the target's skills play no part.
    pub async fn ranged_attack(
        &self,
        attacker_id: ActorId,
        weapon_id: ItemId,
        target_ids: &[ActorId],
        privileged: bool,
    ) -> Result<AttackReport, EngineError> {
        if target_ids.is_empty() {
            warn!("No targets selected. Select one or more targets to attack.");
            return Err(EngineError::invalid_action("no targets selected"));
        }

        let attacker = self.store.get(attacker_id).await?;
        let weapon = self.fetch_weapon(attacker_id, weapon_id).await?;
        if !weapon.is_ranged_weapon() {
            return Err(EngineError::invalid_action(format!(
                "{} is not a ranged weapon",
                weapon.name
            )));
        }

        let threshold = attacker.attribute_total(AttributeKey::BallisticSkill);
        let variables = HashMap::from([("ballisticSkill".to_string(), threshold)]);
        let roll = self.rolls.evaluate(ATTACK_DIE, &variables).await?;
        debug!(total = roll.total, threshold, "ranged attack roll");

        let mut targets = Vec::with_capacity(target_ids.len());
        for &target_id in target_ids {
            let mut target = self.store.get(target_id).await?;
            let hit = roll.total >= threshold;
            let (formula, total, routing) = if hit {
                self.roll_and_route_damage(&weapon, &attacker, &mut target, privileged)
                    .await?
            } else {
                (None, None, DamageRouting::NotApplied)
            };
            targets.push(TargetReport {
                target_id,
                required_roll: threshold,
                hit,
                damage_formula: formula,
                damage_total: total,
                routing,
            });
        }

        info!(
            attacker = %attacker.name,
            roll = roll.total,
            hits = targets.iter().filter(|t| t.hit).count(),
            "ranged attack resolved"
        );
        Ok(AttackReport {
            attacker_id,
            attack_roll: roll.total,
            targets,
        })
    }

    async fn fetch_weapon(&self, actor: ActorId, item: ItemId) -> Result<Item, EngineError> {
        let found = self.inventory.get(actor, item).await?;
        found.ok_or_else(|| EngineError::invalid_action(format!("item {item} not in inventory")))
    }

    /// Synthesize and evaluate the damage formula for one hit target, then
    /// route the total.
    ///
    /// A formula evaluation failure aborts this target's damage step only:
    /// the miss/hit record survives and the other targets proceed.
    async fn roll_and_route_damage(
        &self,
        weapon: &Item,
        attacker: &Character,
        target: &mut Character,
        privileged: bool,
    ) -> Result<(Option<String>, Option<i32>, DamageRouting), EngineError> {
        let attacker_strength = attacker.attribute_total(AttributeKey::Strength);
        let target_toughness = target.attribute_total(AttributeKey::Toughness);
        let Some(formula) = damage_formula(weapon, attacker_strength, target_toughness) else {
            warn!(item = %weapon.name, "damage requested for a non-weapon");
            return Ok((None, None, DamageRouting::NotApplied));
        };

        let variables = HashMap::from([
            ("strength".to_string(), attacker_strength),
            ("toughness".to_string(), target_toughness),
        ]);
        let outcome = match self.rolls.evaluate(&formula, &variables).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%err, formula, "damage roll failed; skipping this target's damage");
                return Ok((Some(formula), None, DamageRouting::NotApplied));
            }
        };

        let routing = if privileged {
            target.wounds.apply_damage(outcome.total);
            self.store
                .update(target.id, ActorPatch::new().with_wounds(target.wounds))
                .await?;
            DamageRouting::Applied
        } else {
            let event = HostEvent::ApplyDamage {
                actor_id: target.id,
                amount: outcome.total,
            };
            if let Err(err) = self.transport.send_to_privileged(event).await {
                // At-most-once: log and move on, never retry.
                warn!(%err, "privileged damage hand-off failed");
            }
            DamageRouting::Deferred
        };

        Ok((Some(formula), Some(outcome.total), routing))
    }
}
