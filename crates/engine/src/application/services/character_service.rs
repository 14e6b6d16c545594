//! Character service - actor creation, attribute rolls, wounds management
//!
//! Holds the injected [`GameConfig`]; the table is validated once when the
//! service is built, never consulted as a global.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::dto::AttributeRollReport;
use crate::application::ports::outbound::{ActorPatch, ActorStorePort, RollEvaluatorPort};
use crate::error::EngineError;
use questforge_domain::{
    ActorId, ActorKind, AttributeKey, Character, DomainError, GameConfig, HealAmount, WoundTrack,
};

pub struct CharacterService {
    rolls: Arc<dyn RollEvaluatorPort>,
    store: Arc<dyn ActorStorePort>,
    config: GameConfig,
}

impl CharacterService {
    /// Build the service, validating the injected actor-type table once.
    pub fn new(
        rolls: Arc<dyn RollEvaluatorPort>,
        store: Arc<dyn ActorStorePort>,
        config: GameConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            rolls,
            store,
            config,
        })
    }

    /// Seed a new character from the actor-type table. The host persists the
    /// returned state as part of its document-creation flow.
    pub fn create(&self, name: impl Into<String>, kind: ActorKind) -> Result<Character, DomainError> {
        Character::create_initial_state(name, kind, &self.config)
    }

    /// Run the one-time wounds initialization roll for the actor's type.
    ///
    /// Rejected once the track is initialized; re-rolling goes through
    /// [`CharacterService::reroll_wounds`].
    pub async fn initialize_wounds(&self, actor_id: ActorId) -> Result<WoundTrack, EngineError> {
        let mut actor = self.store.get(actor_id).await?;
        if actor.wounds.is_initialized() {
            return Err(DomainError::invalid_state_transition(
                "wound track already initialized",
            )
            .into());
        }
        let formula = &self.config.actor(actor.actor_kind)?.wounds_roll;
        let outcome = self.rolls.evaluate(formula, &HashMap::new()).await?;
        actor.wounds.initialize(outcome.total)?;
        self.store
            .update(actor_id, ActorPatch::new().with_wounds(actor.wounds))
            .await?;
        info!(actor = %actor.name, total = outcome.total, "wounds initialized");
        Ok(actor.wounds)
    }

    /// Explicit re-roll: overwrites value and max from a fresh roll.
    pub async fn reroll_wounds(&self, actor_id: ActorId) -> Result<WoundTrack, EngineError> {
        let mut actor = self.store.get(actor_id).await?;
        let formula = &self.config.actor(actor.actor_kind)?.wounds_roll;
        let outcome = self.rolls.evaluate(formula, &HashMap::new()).await?;
        actor.wounds.reinitialize(outcome.total);
        self.store
            .update(actor_id, ActorPatch::new().with_wounds(actor.wounds))
            .await?;
        info!(actor = %actor.name, total = outcome.total, "wounds re-rolled");
        Ok(actor.wounds)
    }

    /// Sheet attribute roll: 1d6 plus the attribute's effective total.
    pub async fn roll_attribute(
        &self,
        actor_id: ActorId,
        key: AttributeKey,
    ) -> Result<AttributeRollReport, EngineError> {
        let actor = self.store.get(actor_id).await?;
        let total = actor.attribute_total(key);
        let formula = if total < 0 {
            format!("1d6 - {}", -total)
        } else {
            format!("1d6 + {total}")
        };
        let variables = HashMap::from([(key.as_str().to_string(), total)]);
        let outcome = self.rolls.evaluate(&formula, &variables).await?;
        debug!(actor = %actor.name, %key, total = outcome.total, "attribute rolled");
        Ok(AttributeRollReport {
            attribute: key,
            formula,
            total: outcome.total,
        })
    }

    /// Apply damage to the actor's wounds and persist the new value.
    pub async fn apply_damage(&self, actor_id: ActorId, amount: i32) -> Result<i32, EngineError> {
        let mut actor = self.store.get(actor_id).await?;
        let new_value = actor.wounds.apply_damage(amount);
        self.store
            .update(actor_id, ActorPatch::new().with_wounds(actor.wounds))
            .await?;
        Ok(new_value)
    }

    /// Spend one luck point. Returns the remaining luck.
    pub async fn spend_luck(&self, actor_id: ActorId) -> Result<i32, EngineError> {
        let mut actor = self.store.get(actor_id).await?;
        if actor.luck.value == 0 {
            return Err(EngineError::invalid_action("no luck remaining"));
        }
        let remaining = actor.luck.apply_damage(1);
        self.store
            .update(actor_id, ActorPatch::new().with_luck(actor.luck))
            .await?;
        debug!(actor = %actor.name, remaining, "luck spent");
        Ok(remaining)
    }

    /// Heal the actor's wounds, clamped at max, and persist the new value.
    pub async fn apply_heal(
        &self,
        actor_id: ActorId,
        amount: HealAmount,
    ) -> Result<i32, EngineError> {
        let mut actor = self.store.get(actor_id).await?;
        let new_value = actor.wounds.apply_heal(amount);
        self.store
            .update(actor_id, ActorPatch::new().with_wounds(actor.wounds))
            .await?;
        Ok(new_value)
    }
}
