//! Character entity - the actor aggregate
//!
//! Owns the attribute fields, the wounds and luck tracks, and the equipment
//! slot mapping. Created from the actor-type seed table when the host
//! instantiates an actor document; destroyed with it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{ActorKind, GameConfig};
use crate::entities::equipment::EquipmentSlots;
use crate::error::DomainError;
use crate::ids::ActorId;
use crate::value_objects::{AttributeEffect, AttributeField, AttributeKey, WoundTrack};

/// Honorific derived from level. A pure function of level; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Title {
    Novice,
    Champion,
    Hero,
    Lord,
}

impl Title {
    /// Title band for a level: 1 Novice, 2-4 Champion, 5-8 Hero, 9-10 Lord.
    /// Levels outside 1..=10 have no title.
    pub fn for_level(level: u8) -> Option<Title> {
        match level {
            1 => Some(Self::Novice),
            2..=4 => Some(Self::Champion),
            5..=8 => Some(Self::Hero),
            9..=10 => Some(Self::Lord),
            _ => None,
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Novice => write!(f, "Novice"),
            Self::Champion => write!(f, "Champion"),
            Self::Hero => write!(f, "Hero"),
            Self::Lord => write!(f, "Lord"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDetails {
    pub gold: i64,
    pub level: u8,
}

impl CharacterDetails {
    pub fn new() -> Self {
        Self { gold: 0, level: 1 }
    }
}

impl Default for CharacterDetails {
    fn default() -> Self {
        Self::new()
    }
}

/// The actor aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: ActorId,
    pub name: String,
    pub actor_kind: ActorKind,
    pub attributes: BTreeMap<AttributeKey, AttributeField>,
    /// Seed values before equipment bonuses; `apply_attribute_modifiers`
    /// recomputes each attribute's stored value from these.
    base_values: BTreeMap<AttributeKey, i32>,
    pub wounds: WoundTrack,
    pub luck: WoundTrack,
    pub initiative: i32,
    pub details: CharacterDetails,
    pub equipment: EquipmentSlots,
}

impl Character {
    /// Factory seeded from the actor-type table.
    ///
    /// Wounds start with a null max; the max is set once by the wounds
    /// initialization roll.
    pub fn create_initial_state(
        name: impl Into<String>,
        kind: ActorKind,
        config: &GameConfig,
    ) -> Result<Self, DomainError> {
        let seed = &config.actor(kind)?.initial_values;
        let base_values = seed.attributes.clone();
        let attributes = base_values
            .iter()
            .map(|(&key, &value)| (key, AttributeField::new(value)))
            .collect();
        Ok(Self {
            id: ActorId::new(),
            name: name.into(),
            actor_kind: kind,
            attributes,
            base_values,
            wounds: WoundTrack::uninitialized(),
            luck: WoundTrack::new(seed.luck, seed.luck),
            initiative: seed.initiative,
            details: CharacterDetails {
                gold: seed.gold,
                level: 1,
            },
            equipment: EquipmentSlots::new(),
        })
    }

    pub fn attribute(&self, key: AttributeKey) -> Option<&AttributeField> {
        self.attributes.get(&key)
    }

    /// Effective attribute total; missing attributes read as zero, matching
    /// the sheet's lenient lookups.
    pub fn attribute_total(&self, key: AttributeKey) -> i32 {
        self.attributes.get(&key).map_or(0, AttributeField::total)
    }

    /// Title for the current level, if the level is in a titled band.
    pub fn title(&self) -> Option<Title> {
        Title::for_level(self.details.level)
    }

    pub fn set_level(&mut self, level: u8) -> Result<(), DomainError> {
        if !(1..=10).contains(&level) {
            return Err(DomainError::validation(format!(
                "level must be in 1..=10, got {level}"
            )));
        }
        self.details.level = level;
        Ok(())
    }

    /// Recompute every attribute's stored value as base seed plus the summed
    /// equipment/effect bonuses for that attribute.
    ///
    /// Invoked when embedded equipment or effects change, not on every read.
    /// Transient stacked mods are untouched; `AttributeField::total` folds
    /// them in on read.
    pub fn apply_attribute_modifiers<'a>(
        &mut self,
        effects: impl IntoIterator<Item = &'a AttributeEffect>,
    ) {
        let mut bonus: BTreeMap<AttributeKey, i32> = BTreeMap::new();
        for effect in effects {
            *bonus.entry(effect.attribute).or_default() += effect.amount;
        }
        for (key, field) in &mut self.attributes {
            let base = self.base_values.get(key).copied().unwrap_or(field.value);
            field.value = base + bonus.get(key).copied().unwrap_or(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::AttributeMod;

    fn elf() -> Character {
        Character::create_initial_state("Aelric", ActorKind::Elf, &GameConfig::standard())
            .expect("seeded character")
    }

    #[test]
    fn factory_seeds_from_actor_table() {
        let character = elf();
        assert_eq!(character.attribute_total(AttributeKey::WeaponSkill), 4);
        assert_eq!(character.attribute_total(AttributeKey::Strength), 3);
        assert_eq!(character.initiative, 6);
        assert_eq!(character.details.level, 1);
        assert_eq!(character.wounds.max, None);
    }

    #[test]
    fn title_bands() {
        assert_eq!(Title::for_level(1), Some(Title::Novice));
        assert_eq!(Title::for_level(4), Some(Title::Champion));
        assert_eq!(Title::for_level(5), Some(Title::Hero));
        assert_eq!(Title::for_level(8), Some(Title::Hero));
        assert_eq!(Title::for_level(9), Some(Title::Lord));
        assert_eq!(Title::for_level(11), None);
        assert_eq!(Title::for_level(0), None);
    }

    #[test]
    fn title_follows_level() {
        let mut character = elf();
        assert_eq!(character.title(), Some(Title::Novice));
        character.set_level(6).expect("valid level");
        assert_eq!(character.title(), Some(Title::Hero));
        assert!(character.set_level(11).is_err());
        assert_eq!(character.details.level, 6);
    }

    #[test]
    fn equipment_effects_fold_into_stored_values() {
        let mut character = elf();
        let effects = vec![
            AttributeEffect::new(AttributeKey::Toughness, 2, "Mail Shirt"),
            AttributeEffect::new(AttributeKey::Toughness, 1, "Iron Helm"),
            AttributeEffect::new(AttributeKey::Strength, 1, "Gauntlet"),
        ];
        character.apply_attribute_modifiers(&effects);
        assert_eq!(character.attribute_total(AttributeKey::Toughness), 6);
        assert_eq!(character.attribute_total(AttributeKey::Strength), 4);

        // Re-applying with fewer effects recomputes from the base seed.
        character.apply_attribute_modifiers(&effects[..1]);
        assert_eq!(character.attribute_total(AttributeKey::Toughness), 5);
        assert_eq!(character.attribute_total(AttributeKey::Strength), 3);
    }

    #[test]
    fn transient_mods_stack_on_top_of_equipment_values() {
        let mut character = elf();
        let effects = [AttributeEffect::new(AttributeKey::Strength, 1, "Gauntlet")];
        character.apply_attribute_modifiers(&effects);
        if let Some(field) = character.attributes.get_mut(&AttributeKey::Strength) {
            field.add_mod(AttributeMod::new("Strength Brew", 2));
        }
        assert_eq!(character.attribute_total(AttributeKey::Strength), 6);

        // Equipment recompute leaves transient mods in place.
        character.apply_attribute_modifiers(&effects);
        assert_eq!(character.attribute_total(AttributeKey::Strength), 6);
    }

    #[test]
    fn missing_attribute_reads_as_zero() {
        let mut character = elf();
        character.attributes.remove(&AttributeKey::Pin);
        assert_eq!(character.attribute_total(AttributeKey::Pin), 0);
    }

    #[test]
    fn character_serde_roundtrip() {
        let character = elf();
        let json = serde_json::to_string(&character).expect("serialize");
        let parsed: Character = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, character);
    }
}
