extern crate self as questforge_domain;

pub mod combat;
pub mod config;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export entities (explicit list in entities/mod.rs)
pub use entities::{
    AccessoryKind, ArmorData, ArmorPiece, BodySlot, Character, CharacterDetails, ConsumableData,
    EffectSpec, EquipClass, EquipOutcome, EquipmentSlots, GearData, HealSpec, Item, ItemKind,
    SlotKey, Title, WeaponData, WeaponReach, WeaponRollOptions,
};

pub use error::DomainError;

// Re-export combat strategy types
pub use combat::{damage_formula, CombatTable, SkillRatio, ToHitStrategy, COMBAT_TABLE};

// Re-export configuration
pub use config::{ActorKind, ActorTypeConfig, GameConfig, InitialValues};

// Re-export ID types
pub use ids::{ActorId, EffectId, ItemId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    AttributeEffect, AttributeField, AttributeKey, AttributeMod, DiceExpression, DiceParseError,
    HealAmount, WoundTrack,
};
