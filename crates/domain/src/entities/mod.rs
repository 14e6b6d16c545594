//! Entities - domain objects with identity and lifecycle

mod character;
mod equipment;
mod item;

pub use character::{Character, CharacterDetails, Title};
pub use equipment::{
    BodySlot, EquipOutcome, EquipmentSlots, SlotKey, BRACELET_SLOTS, RING_SLOTS,
};
pub use item::{
    AccessoryKind, ArmorData, ArmorPiece, ConsumableData, EffectSpec, EquipClass, GearData,
    HealSpec, Item, ItemKind, WeaponData, WeaponReach, WeaponRollOptions,
};
