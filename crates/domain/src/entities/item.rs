//! Item entity - weapons, armor, gear accessories, and consumables
//!
//! Items are owned by the actor's inventory collection (a host collaborator);
//! the rules core reads their fields to build formulas and slot placements
//! but does not own item lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::equipment::BodySlot;
use crate::ids::ItemId;
use crate::value_objects::{AttributeEffect, WoundTrack};

/// Whether a weapon strikes in melee or at range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeaponReach {
    Melee,
    Ranged,
}

impl fmt::Display for WeaponReach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Melee => write!(f, "melee"),
            Self::Ranged => write!(f, "ranged"),
        }
    }
}

impl FromStr for WeaponReach {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "melee" => Ok(Self::Melee),
            "ranged" => Ok(Self::Ranged),
            _ => Err(()),
        }
    }
}

/// Damage-roll options carried by a weapon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponRollOptions {
    /// Skip the target's toughness deduction
    pub ignore_armor: bool,
    /// Extra d6s added to the base damage die
    #[serde(default)]
    pub extra_dices: u32,
    /// Optional signed formula fragment appended to the damage roll
    /// (e.g. `"+2"`, `"- 1d4"`)
    pub damage_modifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponData {
    pub reach: WeaponReach,
    pub equipped: bool,
    /// Ranged weapons carry their own strength; melee weapons use the
    /// wielder's.
    pub strength: Option<i32>,
    pub roll_options: WeaponRollOptions,
}

/// Which body slot a piece of armor occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArmorPiece {
    Helmet,
    BodyArmor,
    Boots,
    Cloak,
    Belt,
}

impl ArmorPiece {
    /// The body slot this piece always lands in, regardless of where it was
    /// dropped.
    pub fn body_slot(&self) -> BodySlot {
        match self {
            Self::Helmet => BodySlot::Head,
            Self::BodyArmor => BodySlot::Body,
            Self::Boots => BodySlot::Boots,
            Self::Cloak => BodySlot::Cloak,
            Self::Belt => BodySlot::Belt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorData {
    pub piece: ArmorPiece,
    /// Stowed rather than worn
    #[serde(default)]
    pub on_backpack: bool,
    /// Attribute bonuses granted while worn
    #[serde(default)]
    pub effects: Vec<AttributeEffect>,
}

/// Accessory classification for gear items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessoryKind {
    Ring,
    Bracelet,
    Amulet,
    /// Carried gear with no equipment slot
    Trinket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearData {
    pub accessory: AccessoryKind,
    /// Attribute bonuses granted while equipped
    #[serde(default)]
    pub effects: Vec<AttributeEffect>,
}

/// Healing behavior of a consumable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealSpec {
    pub apply_heal: bool,
    /// Heal to full instead of rolling `formula`
    pub heal_all: bool,
    pub formula: Option<String>,
}

/// Effect behavior of a consumable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectSpec {
    pub apply_effect: bool,
    /// Optional duration formula; deterministic-only contexts reject dice
    /// terms in it
    pub duration: Option<String>,
    /// Effects duplicated onto the target actor when used
    #[serde(default)]
    pub effects: Vec<AttributeEffect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumableData {
    pub uses: WoundTrack,
    pub auto_destroy: bool,
    #[serde(default)]
    pub heal: HealSpec,
    #[serde(default)]
    pub effect: EffectSpec,
}

/// Type-tagged item payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemKind {
    Weapon(WeaponData),
    Armor(ArmorData),
    Gear(GearData),
    Consumable(ConsumableData),
}

/// Which slot group an item belongs to, for equip routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipClass {
    /// Armor self-slots into its own body slot
    Armor(BodySlot),
    /// Weapons live in the hand slots (sword/shield)
    Weapon,
    Ring,
    Bracelet,
    Amulet,
    Unequippable,
}

/// An equippable or consumable entity referenced by the equipment slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub price: u32,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    pub fn weapon(name: impl Into<String>, reach: WeaponReach) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: None,
            price: 0,
            kind: ItemKind::Weapon(WeaponData {
                reach,
                equipped: false,
                strength: None,
                roll_options: WeaponRollOptions::default(),
            }),
        }
    }

    pub fn armor(name: impl Into<String>, piece: ArmorPiece) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: None,
            price: 0,
            kind: ItemKind::Armor(ArmorData {
                piece,
                on_backpack: false,
                effects: Vec::new(),
            }),
        }
    }

    pub fn gear(name: impl Into<String>, accessory: AccessoryKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: None,
            price: 0,
            kind: ItemKind::Gear(GearData {
                accessory,
                effects: Vec::new(),
            }),
        }
    }

    pub fn consumable(name: impl Into<String>, uses: i32, auto_destroy: bool) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: None,
            price: 0,
            kind: ItemKind::Consumable(ConsumableData {
                uses: WoundTrack::new(uses, uses),
                auto_destroy,
                heal: HealSpec::default(),
                effect: EffectSpec::default(),
            }),
        }
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon(_))
    }

    pub fn is_melee_weapon(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Weapon(WeaponData {
                reach: WeaponReach::Melee,
                ..
            })
        )
    }

    pub fn is_ranged_weapon(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Weapon(WeaponData {
                reach: WeaponReach::Ranged,
                ..
            })
        )
    }

    pub fn as_weapon(&self) -> Option<&WeaponData> {
        match &self.kind {
            ItemKind::Weapon(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_weapon_mut(&mut self) -> Option<&mut WeaponData> {
        match &mut self.kind {
            ItemKind::Weapon(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_consumable(&self) -> Option<&ConsumableData> {
        match &self.kind {
            ItemKind::Consumable(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_consumable_mut(&mut self) -> Option<&mut ConsumableData> {
        match &mut self.kind {
            ItemKind::Consumable(data) => Some(data),
            _ => None,
        }
    }

    /// Slot-group classification used by the equip state machine.
    pub fn classification(&self) -> EquipClass {
        match &self.kind {
            ItemKind::Weapon(_) => EquipClass::Weapon,
            ItemKind::Armor(data) => EquipClass::Armor(data.piece.body_slot()),
            ItemKind::Gear(data) => match data.accessory {
                AccessoryKind::Ring => EquipClass::Ring,
                AccessoryKind::Bracelet => EquipClass::Bracelet,
                AccessoryKind::Amulet => EquipClass::Amulet,
                AccessoryKind::Trinket => EquipClass::Unequippable,
            },
            ItemKind::Consumable(_) => EquipClass::Unequippable,
        }
    }

    /// Attribute effects this item grants while it occupies a slot.
    ///
    /// Consumable effects are excluded: they apply on use, never passively.
    pub fn worn_effects(&self) -> &[AttributeEffect] {
        match &self.kind {
            ItemKind::Armor(data) => &data.effects,
            ItemKind::Gear(data) => &data.effects,
            ItemKind::Weapon(_) | ItemKind::Consumable(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::AttributeKey;

    #[test]
    fn weapon_reach_getters() {
        let sword = Item::weapon("Longsword", WeaponReach::Melee);
        assert!(sword.is_weapon());
        assert!(sword.is_melee_weapon());
        assert!(!sword.is_ranged_weapon());

        let bow = Item::weapon("Bow", WeaponReach::Ranged);
        assert!(bow.is_ranged_weapon());
    }

    #[test]
    fn armor_classifies_into_its_own_slot() {
        let helmet = Item::armor("Iron Helm", ArmorPiece::Helmet);
        assert_eq!(helmet.classification(), EquipClass::Armor(BodySlot::Head));

        let boots = Item::armor("Worn Boots", ArmorPiece::Boots);
        assert_eq!(boots.classification(), EquipClass::Armor(BodySlot::Boots));
    }

    #[test]
    fn gear_classifies_by_accessory_kind() {
        assert_eq!(
            Item::gear("Ring of Ash", AccessoryKind::Ring).classification(),
            EquipClass::Ring
        );
        assert_eq!(
            Item::gear("Lantern", AccessoryKind::Trinket).classification(),
            EquipClass::Unequippable
        );
    }

    #[test]
    fn consumables_are_unequippable() {
        let potion = Item::consumable("Healing Draught", 1, true);
        assert_eq!(potion.classification(), EquipClass::Unequippable);
    }

    #[test]
    fn worn_effects_exclude_consumable_effects() {
        let mut potion = Item::consumable("Strength Brew", 1, true);
        if let ItemKind::Consumable(data) = &mut potion.kind {
            data.effect.apply_effect = true;
            data.effect
                .effects
                .push(AttributeEffect::new(AttributeKey::Strength, 1, "Brew"));
        }
        assert!(potion.worn_effects().is_empty());
    }

    #[test]
    fn item_serde_tags_kind() {
        let bow = Item::weapon("Bow", WeaponReach::Ranged).with_price(120);
        let json = serde_json::to_value(&bow).expect("serialize");
        assert_eq!(json["type"], "weapon");
        assert_eq!(json["price"], 120);
        let parsed: Item = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, bow);
    }
}
