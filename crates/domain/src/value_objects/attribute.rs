//! Attribute value objects - derived character attributes for combat lookups.
//!
//! An attribute carries a base value, a persistent modifier, and a stack of
//! transient labeled mods. The effective total is recomputed on every read,
//! never cached across mutations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::EffectId;

/// Character attributes addressed by the sheet and the combat pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeKey {
    /// Weapon skill - melee to-hit lookups
    WeaponSkill,
    /// Ballistic skill - ranged hit threshold
    BallisticSkill,
    /// Strength - melee damage contribution
    Strength,
    /// Toughness - damage soak of the target
    Toughness,
    /// Willpower - resistance checks
    Willpower,
    /// Attacks - attacks per turn
    Attacks,
    /// Pin - pinning resistance
    Pin,
    /// Move - movement allowance
    Move,
}

impl AttributeKey {
    /// Returns the camelCase key used in persisted actor documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeaponSkill => "weaponSkill",
            Self::BallisticSkill => "ballisticSkill",
            Self::Strength => "strength",
            Self::Toughness => "toughness",
            Self::Willpower => "willpower",
            Self::Attacks => "attacks",
            Self::Pin => "pin",
            Self::Move => "move",
        }
    }

    /// Returns the full display name of the attribute.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::WeaponSkill => "Weapon Skill",
            Self::BallisticSkill => "Ballistic Skill",
            Self::Strength => "Strength",
            Self::Toughness => "Toughness",
            Self::Willpower => "Willpower",
            Self::Attacks => "Attacks",
            Self::Pin => "Pin",
            Self::Move => "Move",
        }
    }

    /// Returns every attribute a character sheet carries.
    pub fn all() -> [AttributeKey; 8] {
        [
            Self::WeaponSkill,
            Self::BallisticSkill,
            Self::Strength,
            Self::Toughness,
            Self::Willpower,
            Self::Attacks,
            Self::Pin,
            Self::Move,
        ]
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttributeKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weaponSkill" => Ok(Self::WeaponSkill),
            "ballisticSkill" => Ok(Self::BallisticSkill),
            "strength" => Ok(Self::Strength),
            "toughness" => Ok(Self::Toughness),
            "willpower" => Ok(Self::Willpower),
            "attacks" => Ok(Self::Attacks),
            "pin" => Ok(Self::Pin),
            "move" => Ok(Self::Move),
            _ => Err(DomainError::parse(format!("Unknown attribute key: {s}"))),
        }
    }
}

/// A transient labeled modifier stacked onto an attribute.
///
/// `value` is optional: a mod whose value failed numeric coercion upstream is
/// kept in the stack and contributes zero to the total. The entry is never
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeMod {
    pub value: Option<i32>,
    pub label: String,
}

impl AttributeMod {
    pub fn new(label: impl Into<String>, value: i32) -> Self {
        Self {
            value: Some(value),
            label: label.into(),
        }
    }

    /// A mod with no numeric value. Contributes zero but stays visible.
    pub fn unvalued(label: impl Into<String>) -> Self {
        Self {
            value: None,
            label: label.into(),
        }
    }

    /// The contribution of this mod to the attribute total.
    pub fn contribution(&self) -> i32 {
        self.value.unwrap_or(0)
    }
}

/// A character attribute: base value, persistent modifier, stacked mods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeField {
    /// Base value. Includes equipment-sourced bonuses once
    /// `Character::apply_attribute_modifiers` has run.
    pub value: i32,
    /// Persistent modifier (advancement, permanent injury)
    pub modifier: i32,
    /// Transient stacked mods (temporary effects)
    #[serde(default)]
    pub mods: Vec<AttributeMod>,
}

impl AttributeField {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            modifier: 0,
            mods: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Effective total: `value + modifier + sum of mod contributions`.
    ///
    /// Recomputed from stored state on every call.
    pub fn total(&self) -> i32 {
        self.value
            + self.modifier
            + self.mods.iter().map(AttributeMod::contribution).sum::<i32>()
    }

    /// Stack a transient mod onto this attribute.
    pub fn add_mod(&mut self, m: AttributeMod) {
        self.mods.push(m);
    }

    /// Remove every stacked mod carrying `label`. Returns true if any was removed.
    pub fn remove_mod(&mut self, label: &str) -> bool {
        let len_before = self.mods.len();
        self.mods.retain(|m| m.label != label);
        self.mods.len() < len_before
    }
}

/// A flat attribute bonus granted by an item or consumable effect.
///
/// Effects sourced from equippable items apply only while the item is
/// equipped; consumable effects apply only when the consumable is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeEffect {
    pub id: EffectId,
    pub attribute: AttributeKey,
    pub amount: i32,
    /// Source label shown on the sheet (e.g. "Amulet of Vigour")
    pub label: String,
}

impl AttributeEffect {
    pub fn new(attribute: AttributeKey, amount: i32, label: impl Into<String>) -> Self {
        Self {
            id: EffectId::new(),
            attribute,
            amount,
            label: label.into(),
        }
    }
}
