//! Static game configuration - actor-type seeds and roll formulas
//!
//! The host injects a [`GameConfig`] value into the services at startup; the
//! table is never a process-wide singleton. `validate` runs once at startup
//! and rejects tables with unparseable formulas or incomplete seeds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{AttributeKey, DiceExpression};

/// Playable actor types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorKind {
    Elf,
    Barbarian,
    Dwarf,
    Wizard,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Elf => "elf",
            Self::Barbarian => "barbarian",
            Self::Dwarf => "dwarf",
            Self::Wizard => "wizard",
        }
    }

    pub fn all() -> [ActorKind; 4] {
        [Self::Elf, Self::Barbarian, Self::Dwarf, Self::Wizard]
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elf" => Ok(Self::Elf),
            "barbarian" => Ok(Self::Barbarian),
            "dwarf" => Ok(Self::Dwarf),
            "wizard" => Ok(Self::Wizard),
            _ => Err(DomainError::parse(format!("Unknown actor type: {s}"))),
        }
    }
}

/// Seed values applied when an actor document is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialValues {
    pub attributes: BTreeMap<AttributeKey, i32>,
    pub initiative: i32,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub luck: i32,
}

/// Per-actor-type configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorTypeConfig {
    /// Formula for the one-time wounds initialization roll
    pub wounds_roll: String,
    /// Pin automatically when engaged
    pub auto_pinning: bool,
    pub initial_values: InitialValues,
}

/// The full actor-type table, injected into services at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub actors: BTreeMap<ActorKind, ActorTypeConfig>,
}

impl GameConfig {
    /// The stock table shipped with the system.
    pub fn standard() -> Self {
        fn seed(values: [(AttributeKey, i32); 8]) -> BTreeMap<AttributeKey, i32> {
            values.into_iter().collect()
        }
        use AttributeKey::*;

        let mut actors = BTreeMap::new();
        actors.insert(
            ActorKind::Elf,
            ActorTypeConfig {
                wounds_roll: "1d6+7".to_string(),
                auto_pinning: true,
                initial_values: InitialValues {
                    attributes: seed([
                        (WeaponSkill, 4),
                        (BallisticSkill, 4),
                        (Strength, 3),
                        (Toughness, 3),
                        (Willpower, 2),
                        (Attacks, 1),
                        (Pin, 0),
                        (Move, 4),
                    ]),
                    initiative: 6,
                    gold: 0,
                    luck: 0,
                },
            },
        );
        actors.insert(
            ActorKind::Barbarian,
            ActorTypeConfig {
                wounds_roll: "1d6+8".to_string(),
                auto_pinning: true,
                initial_values: InitialValues {
                    attributes: seed([
                        (WeaponSkill, 3),
                        (BallisticSkill, 5),
                        (Strength, 4),
                        (Toughness, 4),
                        (Willpower, 3),
                        (Attacks, 1),
                        (Pin, 0),
                        (Move, 4),
                    ]),
                    initiative: 4,
                    gold: 0,
                    luck: 0,
                },
            },
        );
        actors.insert(
            ActorKind::Dwarf,
            ActorTypeConfig {
                wounds_roll: "1d6+8".to_string(),
                auto_pinning: false,
                initial_values: InitialValues {
                    attributes: seed([
                        (WeaponSkill, 4),
                        (BallisticSkill, 5),
                        (Strength, 4),
                        (Toughness, 4),
                        (Willpower, 4),
                        (Attacks, 1),
                        (Pin, 0),
                        (Move, 3),
                    ]),
                    initiative: 3,
                    gold: 0,
                    luck: 0,
                },
            },
        );
        actors.insert(
            ActorKind::Wizard,
            ActorTypeConfig {
                wounds_roll: "1d6+5".to_string(),
                auto_pinning: true,
                initial_values: InitialValues {
                    attributes: seed([
                        (WeaponSkill, 2),
                        (BallisticSkill, 5),
                        (Strength, 3),
                        (Toughness, 3),
                        (Willpower, 5),
                        (Attacks, 1),
                        (Pin, 0),
                        (Move, 4),
                    ]),
                    initiative: 4,
                    gold: 0,
                    luck: 0,
                },
            },
        );
        Self { actors }
    }

    pub fn actor(&self, kind: ActorKind) -> Result<&ActorTypeConfig, DomainError> {
        self.actors
            .get(&kind)
            .ok_or_else(|| DomainError::not_found("ActorTypeConfig", kind.to_string()))
    }

    /// Startup validation: every wounds formula must parse and every actor
    /// seed must cover the full attribute set.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (kind, config) in &self.actors {
            DiceExpression::parse(&config.wounds_roll).map_err(|e| {
                DomainError::validation(format!("{kind}: bad wounds roll formula: {e}"))
            })?;
            for key in AttributeKey::all() {
                if !config.initial_values.attributes.contains_key(&key) {
                    return Err(DomainError::validation(format!(
                        "{kind}: missing seed for attribute {key}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}
