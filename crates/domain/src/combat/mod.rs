//! Combat resolution rules - to-hit lookups and damage formula synthesis

mod damage;
mod to_hit;

pub use damage::damage_formula;
pub use to_hit::{CombatTable, SkillRatio, ToHitStrategy, COMBAT_TABLE};
