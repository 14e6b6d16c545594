//! WoundTrack - a clamped value/max pair.
//!
//! Backs the character's wounds and luck bars and a consumable's uses bar.
//! `max` stays `None` until an initialization roll has happened; from then on
//! `0 <= value <= max` holds after every operation.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Heal input: a flat amount or "heal to full".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealAmount {
    All,
    Amount(i32),
}

/// A clamped value/max pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WoundTrack {
    pub value: i32,
    pub max: Option<i32>,
}

impl WoundTrack {
    /// An uninitialized track: zero value, no max yet.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// A track with both value and max set (consumable uses bars).
    pub fn new(value: i32, max: i32) -> Self {
        Self {
            value: value.clamp(0, max.max(0)),
            max: Some(max.max(0)),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.max.is_some()
    }

    /// True when the track is initialized and the value has reached zero.
    pub fn is_depleted(&self) -> bool {
        self.is_initialized() && self.value == 0
    }

    /// Set value and max from an initialization roll.
    ///
    /// Refuses when max is already set; re-rolling goes through
    /// [`WoundTrack::reinitialize`] so the overwrite is always explicit.
    pub fn initialize(&mut self, total: i32) -> Result<(), DomainError> {
        if self.max.is_some() {
            return Err(DomainError::invalid_state_transition(
                "wound track already initialized",
            ));
        }
        let total = total.max(0);
        self.value = total;
        self.max = Some(total);
        Ok(())
    }

    /// Overwrite value and max from a fresh roll, initialized or not.
    pub fn reinitialize(&mut self, total: i32) {
        let total = total.max(0);
        self.value = total;
        self.max = Some(total);
    }

    /// Apply damage. The amount is coerced non-negative; the new value never
    /// drops below zero. Returns the new value.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let amount = amount.abs();
        self.value = (self.value - amount).max(0);
        self.value
    }

    /// Apply healing, clamped to max once max is set. Returns the new value.
    pub fn apply_heal(&mut self, amount: HealAmount) -> i32 {
        match amount {
            HealAmount::All => {
                if let Some(max) = self.max {
                    self.value = max;
                }
            }
            HealAmount::Amount(n) => {
                let n = n.abs();
                let healed = self.value + n;
                self.value = match self.max {
                    Some(max) => healed.min(max),
                    None => healed,
                };
            }
        }
        self.value
    }
}
