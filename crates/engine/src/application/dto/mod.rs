//! Sheet-facing result DTOs
//!
//! Services return these so the host UI can render chat cards and sheet
//! updates without reaching into domain state.

use serde::{Deserialize, Serialize};

use questforge_domain::{ActorId, AttributeKey};

/// How a target's damage was routed after a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DamageRouting {
    /// Applied directly through the actor store (privileged caller)
    Applied,
    /// Handed to the privileged client over the transport
    Deferred,
    /// No damage applied (miss, or the damage step aborted)
    NotApplied,
}

/// Per-target outcome of one attack pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReport {
    pub target_id: ActorId,
    /// Minimum roll needed against this target
    pub required_roll: i32,
    pub hit: bool,
    pub damage_formula: Option<String>,
    pub damage_total: Option<i32>,
    pub routing: DamageRouting,
}

/// Outcome of a melee or ranged attack against the selected targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackReport {
    pub attacker_id: ActorId,
    /// The single attack-roll total every target was checked against
    pub attack_roll: i32,
    pub targets: Vec<TargetReport>,
}

/// Outcome of using a consumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumableReport {
    pub healed: Option<i32>,
    pub effects_applied: usize,
    pub uses_remaining: i32,
    pub destroyed: bool,
}

/// Outcome of a sheet attribute roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRollReport {
    pub attribute: AttributeKey,
    pub formula: String,
    pub total: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_report_serializes_for_the_sheet() {
        let target_id = ActorId::new();
        let report = AttackReport {
            attacker_id: ActorId::new(),
            attack_roll: 4,
            targets: vec![TargetReport {
                target_id,
                required_roll: 4,
                hit: true,
                damage_formula: Some("2d6 + 3 - 2".to_string()),
                damage_total: Some(6),
                routing: DamageRouting::Applied,
            }],
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["attackRoll"], 4);
        assert_eq!(json["targets"][0]["damageFormula"], "2d6 + 3 - 2");
        assert_eq!(json["targets"][0]["routing"], "applied");
        let parsed: AttackReport = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, report);
    }
}
