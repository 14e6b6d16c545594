//! To-hit lookup strategies
//!
//! Two formulations of the same check exist in the system's history: the
//! fixed lookup table and a weapon-skill-ratio formula. Both live behind
//! [`ToHitStrategy`] so they stay test-comparable; the table is the default
//! the services use.

use crate::error::DomainError;

/// Minimum roll on 1d6 needed to hit, indexed by `target weapon skill - 1`.
pub const COMBAT_TABLE: [i32; 10] = [2, 3, 3, 4, 4, 4, 4, 4, 5, 5];

/// A to-hit formulation: minimum attack-roll total needed for a hit.
///
/// Both weapon skills must be in `1..=10`; out-of-range input is a
/// validation failure and never mutates state.
pub trait ToHitStrategy: Send + Sync {
    fn required_roll(&self, attacker_ws: i32, target_ws: i32) -> Result<i32, DomainError>;
}

fn validate_skill(label: &str, value: i32) -> Result<(), DomainError> {
    if (1..=10).contains(&value) {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "{label} weapon skill must be in 1..=10, got {value}"
        )))
    }
}

/// The fixed 10-entry lookup table, indexed by the target's weapon skill.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatTable;

impl ToHitStrategy for CombatTable {
    fn required_roll(&self, attacker_ws: i32, target_ws: i32) -> Result<i32, DomainError> {
        validate_skill("attacker", attacker_ws)?;
        validate_skill("target", target_ws)?;
        Ok(COMBAT_TABLE[(target_ws - 1) as usize])
    }
}

/// The ratio formulation over both weapon skills.
///
/// Comparisons use exact arithmetic (`2 * wsa < wse` for `wsa < wse / 2`),
/// matching the original's real-number division.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillRatio;

impl ToHitStrategy for SkillRatio {
    fn required_roll(&self, attacker_ws: i32, target_ws: i32) -> Result<i32, DomainError> {
        validate_skill("attacker", attacker_ws)?;
        validate_skill("target", target_ws)?;
        let need = if 2 * attacker_ws < target_ws {
            2
        } else if attacker_ws < target_ws {
            3
        } else if attacker_ws <= target_ws * 2 {
            4
        } else if attacker_ws <= target_ws * 3 {
            5
        } else {
            6
        };
        Ok(need)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_indexes_by_target_skill() {
        let strategy = CombatTable;
        assert_eq!(strategy.required_roll(4, 1).expect("lookup"), 2);
        assert_eq!(strategy.required_roll(4, 4).expect("lookup"), 4);
        assert_eq!(strategy.required_roll(4, 10).expect("lookup"), 5);
        // Attacker skill does not shift the table lookup.
        assert_eq!(strategy.required_roll(1, 4).expect("lookup"), 4);
        assert_eq!(strategy.required_roll(10, 4).expect("lookup"), 4);
    }

    #[test]
    fn table_rejects_out_of_range_skills() {
        let strategy = CombatTable;
        assert!(strategy.required_roll(4, 0).is_err());
        assert!(strategy.required_roll(4, 11).is_err());
        assert!(strategy.required_roll(0, 4).is_err());
    }

    #[test]
    fn ratio_bands() {
        let strategy = SkillRatio;
        assert_eq!(strategy.required_roll(1, 3).expect("band"), 2); // wsa < wse/2
        assert_eq!(strategy.required_roll(2, 3).expect("band"), 3); // wsa < wse
        assert_eq!(strategy.required_roll(3, 3).expect("band"), 4); // wsa <= 2*wse
        assert_eq!(strategy.required_roll(6, 3).expect("band"), 4);
        assert_eq!(strategy.required_roll(7, 3).expect("band"), 5); // wsa <= 3*wse
        assert_eq!(strategy.required_roll(10, 3).expect("band"), 5);
        assert_eq!(strategy.required_roll(7, 2).expect("band"), 6);
    }

    #[test]
    fn ratio_rejects_out_of_range_skills() {
        let strategy = SkillRatio;
        assert!(strategy.required_roll(0, 4).is_err());
        assert!(strategy.required_roll(11, 4).is_err());
        assert!(strategy.required_roll(4, 12).is_err());
    }

    #[test]
    fn strategies_are_object_safe() {
        let strategies: Vec<Box<dyn ToHitStrategy>> = vec![Box::new(CombatTable), Box::new(SkillRatio)];
        for strategy in &strategies {
            assert!(strategy.required_roll(4, 4).expect("valid input") >= 2);
        }
    }
}
