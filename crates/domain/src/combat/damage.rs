//! Damage formula synthesis
//!
//! Builds the formula string handed to the host's roll evaluator. Attribute
//! totals are inlined as integers; terms are joined with single spaces
//! (`"2d6 + 3 - 2"`).

use crate::entities::{Item, ItemKind, WeaponReach};

/// Build the damage formula for a weapon, or `None` for non-weapons.
///
/// - Base dice term: `(1 + extra_dices)d6`.
/// - Melee adds the attacker's strength total and subtracts the target's
///   toughness total unless the weapon ignores armor.
/// - Ranged adds the weapon's own strength instead of the wielder's.
/// - An optional signed `damage_modifier` fragment is appended last; a
///   fragment without a leading sign is added.
pub fn damage_formula(
    item: &Item,
    attacker_strength: i32,
    target_toughness: i32,
) -> Option<String> {
    let weapon = match &item.kind {
        ItemKind::Weapon(data) => data,
        _ => return None,
    };

    let mut parts = vec![format!("{}d6", 1 + weapon.roll_options.extra_dices)];

    match weapon.reach {
        WeaponReach::Melee => {
            push_signed(&mut parts, "+", attacker_strength);
            if !weapon.roll_options.ignore_armor {
                push_signed(&mut parts, "-", target_toughness);
            }
        }
        WeaponReach::Ranged => {
            push_signed(&mut parts, "+", weapon.strength.unwrap_or(0));
        }
    }

    if let Some(modifier) = weapon
        .roll_options
        .damage_modifier
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
    {
        let operator = if modifier.starts_with('-') { "-" } else { "+" };
        let fragment = modifier.trim_start_matches(['+', '-']).trim();
        parts.push(operator.to_string());
        parts.push(fragment.to_string());
    }

    Some(parts.join(" "))
}

/// Append `op value` with the sign normalized so negative totals never
/// produce doubled operators.
fn push_signed(parts: &mut Vec<String>, op: &str, value: i32) {
    let flipped = if op == "+" { "-" } else { "+" };
    if value < 0 {
        parts.push(flipped.to_string());
    } else {
        parts.push(op.to_string());
    }
    parts.push(value.abs().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ArmorPiece, WeaponData, WeaponRollOptions};
    use crate::value_objects::DiceExpression;

    fn melee(extra_dices: u32, ignore_armor: bool, modifier: Option<&str>) -> Item {
        let mut item = Item::weapon("Blade", WeaponReach::Melee);
        item.kind = ItemKind::Weapon(WeaponData {
            reach: WeaponReach::Melee,
            equipped: true,
            strength: None,
            roll_options: WeaponRollOptions {
                ignore_armor,
                extra_dices,
                damage_modifier: modifier.map(str::to_string),
            },
        });
        item
    }

    #[test]
    fn melee_formula_folds_strength_and_toughness() {
        let weapon = melee(1, false, None);
        assert_eq!(
            damage_formula(&weapon, 3, 2).as_deref(),
            Some("2d6 + 3 - 2")
        );
    }

    #[test]
    fn ignore_armor_skips_toughness_deduction() {
        let weapon = melee(0, true, None);
        assert_eq!(damage_formula(&weapon, 3, 2).as_deref(), Some("1d6 + 3"));
    }

    #[test]
    fn ranged_formula_uses_weapon_strength() {
        let mut bow = Item::weapon("Bow", WeaponReach::Ranged);
        if let ItemKind::Weapon(data) = &mut bow.kind {
            data.strength = Some(4);
        }
        // Wielder totals are irrelevant at range.
        assert_eq!(damage_formula(&bow, 9, 9).as_deref(), Some("1d6 + 4"));
    }

    #[test]
    fn damage_modifier_appends_with_parsed_sign() {
        assert_eq!(
            damage_formula(&melee(0, true, Some("+2")), 3, 0).as_deref(),
            Some("1d6 + 3 + 2")
        );
        assert_eq!(
            damage_formula(&melee(0, true, Some("-1d4")), 3, 0).as_deref(),
            Some("1d6 + 3 - 1d4")
        );
        assert_eq!(
            damage_formula(&melee(0, true, Some("2")), 3, 0).as_deref(),
            Some("1d6 + 3 + 2")
        );
    }

    #[test]
    fn negative_totals_keep_formula_parseable() {
        let formula = damage_formula(&melee(0, false, None), -1, -2).expect("formula");
        assert_eq!(formula, "1d6 - 1 + 2");
        DiceExpression::parse(&formula).expect("synthesized formulas always parse");
    }

    #[test]
    fn non_weapons_have_no_damage_formula() {
        let helmet = Item::armor("Iron Helm", ArmorPiece::Helmet);
        assert_eq!(damage_formula(&helmet, 3, 2), None);
    }

    #[test]
    fn synthesized_formulas_parse() {
        for (weapon, s, t) in [
            (melee(2, false, Some("+1")), 4, 3),
            (melee(0, true, None), 0, 0),
            (melee(1, false, Some("- 2")), 3, 5),
        ] {
            let formula = damage_formula(&weapon, s, t).expect("formula");
            DiceExpression::parse(&formula).expect("parse");
        }
    }
}
