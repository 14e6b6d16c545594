//! Dice expression parsing and evaluation
//!
//! Supports the multi-term formulas the combat pipeline synthesizes, like
//! `"2d6 + 3 - 2"`, `"1d6+7"` or `"d6"`. Parsed manually to avoid a regex
//! dependency in the domain layer. The domain never rolls: evaluation takes
//! an injected die-rolling closure, so randomness stays a collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when parsing a dice expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected terms like XdY or integers joined by +/-
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
}

/// One signed term of a dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiceTerm {
    /// `XdY`, added or subtracted
    Dice {
        count: u32,
        sides: u32,
        subtract: bool,
    },
    /// A flat integer, sign folded in
    Constant(i32),
}

/// A parsed dice expression like `"2d6 + 3 - 2"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceExpression {
    terms: Vec<DiceTerm>,
}

impl DiceExpression {
    /// Parse an expression of dice and integer terms joined by `+`/`-`.
    ///
    /// Supported term forms:
    /// - `XdY` - roll X dice of size Y
    /// - `dY` - shorthand for `1dY`
    /// - `Z` - flat integer
    ///
    /// Whitespace around terms and operators is ignored; parsing is
    /// case-insensitive.
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let mut terms = Vec::new();
        let mut subtract = false;
        let mut buf = String::new();

        for c in input.chars() {
            match c {
                '+' | '-' => {
                    if buf.trim().is_empty() {
                        // A sign before the first term negates it; doubled
                        // operators are malformed.
                        if terms.is_empty() && !subtract && c == '-' && buf.is_empty() {
                            subtract = true;
                            continue;
                        }
                        return Err(DiceParseError::InvalidFormat(format!(
                            "dangling operator in '{input}'"
                        )));
                    }
                    terms.push(Self::parse_term(&buf, subtract)?);
                    buf.clear();
                    subtract = c == '-';
                }
                _ => buf.push(c),
            }
        }
        if buf.trim().is_empty() {
            return Err(DiceParseError::InvalidFormat(format!(
                "trailing operator in '{input}'"
            )));
        }
        terms.push(Self::parse_term(&buf, subtract)?);

        Ok(Self { terms })
    }

    fn parse_term(text: &str, subtract: bool) -> Result<DiceTerm, DiceParseError> {
        let text = text.trim();

        if let Some(d_pos) = text.find('d') {
            let count_str = text[..d_pos].trim();
            let count: u32 = if count_str.is_empty() {
                1 // "d6" means "1d6"
            } else {
                count_str.parse().map_err(|_| {
                    DiceParseError::InvalidFormat(format!("Invalid dice count: '{count_str}'"))
                })?
            };
            if count == 0 {
                return Err(DiceParseError::InvalidDiceCount);
            }

            let sides_str = text[d_pos + 1..].trim();
            let sides: u32 = sides_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid die size: '{sides_str}'"))
            })?;
            if sides < 2 {
                return Err(DiceParseError::InvalidDieSize);
            }

            Ok(DiceTerm::Dice {
                count,
                sides,
                subtract,
            })
        } else {
            let n: i32 = text.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid integer term: '{text}'"))
            })?;
            Ok(DiceTerm::Constant(if subtract { -n } else { n }))
        }
    }

    pub fn terms(&self) -> &[DiceTerm] {
        &self.terms
    }

    /// True when the expression contains no dice terms.
    ///
    /// Deterministic-only formula fields (effect durations, flat heals)
    /// reject expressions with random terms.
    pub fn is_deterministic(&self) -> bool {
        !self
            .terms
            .iter()
            .any(|t| matches!(t, DiceTerm::Dice { .. }))
    }

    /// Minimum possible total.
    pub fn min_total(&self) -> i32 {
        self.terms
            .iter()
            .map(|t| match *t {
                DiceTerm::Dice {
                    count,
                    sides,
                    subtract,
                } => {
                    if subtract {
                        -((count * sides) as i32)
                    } else {
                        count as i32
                    }
                }
                DiceTerm::Constant(n) => n,
            })
            .sum()
    }

    /// Maximum possible total.
    pub fn max_total(&self) -> i32 {
        self.terms
            .iter()
            .map(|t| match *t {
                DiceTerm::Dice {
                    count,
                    sides,
                    subtract,
                } => {
                    if subtract {
                        -(count as i32)
                    } else {
                        (count * sides) as i32
                    }
                }
                DiceTerm::Constant(n) => n,
            })
            .sum()
    }

    /// Evaluate the expression with an injected die roller.
    ///
    /// `roller` receives the die size and returns one roll in `1..=size`.
    pub fn evaluate_with(&self, mut roller: impl FnMut(u32) -> i32) -> i32 {
        self.terms
            .iter()
            .map(|t| match *t {
                DiceTerm::Dice {
                    count,
                    sides,
                    subtract,
                } => {
                    let rolled: i32 = (0..count).map(|_| roller(sides)).sum();
                    if subtract {
                        -rolled
                    } else {
                        rolled
                    }
                }
                DiceTerm::Constant(n) => n,
            })
            .sum()
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            let (negative, body) = match *term {
                DiceTerm::Dice {
                    count,
                    sides,
                    subtract,
                } => (subtract, format!("{count}d{sides}")),
                DiceTerm::Constant(n) => (n < 0, n.abs().to_string()),
            };
            if i == 0 {
                if negative {
                    write!(f, "-")?;
                }
            } else if negative {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            write!(f, "{body}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_die() {
        let expr = DiceExpression::parse("1d6").expect("parse");
        assert_eq!(
            expr.terms(),
            &[DiceTerm::Dice {
                count: 1,
                sides: 6,
                subtract: false
            }]
        );
    }

    #[test]
    fn parses_shorthand_die() {
        let expr = DiceExpression::parse("d6").expect("parse");
        assert_eq!(expr.min_total(), 1);
        assert_eq!(expr.max_total(), 6);
    }

    #[test]
    fn parses_compact_modifier() {
        let expr = DiceExpression::parse("1d6+7").expect("parse");
        assert_eq!(expr.min_total(), 8);
        assert_eq!(expr.max_total(), 13);
    }

    #[test]
    fn parses_spaced_multi_term_formula() {
        let expr = DiceExpression::parse("2d6 + 3 - 2").expect("parse");
        assert_eq!(
            expr.terms(),
            &[
                DiceTerm::Dice {
                    count: 2,
                    sides: 6,
                    subtract: false
                },
                DiceTerm::Constant(3),
                DiceTerm::Constant(-2),
            ]
        );
        assert_eq!(expr.min_total(), 3);
        assert_eq!(expr.max_total(), 13);
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        let expr = DiceExpression::parse("  2D6 + 1 ").expect("parse");
        assert_eq!(expr.to_string(), "2d6 + 1");
    }

    #[test]
    fn rejects_empty_formula() {
        assert!(matches!(
            DiceExpression::parse(""),
            Err(DiceParseError::Empty)
        ));
    }

    #[test]
    fn rejects_zero_dice() {
        assert!(matches!(
            DiceExpression::parse("0d6"),
            Err(DiceParseError::InvalidDiceCount)
        ));
    }

    #[test]
    fn rejects_one_sided_die() {
        assert!(matches!(
            DiceExpression::parse("1d1"),
            Err(DiceParseError::InvalidDieSize)
        ));
    }

    #[test]
    fn rejects_dangling_operator() {
        assert!(matches!(
            DiceExpression::parse("1d6 +"),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            DiceExpression::parse("1d6 + - 2"),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn deterministic_check_spots_dice_terms() {
        assert!(DiceExpression::parse("3 + 2").expect("parse").is_deterministic());
        assert!(!DiceExpression::parse("1d6 + 2").expect("parse").is_deterministic());
    }

    #[test]
    fn evaluates_with_injected_roller() {
        let expr = DiceExpression::parse("2d6 + 3 - 2").expect("parse");
        // Fixed rolls: every die shows 4.
        let total = expr.evaluate_with(|_| 4);
        assert_eq!(total, 9);
    }

    #[test]
    fn evaluates_subtracted_dice() {
        let expr = DiceExpression::parse("1d6 - 1d4").expect("parse");
        let mut rolls = [6, 1].into_iter();
        let total = expr.evaluate_with(|_| rolls.next().unwrap_or(0));
        assert_eq!(total, 5);
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for formula in ["1d6 + 7", "2d6 + 3 - 2", "4 - 1d8"] {
            let expr = DiceExpression::parse(formula).expect("parse");
            assert_eq!(expr.to_string(), formula);
            assert_eq!(DiceExpression::parse(&expr.to_string()).expect("reparse"), expr);
        }
    }

    #[test]
    fn leading_minus_negates_first_term() {
        let expr = DiceExpression::parse("-2 + 1d6").expect("parse");
        assert_eq!(expr.terms()[0], DiceTerm::Constant(-2));
    }
}
