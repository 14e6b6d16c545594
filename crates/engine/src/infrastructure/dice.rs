//! Rand-backed roll evaluator
//!
//! Parses formulas with the domain's dice expression parser and rolls with a
//! seedable RNG. `@name` variables are substituted textually before parsing,
//! mirroring the host evaluator's roll-data resolution.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::application::ports::outbound::{RollError, RollEvaluatorPort, RollOutcome};
use questforge_domain::DiceExpression;

pub struct RngRollEvaluator {
    rng: Mutex<StdRng>,
    deterministic_only: bool,
}

impl RngRollEvaluator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            deterministic_only: false,
        }
    }

    /// Fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            deterministic_only: false,
        }
    }

    /// Reject any formula containing dice terms (duration fields and other
    /// deterministic-only contexts).
    pub fn deterministic_only(mut self) -> Self {
        self.deterministic_only = true;
        self
    }

    /// Replace `@name` references with values from the variable map.
    /// Longer names substitute first so a name never clobbers another's
    /// prefix.
    fn substitute(formula: &str, variables: &HashMap<String, i32>) -> String {
        let mut names: Vec<&String> = variables.keys().collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));
        let mut resolved = formula.to_string();
        for name in names {
            if let Some(value) = variables.get(name) {
                resolved = resolved.replace(&format!("@{name}"), &value.to_string());
            }
        }
        resolved
    }
}

impl Default for RngRollEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RollEvaluatorPort for RngRollEvaluator {
    async fn evaluate(
        &self,
        formula: &str,
        variables: &HashMap<String, i32>,
    ) -> Result<RollOutcome, RollError> {
        let resolved = Self::substitute(formula, variables);
        let expression = DiceExpression::parse(&resolved).map_err(|err| RollError::Formula {
            formula: formula.to_string(),
            message: err.to_string(),
        })?;
        if self.deterministic_only && !expression.is_deterministic() {
            return Err(RollError::DisallowedRandomTerm(formula.to_string()));
        }

        let mut rng = self.rng.lock().expect("rng mutex poisoned");
        let total = expression.evaluate_with(|sides| rng.gen_range(1..=sides as i32));
        Ok(RollOutcome {
            formula: resolved,
            total,
        })
    }
}
