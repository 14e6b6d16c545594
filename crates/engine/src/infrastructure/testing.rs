//! Scripted roll evaluator for deterministic tests
//!
//! Returns pre-seeded totals in order, whatever the formula. Exhausting the
//! script is an evaluator error, so a test that rolls more than it scripted
//! fails loudly instead of silently rolling zeros.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::outbound::{RollError, RollEvaluatorPort, RollOutcome};

pub struct ScriptedRollEvaluator {
    script: Mutex<VecDeque<i32>>,
}

impl ScriptedRollEvaluator {
    pub fn new(totals: impl IntoIterator<Item = i32>) -> Self {
        Self {
            script: Mutex::new(totals.into_iter().collect()),
        }
    }
}

#[async_trait]
impl RollEvaluatorPort for ScriptedRollEvaluator {
    async fn evaluate(
        &self,
        formula: &str,
        _variables: &HashMap<String, i32>,
    ) -> Result<RollOutcome, RollError> {
        let total = self
            .script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .ok_or_else(|| RollError::Unavailable("roll script exhausted".to_string()))?;
        Ok(RollOutcome {
            formula: formula.to_string(),
            total,
        })
    }
}
