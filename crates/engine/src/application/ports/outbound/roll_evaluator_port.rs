//! Roll Evaluator Port - interface to the host's dice roller
//!
//! The engine synthesizes formula strings; the host resolves them into
//! totals. Randomness never lives in this crate's application layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A resolved roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollOutcome {
    pub formula: String,
    pub total: i32,
}

/// Errors from formula evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RollError {
    /// Formula syntax is invalid
    #[error("Malformed roll formula '{formula}': {message}")]
    Formula { formula: String, message: String },

    /// The formula contains dice terms in a deterministic-only context
    #[error("Formula '{0}' contains dice terms in a deterministic-only context")]
    DisallowedRandomTerm(String),

    /// The evaluator could not service the request
    #[error("Roll evaluator unavailable: {0}")]
    Unavailable(String),
}

/// Port for resolving dice formulas into totals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RollEvaluatorPort: Send + Sync {
    /// Evaluate a formula. `variables` supplies `@name` substitutions the
    /// formula may reference.
    async fn evaluate(
        &self,
        formula: &str,
        variables: &HashMap<String, i32>,
    ) -> Result<RollOutcome, RollError>;
}
