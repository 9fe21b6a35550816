//! Planner error types

use thiserror::Error;

/// Errors raised by the planning core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Caller passed an unsupported goal, tier, slot or biometric value
    #[error("Invalid input: {0}")]
    ContractViolation(String),

    /// The catalog has no meals for a (goal, tier) pair
    #[error("No meals found for goal '{goal}' at '{tier}' budget")]
    NotFound { goal: String, tier: String },

    /// A time-of-day string could not be split into hour and minute
    #[error("Invalid time of day '{0}' (expected H:MM AM/PM or HH:MM)")]
    Format(String),
}

impl PlanError {
    pub fn contract(msg: impl Into<String>) -> Self {
        PlanError::ContractViolation(msg.into())
    }
}

/// Result type for planner operations
pub type PlanResult<T> = Result<T, PlanError>;
