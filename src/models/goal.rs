//! Fitness goals and budget tiers
//!
//! Both are closed enumerations; string parsing is strict so unknown
//! values are rejected at the boundary rather than deep inside the planner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::planner::PlanError;

/// Fitness goal driving both the calorie target and the meal choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    WeightLoss,
    MuscleGain,
    Maintenance,
    Endurance,
}

impl Goal {
    pub const ALL: [Goal; 4] = [
        Goal::WeightLoss,
        Goal::MuscleGain,
        Goal::Maintenance,
        Goal::Endurance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "weight-loss",
            Goal::MuscleGain => "muscle-gain",
            Goal::Maintenance => "maintenance",
            Goal::Endurance => "endurance",
        }
    }

    /// Daily kcal offset applied to TDEE
    pub fn calorie_offset(&self) -> i64 {
        match self {
            Goal::WeightLoss => -500,
            Goal::MuscleGain => 400,
            Goal::Maintenance => 0,
            Goal::Endurance => 250,
        }
    }

    /// One-line summary shown next to a generated plan
    pub fn description(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "Focus on calorie deficit with high protein to preserve muscle",
            Goal::MuscleGain => "High protein and calorie surplus to support muscle growth",
            Goal::Maintenance => "Balanced nutrition to maintain current weight and health",
            Goal::Endurance => "High carbohydrate intake to fuel long-duration activities",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "weight-loss" => Ok(Goal::WeightLoss),
            "muscle-gain" => Ok(Goal::MuscleGain),
            "maintenance" => Ok(Goal::Maintenance),
            "endurance" => Ok(Goal::Endurance),
            _ => Err(PlanError::contract(format!(
                "unknown goal '{}' (expected weight-loss, muscle-gain, maintenance or endurance)",
                s
            ))),
        }
    }
}

/// Pricing category derived from a daily food budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    Medium,
    High,
}

/// Lower bound (inclusive) of the medium tier, in dollars
pub const MEDIUM_BUDGET_MIN: f64 = 18.0;
/// Lower bound (inclusive) of the high tier, in dollars
pub const HIGH_BUDGET_MIN: f64 = 30.0;

impl BudgetTier {
    pub const ALL: [BudgetTier; 3] = [BudgetTier::Low, BudgetTier::Medium, BudgetTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Low => "low",
            BudgetTier::Medium => "medium",
            BudgetTier::High => "high",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetTier {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(BudgetTier::Low),
            "medium" => Ok(BudgetTier::Medium),
            "high" => Ok(BudgetTier::High),
            _ => Err(PlanError::contract(format!(
                "unknown budget tier '{}' (expected low, medium or high)",
                s
            ))),
        }
    }
}

/// Classify a daily budget amount. Boundaries belong to the upper tier.
pub fn classify_budget(amount: f64) -> BudgetTier {
    if amount >= HIGH_BUDGET_MIN {
        BudgetTier::High
    } else if amount >= MEDIUM_BUDGET_MIN {
        BudgetTier::Medium
    } else {
        BudgetTier::Low
    }
}
