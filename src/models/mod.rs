//! Data models
//!
//! Value types shared by the planner, plus the stored profile and plan rows.

mod goal;
mod meal;
mod plan;
mod profile;

pub use goal::{classify_budget, BudgetTier, Goal, HIGH_BUDGET_MIN, MEDIUM_BUDGET_MIN};
pub use meal::{Meal, MealSlot};
pub use plan::{DailyPlan, PlanEntry, PlanTotals, SavedMeal, SavedMealPlan, SavedMealPlanCreate};
pub use profile::{
    generate_user_code, is_valid_user_code, ActivityLevel, BiometricProfile, ProfileInput, Sex,
    UserProfile,
};
