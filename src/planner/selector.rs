//! Plan selection
//!
//! Picks the catalog meal for each slot and schedules it on the reference
//! date. Selection depends only on goal and tier.

use chrono::NaiveDate;

use crate::models::{BudgetTier, DailyPlan, Goal, MealSlot, PlanEntry};

use super::catalog::MealCatalog;
use super::PlanResult;

/// Selects daily plans from a catalog
#[derive(Debug, Clone, Copy)]
pub struct PlanSelector<'a> {
    catalog: &'a MealCatalog,
}

impl Default for PlanSelector<'static> {
    fn default() -> Self {
        Self::new(MealCatalog::standard())
    }
}

impl<'a> PlanSelector<'a> {
    pub fn new(catalog: &'a MealCatalog) -> Self {
        Self { catalog }
    }

    /// Breakfast, lunch and dinner for `goal` at `tier`, on `reference_date`
    pub fn select(
        &self,
        goal: Goal,
        tier: BudgetTier,
        reference_date: NaiveDate,
    ) -> PlanResult<DailyPlan> {
        let meals = self.catalog.lookup(goal, tier)?;

        let entries = MealSlot::ALL
            .iter()
            .map(|&slot| PlanEntry {
                slot,
                meal: meals.get(slot).clone(),
                scheduled_time: reference_date.and_time(slot.scheduled_time()),
            })
            .collect();

        Ok(DailyPlan::new(reference_date, entries))
    }
}

/// Select a plan from the standard catalog
pub fn select_plan(goal: Goal, tier: BudgetTier, reference_date: NaiveDate) -> PlanResult<DailyPlan> {
    PlanSelector::default().select(goal, tier, reference_date)
}
