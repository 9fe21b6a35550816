//! Planning MCP Tools
//!
//! Energy calculation, meal plan generation and catalog browsing.
//! Raw client input is validated here before it reaches the planner.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{
    classify_budget, BudgetTier, DailyPlan, Goal, PlanEntry, PlanTotals, ProfileInput,
};
use crate::nutrition::{compute_energy, EnergyResult};
use crate::planner::{format_time_of_day, select_plan, MealCatalog, MealSet};

/// Response for calculate_energy
#[derive(Debug, Serialize)]
pub struct CalculateEnergyResponse {
    pub goal: Goal,
    pub goal_description: &'static str,
    pub activity_level: &'static str,
    pub activity_factor: f64,
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(flatten)]
    pub energy: EnergyResult,
}

/// A meal as shown in a generated plan
#[derive(Debug, Serialize)]
pub struct PlannedMealView {
    pub slot: &'static str,
    pub label: &'static str,
    pub time: String,
    pub scheduled_at: NaiveDateTime,
    pub name: String,
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
    pub cost: String,
    pub ingredients: Vec<String>,
}

impl From<&PlanEntry> for PlannedMealView {
    fn from(entry: &PlanEntry) -> Self {
        Self {
            slot: entry.slot.as_str(),
            label: entry.slot.label(),
            time: format_time_of_day(entry.scheduled_time.time()),
            scheduled_at: entry.scheduled_time,
            name: entry.meal.name.clone(),
            calories: entry.meal.calories,
            protein_g: entry.meal.protein_g,
            carbs_g: entry.meal.carbs_g,
            fat_g: entry.meal.fat_g,
            cost: entry.meal.cost_display(),
            ingredients: entry.meal.ingredients.clone(),
        }
    }
}

/// Response for generate_meal_plan
#[derive(Debug, Serialize)]
pub struct MealPlanResponse {
    pub goal: Goal,
    pub goal_description: &'static str,
    pub budget: f64,
    pub budget_tier: BudgetTier,
    pub reference_date: NaiveDate,
    pub energy: EnergyResult,
    pub meals: Vec<PlannedMealView>,
    pub totals: PlanTotals,
    /// Plan calories minus target calories
    pub calorie_difference: i64,
}

/// Response for get_catalog_meals
#[derive(Debug, Serialize)]
pub struct CatalogMealsResponse {
    pub goal: Goal,
    pub budget_tier: BudgetTier,
    pub meals: MealSet,
}

/// Response for classify_budget
#[derive(Debug, Serialize)]
pub struct ClassifyBudgetResponse {
    pub budget: f64,
    pub budget_tier: BudgetTier,
}

/// A plan with everything computed for it
#[derive(Debug, Clone)]
pub struct GeneratedPlan {
    pub goal: Goal,
    pub budget: f64,
    pub tier: BudgetTier,
    pub energy: EnergyResult,
    pub plan: DailyPlan,
}

impl GeneratedPlan {
    pub fn to_response(&self) -> MealPlanResponse {
        let totals = self.plan.totals();
        MealPlanResponse {
            goal: self.goal,
            goal_description: self.goal.description(),
            budget: self.budget,
            budget_tier: self.tier,
            reference_date: self.plan.reference_date,
            energy: self.energy,
            meals: self.plan.entries.iter().map(PlannedMealView::from).collect(),
            totals,
            calorie_difference: i64::from(totals.calories) - self.energy.target_calories,
        }
    }
}

/// Parse a goal name, rejecting anything outside the four known goals
pub fn parse_goal(goal: &str) -> Result<Goal, String> {
    goal.parse::<Goal>().map_err(|e| e.to_string())
}

/// Budget must be a finite, non-negative amount
pub fn validate_budget(budget: f64) -> Result<f64, String> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(format!("budget must be a non-negative amount, got {}", budget));
    }
    Ok(budget)
}

/// Parse an ISO date, defaulting to tomorrow
pub fn parse_reference_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", d)),
        None => {
            let today = Local::now().date_naive();
            today
                .succ_opt()
                .ok_or_else(|| "Cannot schedule past the last representable date".to_string())
        }
    }
}

/// Validate inputs, compute energy and select the day's meals
pub fn build_plan(
    profile: &ProfileInput,
    goal: &str,
    budget: f64,
    reference_date: Option<&str>,
) -> Result<GeneratedPlan, String> {
    let profile = profile.validate().map_err(|e| e.to_string())?;
    let goal = parse_goal(goal)?;
    let budget = validate_budget(budget)?;
    let date = parse_reference_date(reference_date)?;

    let tier = classify_budget(budget);
    let energy = compute_energy(&profile, goal);
    let plan = select_plan(goal, tier, date).map_err(|e| e.to_string())?;

    tracing::info!(
        goal = %goal,
        tier = %tier,
        target = energy.target_calories,
        plan_calories = plan.total_calories(),
        "generated meal plan"
    );

    Ok(GeneratedPlan {
        goal,
        budget,
        tier,
        energy,
        plan,
    })
}

/// Compute BMR, TDEE and target calories
pub fn calculate_energy(profile: &ProfileInput, goal: &str) -> Result<CalculateEnergyResponse, String> {
    let profile = profile.validate().map_err(|e| e.to_string())?;
    let goal = parse_goal(goal)?;
    let energy = compute_energy(&profile, goal);

    Ok(CalculateEnergyResponse {
        goal,
        goal_description: goal.description(),
        activity_level: profile.activity.as_str(),
        activity_factor: profile.activity.factor(),
        weight_kg: profile.weight.to_kg(),
        height_cm: profile.height.to_cm(),
        energy,
    })
}

/// Generate a complete daily meal plan
pub fn generate_meal_plan(
    profile: &ProfileInput,
    goal: &str,
    budget: f64,
    reference_date: Option<&str>,
) -> Result<MealPlanResponse, String> {
    build_plan(profile, goal, budget, reference_date).map(|generated| generated.to_response())
}

/// Catalog meals for a goal at a tier (or at the tier a budget falls in)
pub fn get_catalog_meals(
    goal: &str,
    tier: Option<&str>,
    budget: Option<f64>,
) -> Result<CatalogMealsResponse, String> {
    let goal = parse_goal(goal)?;
    let tier = match (tier, budget) {
        (Some(t), _) => t.parse::<BudgetTier>().map_err(|e| e.to_string())?,
        (None, Some(b)) => classify_budget(validate_budget(b)?),
        (None, None) => return Err("Provide either budget_tier or budget".to_string()),
    };

    let meals = MealCatalog::standard()
        .lookup(goal, tier)
        .map_err(|e| e.to_string())?
        .clone();

    Ok(CatalogMealsResponse {
        goal,
        budget_tier: tier,
        meals,
    })
}

/// Budget tier for an amount
pub fn classify_budget_amount(budget: f64) -> Result<ClassifyBudgetResponse, String> {
    let budget = validate_budget(budget)?;
    Ok(ClassifyBudgetResponse {
        budget,
        budget_tier: classify_budget(budget),
    })
}
