//! Saved Plan MCP Tools
//!
//! Persist generated plans against a user code and read them back.

use serde::Serialize;

use crate::db::Database;
use crate::models::{
    classify_budget, SavedMealPlan, SavedMealPlanCreate, UserProfile,
};
use crate::nutrition::compute_energy;
use crate::planner::select_plan;

use super::planning::{parse_goal, parse_reference_date, validate_budget};
use super::profiles::validate_user_code;
use super::{ToolError, ToolResult};

/// Response for save_meal_plan
#[derive(Debug, Serialize)]
pub struct SaveMealPlanResponse {
    pub success: bool,
    pub plan_id: i64,
    pub user_code: String,
    pub goal: String,
    pub reference_date: String,
    pub tdee: i64,
    pub target_calories: i64,
    pub total_calories: u32,
    pub created_at: String,
}

/// Summary of a saved plan for list results
#[derive(Debug, Serialize)]
pub struct SavedPlanSummary {
    pub id: i64,
    pub goal: String,
    pub budget: f64,
    pub reference_date: String,
    pub target_calories: i64,
    pub meal_names: Vec<String>,
    pub created_at: String,
}

impl From<&SavedMealPlan> for SavedPlanSummary {
    fn from(plan: &SavedMealPlan) -> Self {
        Self {
            id: plan.id,
            goal: plan.goal.clone(),
            budget: plan.budget,
            reference_date: plan.reference_date.clone(),
            target_calories: plan.target_calories,
            meal_names: plan.meals.iter().map(|m| m.name.clone()).collect(),
            created_at: plan.created_at.clone(),
        }
    }
}

/// Response for list_meal_plans
#[derive(Debug, Serialize)]
pub struct ListMealPlansResponse {
    pub user_code: String,
    pub plans: Vec<SavedPlanSummary>,
    pub total: usize,
}

/// Generate a plan from the stored profile and save it
pub fn save_meal_plan(
    db: &Database,
    user_code: &str,
    goal: &str,
    budget: f64,
    reference_date: Option<&str>,
) -> ToolResult<SaveMealPlanResponse> {
    let code = validate_user_code(user_code)?;
    let goal = parse_goal(goal).map_err(ToolError::InvalidInput)?;
    let budget = validate_budget(budget).map_err(ToolError::InvalidInput)?;
    let date = parse_reference_date(reference_date).map_err(ToolError::InvalidInput)?;

    let conn = db
        .get_conn()
        .map_err(|e| ToolError::internal(format!("Database error: {}", e)))?;

    let stored = UserProfile::get_by_code(&conn, code)
        .map_err(|e| ToolError::internal(format!("Failed to load profile: {}", e)))?
        .ok_or_else(|| {
            ToolError::InvalidInput(format!(
                "No profile found for code {}. Save your profile first.",
                code
            ))
        })?;

    let energy = compute_energy(&stored.profile, goal);
    let plan = select_plan(goal, classify_budget(budget), date)
        .map_err(|e| ToolError::internal(e.to_string()))?;
    let total_calories = plan.total_calories();

    let saved = SavedMealPlan::create(
        &conn,
        &SavedMealPlanCreate {
            user_code: code.to_string(),
            goal,
            budget,
            tdee: energy.tdee,
            target_calories: energy.target_calories,
            plan,
        },
    )
    .map_err(|e| ToolError::internal(format!("Failed to save meal plan: {}", e)))?;

    tracing::info!(user_code = %code, plan_id = saved.id, "saved meal plan");

    Ok(SaveMealPlanResponse {
        success: true,
        plan_id: saved.id,
        user_code: saved.user_code,
        goal: saved.goal,
        reference_date: saved.reference_date,
        tdee: saved.tdee,
        target_calories: saved.target_calories,
        total_calories,
        created_at: saved.created_at,
    })
}

/// List a user's saved plans, newest first
pub fn list_meal_plans(db: &Database, user_code: &str, limit: i64) -> ToolResult<ListMealPlansResponse> {
    let code = validate_user_code(user_code)?;
    let limit = limit.clamp(1, 100);
    let conn = db
        .get_conn()
        .map_err(|e| ToolError::internal(format!("Database error: {}", e)))?;

    let plans = SavedMealPlan::list_for_user(&conn, code, limit)
        .map_err(|e| ToolError::internal(format!("Failed to list meal plans: {}", e)))?;

    let summaries: Vec<SavedPlanSummary> = plans.iter().map(SavedPlanSummary::from).collect();
    let total = summaries.len();

    Ok(ListMealPlansResponse {
        user_code: code.to_string(),
        plans: summaries,
        total,
    })
}

/// Get a saved plan by ID
pub fn get_meal_plan(db: &Database, id: i64) -> ToolResult<Option<SavedMealPlan>> {
    let conn = db
        .get_conn()
        .map_err(|e| ToolError::internal(format!("Database error: {}", e)))?;
    SavedMealPlan::get_by_id(&conn, id)
        .map_err(|e| ToolError::internal(format!("Failed to get meal plan: {}", e)))
}
