//! FMP MCP Server Implementation
//!
//! Exposes energy calculation, plan generation, saved data and calendar
//! export as MCP tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::calendar::CalendarExporter;
use crate::db::Database;
use crate::models::ProfileInput;
use crate::tools::calendar::{self, ExportRequest};
use crate::tools::status::{StatusTracker, PLANNER_INSTRUCTIONS};
use crate::tools::{planning, plans, profiles, ToolError};

/// FMP MCP Service
#[derive(Clone)]
pub struct FmpService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    exporter: CalendarExporter,
    export_dir: PathBuf,
    tool_router: ToolRouter<FmpService>,
}

impl FmpService {
    pub fn new(
        database_path: PathBuf,
        database: Database,
        exporter: CalendarExporter,
        export_dir: PathBuf,
    ) -> Self {
        let tracker = StatusTracker::new(database_path, export_dir.clone(), exporter.timezone());
        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            database,
            exporter,
            export_dir,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

/// Biometric profile as sent by the client
#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ProfileParams {
    /// Age in whole years (1-120)
    pub age: i64,
    /// "male" or "female"
    pub sex: String,
    /// Imperial height: feet part
    pub height_feet: Option<u32>,
    /// Imperial height: inches part (0 to under 12)
    pub height_inches: Option<f64>,
    /// Metric height in centimeters; used instead of feet/inches when set
    pub height_cm: Option<f64>,
    pub weight: f64,
    /// "lb" or "kg" (default "lb")
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    /// Activity factor: 1.2, 1.375, 1.55, 1.725 or 1.9
    pub activity_level: f64,
}

fn default_weight_unit() -> String { "lb".to_string() }

impl From<ProfileParams> for ProfileInput {
    fn from(p: ProfileParams) -> Self {
        ProfileInput {
            age: p.age,
            sex: p.sex,
            height_feet: p.height_feet,
            height_inches: p.height_inches,
            height_cm: p.height_cm,
            weight: p.weight,
            weight_unit: p.weight_unit,
            activity_level: p.activity_level,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateEnergyParams {
    pub profile: ProfileParams,
    /// weight-loss, muscle-gain, maintenance or endurance
    pub goal: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateMealPlanParams {
    pub profile: ProfileParams,
    /// weight-loss, muscle-gain, maintenance or endurance
    pub goal: String,
    /// Daily food budget in USD
    pub budget: f64,
    /// Plan date (YYYY-MM-DD), defaults to tomorrow
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetCatalogMealsParams {
    pub goal: String,
    /// low, medium or high
    pub budget_tier: Option<String>,
    /// Used to pick the tier when budget_tier is absent
    pub budget: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyBudgetParams {
    /// Daily food budget in USD
    pub budget: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveProfileParams {
    /// Existing 6-digit code to update; omit to create a new one
    pub user_code: Option<String>,
    pub profile: ProfileParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserCodeParams {
    /// 6-digit user code
    pub user_code: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveMealPlanParams {
    /// 6-digit user code of a saved profile
    pub user_code: String,
    pub goal: String,
    pub budget: f64,
    /// Plan date (YYYY-MM-DD), defaults to tomorrow
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealPlansParams {
    pub user_code: String,
    #[serde(default = "default_plan_limit")]
    pub limit: i64,
}

fn default_plan_limit() -> i64 { 10 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMealPlanParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportCalendarParams {
    /// Saved plan to export; otherwise goal and budget select one
    pub plan_id: Option<i64>,
    pub goal: Option<String>,
    pub budget: Option<f64>,
    /// Event date (YYYY-MM-DD); saved plans default to their own date, others to tomorrow
    pub date: Option<String>,
    /// File to write; defaults to fitness-meal-plan.ics in the export directory
    pub output_path: Option<String>,
    /// Return the calendar text in the response as well
    #[serde(default)]
    pub include_content: bool,
}

impl From<ExportCalendarParams> for ExportRequest {
    fn from(p: ExportCalendarParams) -> Self {
        ExportRequest {
            plan_id: p.plan_id,
            goal: p.goal,
            budget: p.budget,
            reference_date: p.date,
            output_path: p.output_path,
            include_content: p.include_content,
        }
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidInput(msg) => McpError::invalid_params(msg, None),
            ToolError::Internal(msg) => McpError::internal_error(msg, None),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl FmpService {
    // --- Status ---

    #[tool(description = "Get the current status of the FMP service including build info, database status, export settings and process information")]
    async fn fmp_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for building a meal plan. Call this before collecting a user's profile or when unsure which tool to use.")]
    fn planner_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(PLANNER_INSTRUCTIONS)]))
    }

    // --- Planning ---

    #[tool(description = "Calculate BMR (Mifflin-St Jeor), TDEE and goal-adjusted target calories for a profile")]
    fn calculate_energy(&self, Parameters(p): Parameters<CalculateEnergyParams>) -> Result<CallToolResult, McpError> {
        let result = planning::calculate_energy(&p.profile.into(), &p.goal)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Generate a breakfast, lunch and dinner plan for a goal and daily budget, with energy targets and totals")]
    fn generate_meal_plan(&self, Parameters(p): Parameters<GenerateMealPlanParams>) -> Result<CallToolResult, McpError> {
        let result = planning::generate_meal_plan(&p.profile.into(), &p.goal, p.budget, p.date.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Show the catalog meals for a goal at a budget tier (or at the tier a budget amount falls in)")]
    fn get_catalog_meals(&self, Parameters(p): Parameters<GetCatalogMealsParams>) -> Result<CallToolResult, McpError> {
        let result = planning::get_catalog_meals(&p.goal, p.budget_tier.as_deref(), p.budget)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Classify a daily budget into low (< $18), medium (< $30) or high")]
    fn classify_budget(&self, Parameters(p): Parameters<ClassifyBudgetParams>) -> Result<CallToolResult, McpError> {
        let result = planning::classify_budget_amount(p.budget)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Profiles ---

    #[tool(description = "Save a biometric profile. Without user_code a new 6-digit code is generated; with one the profile is updated.")]
    fn save_profile(&self, Parameters(p): Parameters<SaveProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::save_profile(&self.database, p.user_code.as_deref(), &p.profile.into())?;
        to_json(&result)
    }

    #[tool(description = "Load a saved profile by its 6-digit code")]
    fn load_profile(&self, Parameters(p): Parameters<UserCodeParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::load_profile(&self.database, &p.user_code)?;
        match result {
            Some(profile) => to_json(&profile),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Profile not found", "user_code": "{}"}}"#,
                p.user_code.trim()
            ))])),
        }
    }

    // --- Saved Plans ---

    #[tool(description = "Generate a plan from a saved profile and store it under the user's code")]
    fn save_meal_plan(&self, Parameters(p): Parameters<SaveMealPlanParams>) -> Result<CallToolResult, McpError> {
        let result = plans::save_meal_plan(&self.database, &p.user_code, &p.goal, p.budget, p.date.as_deref())?;
        to_json(&result)
    }

    #[tool(description = "List a user's saved meal plans, newest first")]
    fn list_meal_plans(&self, Parameters(p): Parameters<ListMealPlansParams>) -> Result<CallToolResult, McpError> {
        let result = plans::list_meal_plans(&self.database, &p.user_code, p.limit)?;
        to_json(&result)
    }

    #[tool(description = "Get a saved meal plan with all meals")]
    fn get_meal_plan(&self, Parameters(p): Parameters<GetMealPlanParams>) -> Result<CallToolResult, McpError> {
        let result = plans::get_meal_plan(&self.database, p.id)?;
        match result {
            Some(plan) => to_json(&plan),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Meal plan not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    // --- Calendar ---

    #[tool(description = "Export a day's meals as an iCalendar (.ics) file with a 30-minute reminder before each meal. Pass plan_id for a saved plan, or goal and budget.")]
    fn export_calendar(&self, Parameters(p): Parameters<ExportCalendarParams>) -> Result<CallToolResult, McpError> {
        let result = calendar::export_calendar(&self.database, &self.exporter, &self.export_dir, &p.into())?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for FmpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fmp".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Fitness Meal Planner".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Fitness Meal Planner (FMP) - Goal-based daily meal plans with calendar export. \
                 IMPORTANT: Call planner_instructions first. \
                 Energy: calculate_energy. \
                 Plans: generate_meal_plan, get_catalog_meals, classify_budget. \
                 Profiles: save_profile/load_profile (6-digit user codes). \
                 Saved plans: save_meal_plan/list_meal_plans/get_meal_plan. \
                 Calendar: export_calendar writes an .ics file."
                    .into(),
            ),
        }
    }
}
