//! Calendar export MCP tool
//!
//! Writes a day's plan as an `.ics` file. The plan is either a saved one
//! (by id) or freshly selected from a goal and budget.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{CalendarExporter, FILE_NAME};
use crate::db::Database;
use crate::models::{classify_budget, DailyPlan, SavedMealPlan};
use crate::planner::select_plan;

use super::planning::{parse_goal, parse_reference_date, validate_budget};
use super::{ToolError, ToolResult};

/// Which plan to export and where
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub plan_id: Option<i64>,
    pub goal: Option<String>,
    pub budget: Option<f64>,
    pub reference_date: Option<String>,
    pub output_path: Option<String>,
    pub include_content: bool,
}

/// Response for export_calendar
#[derive(Debug, Serialize)]
pub struct ExportCalendarResponse {
    pub success: bool,
    pub path: String,
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub event_count: usize,
    pub timezone: String,
    pub reference_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Export a plan to an iCalendar file
pub fn export_calendar(
    db: &Database,
    exporter: &CalendarExporter,
    export_dir: &Path,
    req: &ExportRequest,
) -> ToolResult<ExportCalendarResponse> {
    let plan = resolve_plan(db, req)?;
    let document = exporter.export(&plan);

    let path = match req.output_path.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => PathBuf::from(p),
        None => export_dir.join(FILE_NAME),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| {
                ToolError::internal(format!("Failed to create directory {}: {}", parent.display(), e))
            })?;
    }
    document
        .write_to(&path)
        .map_err(|e| ToolError::internal(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::info!(path = %path.display(), events = document.event_count, "wrote calendar file");

    Ok(ExportCalendarResponse {
        success: true,
        path: path.display().to_string(),
        file_name: document.file_name(),
        mime_type: document.mime_type(),
        event_count: document.event_count,
        timezone: exporter.timezone().to_string(),
        reference_date: plan.reference_date,
        content: req.include_content.then(|| document.content.clone()),
    })
}

/// Saved plans keep their stored date unless a date is given
fn resolve_plan(db: &Database, req: &ExportRequest) -> ToolResult<DailyPlan> {
    if let Some(id) = req.plan_id {
        let conn = db
            .get_conn()
            .map_err(|e| ToolError::internal(format!("Database error: {}", e)))?;
        let saved = SavedMealPlan::get_by_id(&conn, id)
            .map_err(|e| ToolError::internal(format!("Failed to get meal plan: {}", e)))?
            .ok_or_else(|| ToolError::InvalidInput(format!("Meal plan {} not found", id)))?;

        let date = match req.reference_date.as_deref() {
            Some(d) => parse_reference_date(Some(d)).map_err(ToolError::InvalidInput)?,
            // A bad stored date is corrupt data, not caller input
            None => parse_reference_date(Some(&saved.reference_date)).map_err(ToolError::Internal)?,
        };
        return saved
            .to_daily_plan(date)
            .map_err(|e| ToolError::internal(e.to_string()));
    }

    let goal = req
        .goal
        .as_deref()
        .ok_or_else(|| ToolError::InvalidInput("Provide either plan_id or goal and budget".to_string()))?;
    let goal = parse_goal(goal).map_err(ToolError::InvalidInput)?;
    let budget = req.budget.ok_or_else(|| {
        ToolError::InvalidInput("budget is required when exporting by goal".to_string())
    })?;
    let budget = validate_budget(budget).map_err(ToolError::InvalidInput)?;
    let date = parse_reference_date(req.reference_date.as_deref()).map_err(ToolError::InvalidInput)?;

    select_plan(goal, classify_budget(budget), date).map_err(|e| ToolError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MIME_TYPE;
    use crate::models::{ProfileInput, SavedMeal};
    use crate::tools::plans::save_meal_plan;
    use crate::tools::profiles::save_profile;

    fn by_goal() -> ExportRequest {
        ExportRequest {
            goal: Some("muscle-gain".to_string()),
            budget: Some(12.0),
            reference_date: Some("2026-10-20".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_export_by_goal_writes_file() {
        let db = Database::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let exporter = CalendarExporter::new("Europe/Berlin");

        let resp = export_calendar(&db, &exporter, dir.path(), &by_goal()).unwrap();
        assert_eq!(resp.event_count, 3);
        assert_eq!(resp.mime_type, MIME_TYPE);
        assert_eq!(resp.timezone, "Europe/Berlin");
        assert!(resp.content.is_none());

        let written = std::fs::read_to_string(dir.path().join(FILE_NAME)).unwrap();
        assert!(written.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(written.contains("DTSTART:20261020T080000\r\n"));
        assert!(written.contains("X-WR-TIMEZONE:Europe/Berlin\r\n"));
    }

    #[test]
    fn test_export_custom_path_and_content() {
        let db = Database::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("today.ics");

        let mut req = by_goal();
        req.output_path = Some(target.display().to_string());
        req.include_content = true;

        let resp = export_calendar(&db, &CalendarExporter::default(), dir.path(), &req).unwrap();
        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(resp.content.as_deref(), Some(written.as_str()));
        assert!(!dir.path().join(FILE_NAME).exists());
    }

    #[test]
    fn test_export_saved_plan() {
        let db = Database::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let input = ProfileInput {
            age: 30,
            sex: "male".to_string(),
            height_feet: None,
            height_inches: None,
            height_cm: Some(170.0),
            weight: 70.0,
            weight_unit: "kg".to_string(),
            activity_level: 1.2,
        };
        let code = save_profile(&db, None, &input).unwrap().user_code;
        let saved = save_meal_plan(&db, &code, "maintenance", 5.0, Some("2026-11-05")).unwrap();

        let req = ExportRequest {
            plan_id: Some(saved.plan_id),
            include_content: true,
            ..Default::default()
        };
        let resp = export_calendar(&db, &CalendarExporter::default(), dir.path(), &req).unwrap();
        assert_eq!(resp.reference_date, NaiveDate::from_ymd_opt(2026, 11, 5).unwrap());
        let content = resp.content.unwrap();
        assert!(content.contains("SUMMARY:Spaghetti with Meatballs\r\n"));
        assert!(content.contains("DTSTART:20261105T183000\r\n"));
    }

    #[test]
    fn test_export_saved_plan_with_bad_time_fails() {
        let db = Database::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();

        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO user_profiles (user_code, age, sex, height_system, height_cm, weight, weight_unit, activity_level)
                 VALUES ('246810', 30, 'male', 'metric', 170.0, 70.0, 'kg', 1.2)",
                [],
            )?;
            let meals = vec![SavedMeal {
                meal_type: "breakfast".to_string(),
                name: "Toast".to_string(),
                time: "morning".to_string(),
                items: vec!["Bread".to_string()],
                calories: 200,
                protein_g: 6,
                carbs_g: 30,
                fat_g: 4,
                cost_usd: 1.0,
            }];
            conn.execute(
                "INSERT INTO saved_meal_plans (user_code, goal, budget, tdee, target_calories, reference_date, meals)
                 VALUES ('246810', 'maintenance', 5.0, 2000, 2000, '2026-11-05', ?1)",
                [serde_json::to_string(&meals)?],
            )?;
            Ok(())
        })
        .unwrap();

        let req = ExportRequest {
            plan_id: Some(1),
            ..Default::default()
        };
        let err = export_calendar(&db, &CalendarExporter::default(), dir.path(), &req).unwrap_err();
        assert!(err.to_string().contains("morning"), "{}", err);
        assert!(!err.is_invalid_input());
        assert!(!dir.path().join(FILE_NAME).exists());
    }

    #[test]
    fn test_export_requires_a_plan_source() {
        let db = Database::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let exporter = CalendarExporter::default();

        assert!(export_calendar(&db, &exporter, dir.path(), &ExportRequest::default()).is_err());

        let mut no_budget = by_goal();
        no_budget.budget = None;
        assert!(export_calendar(&db, &exporter, dir.path(), &no_budget).is_err());

        let missing = ExportRequest {
            plan_id: Some(42),
            ..Default::default()
        };
        let err = export_calendar(&db, &exporter, dir.path(), &missing).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(err.is_invalid_input());
    }
}
