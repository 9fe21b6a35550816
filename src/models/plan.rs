//! Daily plan model
//!
//! The selected meals for one day, and the stored form of a saved plan.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::planner::schedule::{format_time_of_day, parse_time_of_day};
use crate::planner::PlanResult;

use super::{Goal, Meal, MealSlot};

/// One meal scheduled into a slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub slot: MealSlot,
    pub meal: Meal,
    pub scheduled_time: NaiveDateTime,
}

/// Aggregated nutrition and cost for a plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTotals {
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
    pub cost_usd: f64,
}

/// A day's meals in slot order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub reference_date: NaiveDate,
    pub entries: Vec<PlanEntry>,
}

impl DailyPlan {
    pub fn new(reference_date: NaiveDate, entries: Vec<PlanEntry>) -> Self {
        Self {
            reference_date,
            entries,
        }
    }

    /// A plan with no meals
    pub fn empty(reference_date: NaiveDate) -> Self {
        Self::new(reference_date, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of meal calories
    pub fn total_calories(&self) -> u32 {
        self.entries.iter().map(|e| e.meal.calories).sum()
    }

    pub fn totals(&self) -> PlanTotals {
        let mut totals = self.entries.iter().fold(PlanTotals::default(), |acc, e| PlanTotals {
            calories: acc.calories + e.meal.calories,
            protein_g: acc.protein_g + e.meal.protein_g,
            carbs_g: acc.carbs_g + e.meal.carbs_g,
            fat_g: acc.fat_g + e.meal.fat_g,
            cost_usd: acc.cost_usd + e.meal.cost_usd,
        });
        totals.cost_usd = (totals.cost_usd * 100.0).round() / 100.0;
        totals
    }

    /// Entries ordered breakfast, lunch, dinner
    pub fn entries_in_slot_order(&self) -> Vec<&PlanEntry> {
        let mut entries: Vec<&PlanEntry> = self.entries.iter().collect();
        entries.sort_by_key(|e| (e.slot, e.scheduled_time));
        entries
    }
}

// ============================================================================
// Saved Plans
// ============================================================================

/// A plan meal as stored: slot name and a display time string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMeal {
    #[serde(rename = "type")]
    pub meal_type: String,
    pub name: String,
    pub time: String,
    pub items: Vec<String>,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub protein_g: u32,
    #[serde(default)]
    pub carbs_g: u32,
    #[serde(default)]
    pub fat_g: u32,
    #[serde(default)]
    pub cost_usd: f64,
}

impl From<&PlanEntry> for SavedMeal {
    fn from(entry: &PlanEntry) -> Self {
        Self {
            meal_type: entry.slot.as_str().to_string(),
            name: entry.meal.name.clone(),
            time: format_time_of_day(entry.scheduled_time.time()),
            items: entry.meal.ingredients.clone(),
            calories: entry.meal.calories,
            protein_g: entry.meal.protein_g,
            carbs_g: entry.meal.carbs_g,
            fat_g: entry.meal.fat_g,
            cost_usd: entry.meal.cost_usd,
        }
    }
}

impl SavedMeal {
    /// Rebuild a plan entry on `date`; fails on an unknown slot or bad time
    pub fn to_entry(&self, date: NaiveDate) -> PlanResult<PlanEntry> {
        let slot: MealSlot = self.meal_type.parse()?;
        let time = parse_time_of_day(&self.time)?;
        Ok(PlanEntry {
            slot,
            meal: Meal {
                name: self.name.clone(),
                calories: self.calories,
                protein_g: self.protein_g,
                carbs_g: self.carbs_g,
                fat_g: self.fat_g,
                cost_usd: self.cost_usd,
                ingredients: self.items.clone(),
            },
            scheduled_time: date.and_time(time),
        })
    }
}

/// Data for saving a generated plan
#[derive(Debug, Clone)]
pub struct SavedMealPlanCreate {
    pub user_code: String,
    pub goal: Goal,
    pub budget: f64,
    pub tdee: i64,
    pub target_calories: i64,
    pub plan: DailyPlan,
}

/// A meal plan stored under a user code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMealPlan {
    pub id: i64,
    pub user_code: String,
    pub goal: String,
    pub budget: f64,
    pub tdee: i64,
    pub target_calories: i64,
    pub reference_date: String,
    pub meals: Vec<SavedMeal>,
    pub created_at: String,
}

impl SavedMealPlan {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meals_json: String = row.get("meals")?;
        let meals: Vec<SavedMeal> = serde_json::from_str(&meals_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get("id")?,
            user_code: row.get("user_code")?,
            goal: row.get("goal")?,
            budget: row.get("budget")?,
            tdee: row.get("tdee")?,
            target_calories: row.get("target_calories")?,
            reference_date: row.get("reference_date")?,
            meals,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a plan
    pub fn create(conn: &Connection, data: &SavedMealPlanCreate) -> DbResult<Self> {
        let meals: Vec<SavedMeal> = data.plan.entries.iter().map(SavedMeal::from).collect();
        let meals_json = serde_json::to_string(&meals)?;

        conn.execute(
            r#"
            INSERT INTO saved_meal_plans (
                user_code, goal, budget, tdee, target_calories, reference_date, meals
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.user_code,
                data.goal.as_str(),
                data.budget,
                data.tdee,
                data.target_calories,
                data.plan.reference_date.format("%Y-%m-%d").to_string(),
                meals_json,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a saved plan by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM saved_meal_plans WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List plans for a user, newest first
    pub fn list_for_user(conn: &Connection, user_code: &str, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM saved_meal_plans
            WHERE user_code = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#,
        )?;

        let plans = stmt
            .query_map(params![user_code, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    /// Rebuild the daily plan for calendar export
    pub fn to_daily_plan(&self, date: NaiveDate) -> PlanResult<DailyPlan> {
        let entries = self
            .meals
            .iter()
            .map(|m| m.to_entry(date))
            .collect::<PlanResult<Vec<_>>>()?;
        Ok(DailyPlan::new(date, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{BudgetTier, ProfileInput, UserProfile};
    use crate::planner::{select_plan, PlanError};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_totals() {
        let plan = select_plan(Goal::WeightLoss, BudgetTier::Low, date()).unwrap();
        let totals = plan.totals();
        assert_eq!(totals.calories, 300 + 400 + 450);
        assert_eq!(totals.protein_g, 10 + 35 + 40);
        assert_eq!(totals.carbs_g, 50 + 20 + 25);
        assert_eq!(totals.fat_g, 5 + 15 + 12);
        assert_eq!(totals.cost_usd, 13.5);
        assert_eq!(plan.total_calories(), totals.calories);
    }

    #[test]
    fn test_empty_plan() {
        let plan = DailyPlan::empty(date());
        assert!(plan.is_empty());
        assert_eq!(plan.total_calories(), 0);
        assert_eq!(plan.totals(), PlanTotals::default());
    }

    #[test]
    fn test_saved_meal_round_trip() {
        let plan = select_plan(Goal::Endurance, BudgetTier::High, date()).unwrap();
        let saved: Vec<SavedMeal> = plan.entries.iter().map(SavedMeal::from).collect();
        assert_eq!(saved[0].time, "8:00 AM");
        assert_eq!(saved[1].time, "12:30 PM");
        assert_eq!(saved[2].time, "6:30 PM");

        let rebuilt: Vec<PlanEntry> = saved.iter().map(|m| m.to_entry(date()).unwrap()).collect();
        assert_eq!(rebuilt, plan.entries);
    }

    #[test]
    fn test_saved_meal_bad_time_is_format_error() {
        let mut saved = SavedMeal::from(&select_plan(Goal::Maintenance, BudgetTier::Low, date())
            .unwrap()
            .entries[0]);
        saved.time = "breakfast time".to_string();
        assert_eq!(
            saved.to_entry(date()),
            Err(PlanError::Format("breakfast time".to_string()))
        );
    }

    #[test]
    fn test_saved_meal_json_shape() {
        let json = r#"{"type":"lunch","name":"Chicken Sandwich","time":"12:30 PM","items":["Bun"]}"#;
        let saved: SavedMeal = serde_json::from_str(json).unwrap();
        assert_eq!(saved.meal_type, "lunch");
        assert_eq!(saved.calories, 0);
        let entry = saved.to_entry(date()).unwrap();
        assert_eq!(entry.slot, MealSlot::Lunch);
        assert_eq!(entry.scheduled_time, date().and_hms_opt(12, 30, 0).unwrap());
    }

    #[test]
    fn test_create_and_list() {
        let db = Database::in_memory().unwrap();
        let profile = ProfileInput {
            age: 40,
            sex: "female".to_string(),
            height_feet: Some(5),
            height_inches: Some(5.0),
            height_cm: None,
            weight: 150.0,
            weight_unit: "lb".to_string(),
            activity_level: 1.375,
        }
        .validate()
        .unwrap();

        db.with_conn(|conn| {
            UserProfile::upsert(conn, "555123", &profile)?;

            let plan = select_plan(Goal::MuscleGain, BudgetTier::Medium, date()).unwrap();
            let first = SavedMealPlan::create(
                conn,
                &SavedMealPlanCreate {
                    user_code: "555123".to_string(),
                    goal: Goal::MuscleGain,
                    budget: 20.0,
                    tdee: 2100,
                    target_calories: 2500,
                    plan: plan.clone(),
                },
            )?;
            assert_eq!(first.goal, "muscle-gain");
            assert_eq!(first.reference_date, "2026-03-14");
            assert_eq!(first.meals.len(), 3);
            assert_eq!(first.to_daily_plan(date()).unwrap(), plan);

            let second = SavedMealPlan::create(
                conn,
                &SavedMealPlanCreate {
                    user_code: "555123".to_string(),
                    goal: Goal::MuscleGain,
                    budget: 35.0,
                    tdee: 2100,
                    target_calories: 2500,
                    plan,
                },
            )?;

            let listed = SavedMealPlan::list_for_user(conn, "555123", 10)?;
            assert_eq!(listed.len(), 2);
            assert_eq!(listed[0].id, second.id);
            assert!(SavedMealPlan::list_for_user(conn, "999999", 10)?.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
