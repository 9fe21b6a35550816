//! User profile model
//!
//! Biometric inputs for the energy model, plus the stored profile keyed
//! by a six-digit user code.

use std::str::FromStr;

use rand::Rng;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::units::{Height, Weight};
use crate::planner::{PlanError, PlanResult};

/// Sex category used by the Mifflin-St Jeor constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" | "other" => Ok(Sex::Female),
            _ => Err(PlanError::contract(format!("unknown sex '{}' (expected male or female)", s))),
        }
    }
}

/// Activity multiplier applied to BMR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days/week
    LightlyActive,
    /// Exercise 3-5 days/week
    ModeratelyActive,
    /// Exercise 6-7 days/week
    VeryActive,
    /// Physical job or twice-daily training
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    /// Match a raw multiplier against the fixed set
    pub fn from_factor(factor: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| (level.factor() - factor).abs() < 1e-9)
    }
}

/// Biometric inputs for the energy model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiometricProfile {
    pub age: u32,
    pub sex: Sex,
    pub height: Height,
    pub weight: Weight,
    pub activity: ActivityLevel,
}

/// Raw profile fields as submitted by a client, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInput {
    pub age: i64,
    pub sex: String,
    pub height_feet: Option<u32>,
    pub height_inches: Option<f64>,
    /// Takes precedence over feet/inches when present
    pub height_cm: Option<f64>,
    pub weight: f64,
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    pub activity_level: f64,
}

fn default_weight_unit() -> String {
    "lb".to_string()
}

impl ProfileInput {
    /// Check ranges and units, producing a profile the energy model can trust
    pub fn validate(&self) -> PlanResult<BiometricProfile> {
        if !(1..=120).contains(&self.age) {
            return Err(PlanError::contract(format!(
                "age must be between 1 and 120, got {}",
                self.age
            )));
        }

        let sex: Sex = self.sex.parse()?;

        let height = match (self.height_cm, self.height_feet) {
            (Some(cm), _) => {
                if !cm.is_finite() || cm <= 0.0 {
                    return Err(PlanError::contract("height_cm must be greater than 0"));
                }
                Height::metric(cm)
            }
            (None, Some(feet)) => {
                let inches = self.height_inches.unwrap_or(0.0);
                if !inches.is_finite() || !(0.0..12.0).contains(&inches) {
                    return Err(PlanError::contract("height_inches must be between 0 and 11.99"));
                }
                if feet == 0 && inches == 0.0 {
                    return Err(PlanError::contract("height must be greater than 0"));
                }
                Height::imperial(feet, inches)
            }
            (None, None) => {
                return Err(PlanError::contract(
                    "height is required (height_feet + height_inches, or height_cm)",
                ))
            }
        };

        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(PlanError::contract("weight must be greater than 0"));
        }
        let weight = Weight::from_parts(self.weight, &self.weight_unit).ok_or_else(|| {
            PlanError::contract(format!("unknown weight unit '{}' (expected lb or kg)", self.weight_unit))
        })?;

        let activity = ActivityLevel::from_factor(self.activity_level).ok_or_else(|| {
            PlanError::contract(format!(
                "activity_level {} is not one of 1.2, 1.375, 1.55, 1.725, 1.9",
                self.activity_level
            ))
        })?;

        Ok(BiometricProfile {
            age: self.age as u32,
            sex,
            height,
            weight,
            activity,
        })
    }
}

// ============================================================================
// User Codes
// ============================================================================

/// Generate a random six-digit user code in [100000, 999999]
pub fn generate_user_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    format!("{:06}", code)
}

/// True when the string is exactly six ASCII digits
pub fn is_valid_user_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// Stored Profile
// ============================================================================

/// A biometric profile saved under a user code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_code: String,
    pub profile: BiometricProfile,
    pub created_at: String,
    pub updated_at: String,
}

fn conversion_error(col: usize, err: PlanError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

impl UserProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex: String = row.get("sex")?;
        let sex = sex.parse::<Sex>().map_err(|e| conversion_error(0, e))?;

        let system: String = row.get("height_system")?;
        let height = match system.as_str() {
            "metric" => Height::metric(row.get("height_cm")?),
            _ => Height::imperial(
                row.get("height_feet")?,
                row.get::<_, Option<f64>>("height_inches")?.unwrap_or(0.0),
            ),
        };

        let weight_value: f64 = row.get("weight")?;
        let weight_unit: String = row.get("weight_unit")?;
        let weight = Weight::from_parts(weight_value, &weight_unit).ok_or_else(|| {
            conversion_error(0, PlanError::contract(format!("bad weight unit '{}'", weight_unit)))
        })?;

        let factor: f64 = row.get("activity_level")?;
        let activity = ActivityLevel::from_factor(factor).ok_or_else(|| {
            conversion_error(0, PlanError::contract(format!("bad activity level {}", factor)))
        })?;

        Ok(Self {
            id: row.get("id")?,
            user_code: row.get("user_code")?,
            profile: BiometricProfile {
                age: row.get("age")?,
                sex,
                height,
                weight,
                activity,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get a profile by user code
    pub fn get_by_code(conn: &Connection, code: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE user_code = ?1")?;

        let result = stmt.query_row([code], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a code is already taken
    pub fn exists(conn: &Connection, code: &str) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM user_profiles WHERE user_code = ?1",
            [code],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert or update the profile stored under `code`
    pub fn upsert(conn: &Connection, code: &str, profile: &BiometricProfile) -> DbResult<Self> {
        let (system, feet, inches, cm) = match profile.height {
            Height::Imperial { feet, inches } => ("imperial", Some(feet), Some(inches), None),
            Height::Metric { cm } => ("metric", None, None, Some(cm)),
        };

        conn.execute(
            r#"
            INSERT INTO user_profiles (
                user_code, age, sex, height_system, height_feet, height_inches, height_cm,
                weight, weight_unit, activity_level
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(user_code) DO UPDATE SET
                age = excluded.age,
                sex = excluded.sex,
                height_system = excluded.height_system,
                height_feet = excluded.height_feet,
                height_inches = excluded.height_inches,
                height_cm = excluded.height_cm,
                weight = excluded.weight,
                weight_unit = excluded.weight_unit,
                activity_level = excluded.activity_level,
                updated_at = datetime('now')
            "#,
            params![
                code,
                profile.age,
                profile.sex.as_str(),
                system,
                feet,
                inches,
                cm,
                profile.weight.value(),
                profile.weight.unit_str(),
                profile.activity.factor(),
            ],
        )?;

        Self::get_by_code(conn, code)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}
