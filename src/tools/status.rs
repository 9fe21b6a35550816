//! FMP Status Tool
//!
//! Runtime status of the service and the usage guide served to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Planning workflow instructions for AI assistants
pub const PLANNER_INSTRUCTIONS: &str = r#"
# Fitness Meal Planner Instructions

This guide explains how to build a one-day meal plan with the FMP tools.

## Workflow

1. Collect the user's profile: age, sex, height, weight and activity level.
2. Call `calculate_energy` with the profile and a goal to get BMR, TDEE and
   target calories.
3. Call `generate_meal_plan` with the profile, goal and daily food budget.
4. Optionally `save_profile` so the user can come back with a 6-digit code,
   then `save_meal_plan` to keep the plan.
5. Call `export_calendar` to write an `.ics` file with one event per meal.

---

## Profile Fields

| Field | Values |
|-------|--------|
| `age` | whole years, 1-120 |
| `sex` | `male` or `female` |
| `height_feet` + `height_inches` | imperial height, inches 0-11.x |
| `height_cm` | metric height (use instead of feet/inches) |
| `weight` + `weight_unit` | `lb` (default) or `kg` |
| `activity_level` | 1.2, 1.375, 1.55, 1.725 or 1.9 |

### Activity Levels

| Factor | Level |
|--------|-------|
| 1.2 | Sedentary (little or no exercise) |
| 1.375 | Lightly active (1-3 days/week) |
| 1.55 | Moderately active (3-5 days/week) |
| 1.725 | Very active (6-7 days/week) |
| 1.9 | Extra active (physical job or twice-daily training) |

---

## Goals

| Goal | Calories vs TDEE |
|------|------------------|
| `weight-loss` | -500 |
| `muscle-gain` | +400 |
| `maintenance` | 0 |
| `endurance` | +250 |

Unknown goals are rejected; ask the user to pick one of the four.

---

## Budget Tiers

The daily budget (USD) picks the tier:

- **low**: under $18
- **medium**: $18 up to $30
- **high**: $30 and above

`classify_budget` shows which tier an amount falls in.

---

## Meal Times

Breakfast 8:00 AM, lunch 12:30 PM, dinner 6:30 PM. Each calendar event lasts
30 minutes and carries a reminder 30 minutes before it starts.

---

## Dates

Dates are ISO `YYYY-MM-DD`. Without a date, plans are scheduled for tomorrow.

---

## Saved Data

- `save_profile` without `user_code` creates a new code; with one it updates.
- `load_profile` returns the stored profile for a code.
- `save_meal_plan` needs an existing profile for the code.
- `list_meal_plans` returns the newest plans first.
- `export_calendar` accepts either `plan_id` or `goal` + `budget`.
"#;

/// Runtime status of the FMP service
#[derive(Debug, Clone, Serialize)]
pub struct FmpStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub export_dir: String,
    pub timezone: String,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information for `fmp_status`
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    export_dir: PathBuf,
    timezone: String,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, export_dir: PathBuf, timezone: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            export_dir,
            timezone: timezone.into(),
        }
    }

    pub fn get_status(&self) -> FmpStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FmpStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            export_dir: self.export_dir.display().to_string(),
            timezone: self.timezone.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
