//! Energy expenditure calculations
//!
//! BMR via Mifflin-St Jeor, TDEE via activity multiplier, then a fixed
//! per-goal offset. Inputs are assumed validated (see `ProfileInput`);
//! nothing here checks ranges.

use serde::{Deserialize, Serialize};

use crate::models::{BiometricProfile, Goal, Sex};

/// Mifflin-St Jeor sex constant for men
pub const MALE_BMR_OFFSET: f64 = 5.0;
/// Mifflin-St Jeor sex constant for women
pub const FEMALE_BMR_OFFSET: f64 = -161.0;

/// Daily energy figures, all in whole kcal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyResult {
    pub bmr: i64,
    pub tdee: i64,
    pub target_calories: i64,
}

/// Round half away from zero to whole kcal
fn round_kcal(value: f64) -> i64 {
    value.round() as i64
}

/// BMR = 10·kg + 6.25·cm − 5·age + sex offset, rounded
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> i64 {
    let offset = match sex {
        Sex::Male => MALE_BMR_OFFSET,
        Sex::Female => FEMALE_BMR_OFFSET,
    };
    round_kcal(10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + offset)
}

/// TDEE = round(BMR × activity factor)
pub fn calculate_tdee(bmr: i64, activity_factor: f64) -> i64 {
    round_kcal(bmr as f64 * activity_factor)
}

/// Goal-adjusted daily calorie target
pub fn calculate_target_calories(tdee: i64, goal: Goal) -> i64 {
    tdee + goal.calorie_offset()
}

/// Target for a raw goal label; unrecognized labels get the maintenance target
pub fn target_calories_for_label(tdee: i64, goal: &str) -> i64 {
    match goal.parse::<Goal>() {
        Ok(goal) => calculate_target_calories(tdee, goal),
        Err(_) => calculate_target_calories(tdee, Goal::Maintenance),
    }
}

/// Full energy computation for a profile and goal
pub fn compute_energy(profile: &BiometricProfile, goal: Goal) -> EnergyResult {
    let bmr = calculate_bmr(
        profile.weight.to_kg(),
        profile.height.to_cm(),
        profile.age,
        profile.sex,
    );
    let tdee = calculate_tdee(bmr, profile.activity.factor());

    EnergyResult {
        bmr,
        tdee,
        target_calories: calculate_target_calories(tdee, goal),
    }
}
