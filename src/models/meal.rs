//! Meal model
//!
//! Catalog meals and the three fixed daily slots.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::planner::PlanError;

/// Daily meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    /// Slots in serving order
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }

    /// Capitalized name ("Breakfast")
    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }

    /// Fixed wall-clock time the slot is scheduled at
    pub fn scheduled_time(&self) -> NaiveTime {
        let (hour, minute) = match self {
            MealSlot::Breakfast => (8, 0),
            MealSlot::Lunch => (12, 30),
            MealSlot::Dinner => (18, 30),
        };
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            _ => Err(PlanError::contract(format!("unknown meal slot '{}'", s))),
        }
    }
}

/// A catalog meal with macros and estimated cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
    pub cost_usd: f64,
    pub ingredients: Vec<String>,
}

impl Meal {
    pub fn new(
        name: &str,
        calories: u32,
        protein_g: u32,
        carbs_g: u32,
        fat_g: u32,
        cost_usd: f64,
        ingredients: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            calories,
            protein_g,
            carbs_g,
            fat_g,
            cost_usd,
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Cost formatted to cents, e.g. "$4.50"
    pub fn cost_display(&self) -> String {
        format!("${:.2}", self.cost_usd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_times() {
        assert_eq!(MealSlot::Breakfast.scheduled_time(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(MealSlot::Lunch.scheduled_time(), NaiveTime::from_hms_opt(12, 30, 0).unwrap());
        assert_eq!(MealSlot::Dinner.scheduled_time(), NaiveTime::from_hms_opt(18, 30, 0).unwrap());
    }

    #[test]
    fn test_slot_order_and_labels() {
        let mut slots = vec![MealSlot::Dinner, MealSlot::Breakfast, MealSlot::Lunch];
        slots.sort();
        assert_eq!(slots, MealSlot::ALL.to_vec());
        assert_eq!(MealSlot::Lunch.label(), "Lunch");
        assert_eq!("DINNER".parse::<MealSlot>(), Ok(MealSlot::Dinner));
        assert!("snack".parse::<MealSlot>().is_err());
    }

    #[test]
    fn test_cost_display() {
        let meal = Meal::new("Toast", 200, 5, 30, 4, 2.5, &["Bread"]);
        assert_eq!(meal.cost_display(), "$2.50");
        assert_eq!(meal.ingredients, vec!["Bread".to_string()]);
    }
}
