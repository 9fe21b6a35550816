//! Body measurement units and conversion constants
//!
//! Height and weight arrive either imperial or metric; the energy model
//! works in kilograms and centimeters.

use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Body height in one of the two supported unit systems
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "lowercase")]
pub enum Height {
    /// Feet plus inches (inches may be fractional)
    Imperial { feet: u32, inches: f64 },
    /// Centimeters
    Metric { cm: f64 },
}

impl Height {
    pub fn imperial(feet: u32, inches: f64) -> Self {
        Height::Imperial { feet, inches }
    }

    pub fn metric(cm: f64) -> Self {
        Height::Metric { cm }
    }

    /// Total height in inches
    pub fn total_inches(&self) -> f64 {
        match *self {
            Height::Imperial { feet, inches } => f64::from(feet) * INCHES_PER_FOOT + inches,
            Height::Metric { cm } => cm / CM_PER_INCH,
        }
    }

    /// Height in centimeters, unrounded
    pub fn to_cm(&self) -> f64 {
        match *self {
            Height::Imperial { .. } => self.total_inches() * CM_PER_INCH,
            Height::Metric { cm } => cm,
        }
    }

    /// Re-express as feet plus (fractional) inches
    pub fn to_imperial(&self) -> Self {
        match *self {
            Height::Imperial { .. } => *self,
            Height::Metric { .. } => {
                let total = self.total_inches();
                let feet = (total / INCHES_PER_FOOT).floor();
                Height::Imperial {
                    feet: feet as u32,
                    inches: total - feet * INCHES_PER_FOOT,
                }
            }
        }
    }

    /// Re-express in centimeters
    pub fn to_metric(&self) -> Self {
        Height::Metric { cm: self.to_cm() }
    }
}

/// Body weight in pounds or kilograms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum Weight {
    #[serde(rename = "lb")]
    Pounds(f64),
    #[serde(rename = "kg")]
    Kilograms(f64),
}

impl Weight {
    /// Weight in kilograms, unrounded
    pub fn to_kg(&self) -> f64 {
        match *self {
            Weight::Pounds(lb) => lb * KG_PER_LB,
            Weight::Kilograms(kg) => kg,
        }
    }

    /// Weight in pounds, unrounded
    pub fn to_lb(&self) -> f64 {
        match *self {
            Weight::Pounds(lb) => lb,
            Weight::Kilograms(kg) => kg / KG_PER_LB,
        }
    }

    /// Numeric value in the weight's own unit
    pub fn value(&self) -> f64 {
        match *self {
            Weight::Pounds(v) | Weight::Kilograms(v) => v,
        }
    }

    /// Unit label used in storage
    pub fn unit_str(&self) -> &'static str {
        match self {
            Weight::Pounds(_) => "lb",
            Weight::Kilograms(_) => "kg",
        }
    }

    /// Build from a stored value and unit label
    pub fn from_parts(value: f64, unit: &str) -> Option<Self> {
        match unit.trim().to_lowercase().as_str() {
            "lb" | "lbs" | "pound" | "pounds" => Some(Weight::Pounds(value)),
            "kg" | "kgs" | "kilogram" | "kilograms" => Some(Weight::Kilograms(value)),
            _ => None,
        }
    }
}
