//! Energy model
//!
//! Unit conversions and BMR/TDEE/target calorie calculations.

pub mod energy;
pub mod units;

pub use energy::{
    calculate_bmr, calculate_target_calories, calculate_tdee, compute_energy,
    target_calories_for_label, EnergyResult,
};
pub use units::{Height, Weight, CM_PER_INCH, KG_PER_LB};
