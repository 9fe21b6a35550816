//! Meal planning core
//!
//! Catalog lookup, plan selection and time-of-day handling.

pub mod catalog;
pub mod error;
pub mod schedule;
pub mod selector;

pub use catalog::{MealCatalog, MealSet};
pub use error::{PlanError, PlanResult};
pub use schedule::{format_time_of_day, parse_time_of_day};
pub use selector::{select_plan, PlanSelector};
