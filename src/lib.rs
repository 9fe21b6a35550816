//! Fitness Meal Planner (FMP) Library
//!
//! Energy targets, goal-based meal selection, saved profiles and plans,
//! and iCalendar export.

pub mod build_info;
pub mod calendar;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod planner;
pub mod tools;
