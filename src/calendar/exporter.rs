//! Calendar export
//!
//! Turns a daily plan into an iCalendar document: one VEVENT per meal,
//! each with a display alarm before it starts.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Local, NaiveDateTime};
use chrono_tz::Tz;
use serde::Serialize;

use crate::models::DailyPlan;

use super::ics::{format_datetime, IcsWriter};

/// MIME type of the exported document
pub const MIME_TYPE: &str = "text/calendar";
/// Suggested file name for downloads
pub const FILE_NAME: &str = "fitness-meal-plan.ics";

pub const PRODUCT_ID: &str = "-//Fitness Meal Planner//EN";
pub const CALENDAR_NAME: &str = "Fitness Meal Plan";
pub const DEFAULT_LOCATION: &str = "Home";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Length of each meal event
pub const EVENT_DURATION_MINUTES: i64 = 30;
/// How long before the meal the alarm fires
pub const REMINDER_MINUTES: i64 = 30;

const UID_DOMAIN: &str = "fitness-meal-planner";

/// Exports made by this process; keeps UIDs distinct when the clock repeats
static EXPORT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A serialized calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDocument {
    pub content: String,
    pub event_count: usize,
}

impl CalendarDocument {
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    pub fn file_name(&self) -> &'static str {
        FILE_NAME
    }

    /// Write the document to `path`, replacing any existing file
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.as_bytes())
    }
}

/// Serializes daily plans as iCalendar text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarExporter {
    timezone: String,
    location: String,
}

impl CalendarExporter {
    /// Names that are not IANA zones fall back to UTC
    pub fn new(timezone: impl Into<String>) -> Self {
        let timezone = timezone.into();
        Self {
            timezone: resolve_timezone(Some(timezone), None, None),
            location: DEFAULT_LOCATION.to_string(),
        }
    }

    /// Exporter using the local timezone: `FMP_TIMEZONE`, `TZ`, then the host zone
    pub fn from_env() -> Self {
        let system = match iana_time_zone::get_timezone() {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::debug!(error = %e, "could not read host timezone");
                None
            }
        };
        Self::new(resolve_timezone(
            std::env::var("FMP_TIMEZONE").ok(),
            std::env::var("TZ").ok(),
            system,
        ))
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Export stamped with the current local time
    pub fn export(&self, plan: &DailyPlan) -> CalendarDocument {
        self.export_at(plan, Local::now().naive_local())
    }

    /// Export stamped with `generated_at` (DTSTAMP and UID source)
    pub fn export_at(&self, plan: &DailyPlan, generated_at: NaiveDateTime) -> CalendarDocument {
        let export_no = EXPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let stamp_millis = generated_at.and_utc().timestamp_millis();
        let dtstamp = format_datetime(generated_at);

        let mut ics = IcsWriter::new();
        ics.begin("VCALENDAR")
            .property("VERSION", "2.0")
            .property("PRODID", PRODUCT_ID)
            .property("CALSCALE", "GREGORIAN")
            .property("METHOD", "PUBLISH")
            .text("X-WR-CALNAME", CALENDAR_NAME)
            .text("X-WR-TIMEZONE", &self.timezone);

        let entries = plan.entries_in_slot_order();
        for (index, entry) in entries.iter().enumerate() {
            let start = entry.scheduled_time;
            let end = start + Duration::minutes(EVENT_DURATION_MINUTES);
            let uid = format!(
                "{}-{}-{}-{}@{}",
                entry.slot, stamp_millis, export_no, index, UID_DOMAIN
            );
            let description = format!(
                "{}\n\nIngredients:\n{}",
                entry.slot.label(),
                entry.meal.ingredients.join("\n")
            );

            ics.begin("VEVENT")
                .property("UID", &uid)
                .property("DTSTAMP", &dtstamp)
                .property("DTSTART", &format_datetime(start))
                .property("DTEND", &format_datetime(end))
                .text("SUMMARY", &entry.meal.name)
                .text("DESCRIPTION", &description)
                .text("LOCATION", &self.location)
                .property("STATUS", "CONFIRMED")
                .begin("VALARM")
                .property("TRIGGER", &format!("-PT{}M", REMINDER_MINUTES))
                .property("ACTION", "DISPLAY")
                .text("DESCRIPTION", &format!("Meal Reminder - {}", entry.meal.name))
                .end("VALARM")
                .end("VEVENT");
        }

        ics.end("VCALENDAR");

        tracing::debug!(
            events = entries.len(),
            date = %plan.reference_date,
            "exported meal plan calendar"
        );

        CalendarDocument {
            content: ics.finish(),
            event_count: entries.len(),
        }
    }
}

impl Default for CalendarExporter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

/// Pick the calendar timezone: explicit setting, then `TZ`, then the host
/// zone, then UTC. Candidates that are not IANA zone names are skipped.
pub fn resolve_timezone(
    configured: Option<String>,
    tz: Option<String>,
    system: Option<String>,
) -> String {
    [configured, tz, system]
        .into_iter()
        .flatten()
        .find_map(|candidate| parse_timezone(&candidate))
        .map(|zone| zone.name().to_string())
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
}

/// An IANA "Area/Location" zone or UTC. POSIX rules (`EST5EDT`) and file
/// paths (`:/etc/localtime`) are rejected.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    let name = name.trim().trim_start_matches(':');
    let zone: Tz = name.parse().ok()?;
    (zone.name() == DEFAULT_TIMEZONE || zone.name().contains('/')).then_some(zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ics::{unescape_text, unfold};
    use crate::models::{BudgetTier, Goal, Meal, MealSlot, PlanEntry};
    use crate::planner::select_plan;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(21, 15, 42)
            .unwrap()
    }

    fn export(plan: &DailyPlan) -> String {
        CalendarExporter::new("America/Chicago")
            .export_at(plan, generated_at())
            .content
    }

    /// Values of every (unfolded) line starting with `name:`
    fn values<'a>(content: &'a str, name: &str) -> Vec<&'a str> {
        let prefix = format!("{}:", name);
        content
            .split("\r\n")
            .filter_map(|line| line.strip_prefix(prefix.as_str()))
            .collect()
    }

    #[test]
    fn test_three_events_with_alarms() {
        let plan = select_plan(Goal::WeightLoss, BudgetTier::Low, date()).unwrap();
        let doc = CalendarExporter::new("UTC").export_at(&plan, generated_at());
        let content = unfold(&doc.content);

        assert_eq!(doc.event_count, 3);
        assert_eq!(values(&content, "BEGIN").iter().filter(|v| **v == "VEVENT").count(), 3);
        assert_eq!(values(&content, "BEGIN").iter().filter(|v| **v == "VALARM").count(), 3);
        assert_eq!(values(&content, "END").iter().filter(|v| **v == "VALARM").count(), 3);
        assert_eq!(values(&content, "TRIGGER"), vec!["-PT30M"; 3]);
        assert_eq!(values(&content, "ACTION"), vec!["DISPLAY"; 3]);
        assert_eq!(values(&content, "STATUS"), vec!["CONFIRMED"; 3]);
        assert_eq!(values(&content, "LOCATION"), vec!["Home"; 3]);
    }

    #[test]
    fn test_header_and_footer() {
        let content = export(&DailyPlan::empty(date()));
        assert_eq!(
            content,
            "BEGIN:VCALENDAR\r\n\
             VERSION:2.0\r\n\
             PRODID:-//Fitness Meal Planner//EN\r\n\
             CALSCALE:GREGORIAN\r\n\
             METHOD:PUBLISH\r\n\
             X-WR-CALNAME:Fitness Meal Plan\r\n\
             X-WR-TIMEZONE:America/Chicago\r\n\
             END:VCALENDAR\r\n"
        );
    }

    #[test]
    fn test_empty_plan_has_no_events() {
        let doc = CalendarExporter::default().export(&DailyPlan::empty(date()));
        assert_eq!(doc.event_count, 0);
        assert!(!doc.content.contains("VEVENT"));
        assert!(doc.content.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(doc.content.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_event_times() {
        let plan = select_plan(Goal::Endurance, BudgetTier::Medium, date()).unwrap();
        let content = unfold(&export(&plan));

        let starts = values(&content, "DTSTART");
        let ends = values(&content, "DTEND");
        assert_eq!(starts, vec!["20261020T080000", "20261020T123000", "20261020T183000"]);
        assert_eq!(ends, vec!["20261020T083000", "20261020T130000", "20261020T190000"]);

        for (start, end) in starts.iter().zip(&ends) {
            let start = NaiveDateTime::parse_from_str(start, "%Y%m%dT%H%M%S").unwrap();
            let end = NaiveDateTime::parse_from_str(end, "%Y%m%dT%H%M%S").unwrap();
            assert_eq!(end - start, Duration::minutes(30));
        }

        assert_eq!(values(&content, "DTSTAMP"), vec!["20261019T211542"; 3]);
    }

    #[test]
    fn test_uids_are_distinct() {
        let plan = select_plan(Goal::Maintenance, BudgetTier::High, date()).unwrap();
        // Same timestamp for both exports: the clock did not advance
        let first = unfold(&export(&plan));
        let second = unfold(&export(&plan));

        let mut uids: Vec<&str> = values(&first, "UID");
        assert_eq!(uids.len(), 3);
        assert!(uids[0].starts_with("breakfast-"));
        assert!(uids[1].starts_with("lunch-"));
        assert!(uids[2].starts_with("dinner-"));
        assert!(uids.iter().all(|u| u.ends_with("@fitness-meal-planner")));

        uids.extend(values(&second, "UID"));
        let unique: HashSet<&str> = uids.iter().copied().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_description_lists_ingredients() {
        let plan = select_plan(Goal::WeightLoss, BudgetTier::Low, date()).unwrap();
        let content = unfold(&export(&plan));

        let descriptions = values(&content, "DESCRIPTION");
        assert_eq!(
            descriptions[0],
            "Breakfast\\n\\nIngredients:\\n1/2 cup oats\\n1/2 cup mixed berries\\n1 tsp honey"
        );
        assert_eq!(descriptions[1], "Meal Reminder - Oatmeal with Berries");
        assert_eq!(
            unescape_text(descriptions[2]),
            "Lunch\n\nIngredients:\n4oz grilled chicken breast\nMixed greens\nCherry tomatoes\nBalsamic vinegar"
        );
    }

    #[test]
    fn test_reserved_characters_round_trip() {
        let name = "Mac, Cheese; \\Deluxe\\";
        let meal = Meal::new(name, 800, 30, 90, 35, 4.25, &["Macaroni, elbow", "Cheddar; sharp"]);
        let plan = DailyPlan::new(
            date(),
            vec![PlanEntry {
                slot: MealSlot::Dinner,
                meal,
                scheduled_time: date().and_time(MealSlot::Dinner.scheduled_time()),
            }],
        );
        let content = unfold(&export(&plan));

        let summary = values(&content, "SUMMARY")[0];
        assert_eq!(summary, "Mac\\, Cheese\\; \\\\Deluxe\\\\");
        assert_eq!(unescape_text(summary), name);

        let description = unescape_text(values(&content, "DESCRIPTION")[0]);
        assert_eq!(
            description,
            "Dinner\n\nIngredients:\nMacaroni, elbow\nCheddar; sharp"
        );
        assert_eq!(
            unescape_text(values(&content, "DESCRIPTION")[1]),
            format!("Meal Reminder - {}", name)
        );
    }

    #[test]
    fn test_crlf_and_line_length() {
        let plan = select_plan(Goal::Endurance, BudgetTier::High, date()).unwrap();
        let content = export(&plan);

        assert!(content.ends_with("\r\n"));
        assert!(!content.replace("\r\n", "").contains('\n'));
        for line in content.split("\r\n") {
            assert!(line.len() <= 75, "line too long: {:?}", line);
        }
    }

    #[test]
    fn test_events_follow_slot_order() {
        let mut plan = select_plan(Goal::MuscleGain, BudgetTier::Low, date()).unwrap();
        plan.entries.reverse();
        let content = unfold(&export(&plan));
        assert_eq!(
            values(&content, "SUMMARY"),
            vec!["Eggs & Whole Wheat Toast", "Chicken Rice Bowl", "Ground Beef Pasta"]
        );
    }

    #[test]
    fn test_resolve_timezone() {
        assert_eq!(
            resolve_timezone(Some("Europe/Berlin".into()), Some("UTC".into()), None),
            "Europe/Berlin"
        );
        assert_eq!(
            resolve_timezone(None, Some(":America/New_York".into()), None),
            "America/New_York"
        );
        assert_eq!(resolve_timezone(Some("  ".into()), None, None), "UTC");
        assert_eq!(resolve_timezone(None, None, None), "UTC");
    }

    #[test]
    fn test_host_zone_used_when_unconfigured() {
        assert_eq!(
            resolve_timezone(None, None, Some("America/Chicago".into())),
            "America/Chicago"
        );
        assert_eq!(
            resolve_timezone(None, Some(":/etc/localtime".into()), Some("Asia/Tokyo".into())),
            "Asia/Tokyo"
        );
    }

    #[test]
    fn test_non_iana_timezone_never_reaches_header() {
        for bad in ["EST5EDT", ":/etc/localtime", "Mars/Olympus", "CST6CDT", "not a zone"] {
            assert!(parse_timezone(bad).is_none(), "{}", bad);
            assert_eq!(resolve_timezone(Some(bad.into()), Some(bad.into()), None), "UTC");

            let plan = select_plan(Goal::Endurance, BudgetTier::Low, date()).unwrap();
            let content = CalendarExporter::new(bad).export_at(&plan, generated_at()).content;
            assert!(content.contains("X-WR-TIMEZONE:UTC\r\n"), "{}", bad);
            assert!(!content.contains(bad.trim_start_matches(':')));
        }
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        let plan = select_plan(Goal::Maintenance, BudgetTier::Medium, date()).unwrap();
        let doc = CalendarExporter::default().export(&plan);

        doc.write_to(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), doc.as_bytes());
        assert_eq!(doc.mime_type(), "text/calendar");
        assert_eq!(doc.file_name(), "fitness-meal-plan.ics");
    }
}
