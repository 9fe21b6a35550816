//! Calendar export
//!
//! iCalendar serialization of daily meal plans.

pub mod exporter;
pub mod ics;

pub use exporter::{
    parse_timezone, resolve_timezone, CalendarDocument, CalendarExporter, FILE_NAME, MIME_TYPE,
};
pub use ics::{escape_text, unescape_text};
