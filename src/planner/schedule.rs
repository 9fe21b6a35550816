//! Time-of-day parsing and display
//!
//! Stored plans keep slot times as display strings ("8:00 AM"); they are
//! turned back into clock times before a calendar export.

use chrono::{NaiveTime, Timelike};

use super::{PlanError, PlanResult};

/// Parse "H:MM AM", "H:MM PM" or 24-hour "HH:MM"
pub fn parse_time_of_day(s: &str) -> PlanResult<NaiveTime> {
    let format_err = || PlanError::Format(s.to_string());
    let trimmed = s.trim();
    let upper = trimmed.to_uppercase();

    let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim_end(), Some(true))
    } else {
        (upper.as_str(), None)
    };

    let (hours, minutes) = clock.split_once(':').ok_or_else(format_err)?;
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(format_err());
    }
    if !all_digits(hours) || !all_digits(minutes) {
        return Err(format_err());
    }
    let hour: u32 = hours.parse().map_err(|_| format_err())?;
    let minute: u32 = minutes.parse().map_err(|_| format_err())?;

    let hour24 = match meridiem {
        Some(is_pm) => {
            if !(1..=12).contains(&hour) {
                return Err(format_err());
            }
            match (hour, is_pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour24, minute, 0).ok_or_else(format_err)
}

/// Render a time as "8:00 AM" / "6:30 PM"
pub fn format_time_of_day(time: NaiveTime) -> String {
    let (is_pm, hour12) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour12,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_twelve_hour() {
        assert_eq!(parse_time_of_day("8:00 AM").unwrap(), hm(8, 0));
        assert_eq!(parse_time_of_day("12:30 PM").unwrap(), hm(12, 30));
        assert_eq!(parse_time_of_day("6:30 PM").unwrap(), hm(18, 30));
        assert_eq!(parse_time_of_day("12:15 AM").unwrap(), hm(0, 15));
        assert_eq!(parse_time_of_day("7:05pm").unwrap(), hm(19, 5));
    }

    #[test]
    fn test_parse_twenty_four_hour() {
        assert_eq!(parse_time_of_day("18:30").unwrap(), hm(18, 30));
        assert_eq!(parse_time_of_day("08:00").unwrap(), hm(8, 0));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let malformed = [
            "", "noon", "8 AM", "8:0 AM", "13:00 PM", "0:30 AM", "25:00", "12:61", "a:bc",
            "8:+5", "+8:00 AM", "+8:+5 PM", "008:00", "8:-1",
        ];
        for bad in malformed {
            assert_eq!(
                parse_time_of_day(bad),
                Err(PlanError::Format(bad.to_string())),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_format_round_trip() {
        for text in ["8:00 AM", "12:30 PM", "6:30 PM", "12:00 AM"] {
            let t = parse_time_of_day(text).unwrap();
            assert_eq!(format_time_of_day(t), text);
        }
    }
}
