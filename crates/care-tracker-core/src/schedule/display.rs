//! Time-of-day display helpers for slot rows.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::parse_slot_time;

/// Where a slot sits relative to the current local time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotTiming {
    Past,
    /// Same clock hour as now
    Current,
    Upcoming,
}

/// `"20:05"` → `"8:05 PM"`. `None` for malformed input.
pub fn format_12h(time: &str) -> Option<String> {
    let parsed = parse_slot_time(time)?;
    let (is_pm, hour) = parsed.hour12();
    Some(format!(
        "{}:{:02} {}",
        hour,
        parsed.minute(),
        if is_pm { "PM" } else { "AM" }
    ))
}

/// Classify a slot against `now`. The current hour wins over past.
pub fn slot_timing(time: &str, now: NaiveTime) -> Option<SlotTiming> {
    let slot = parse_slot_time(time)?;
    let timing = if slot.hour() == now.hour() {
        SlotTiming::Current
    } else if now >= slot {
        SlotTiming::Past
    } else {
        SlotTiming::Upcoming
    };
    Some(timing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_12h() {
        assert_eq!(format_12h("00:30").as_deref(), Some("12:30 AM"));
        assert_eq!(format_12h("08:00").as_deref(), Some("8:00 AM"));
        assert_eq!(format_12h("12:00").as_deref(), Some("12:00 PM"));
        assert_eq!(format_12h("20:05").as_deref(), Some("8:05 PM"));
        assert_eq!(format_12h("nope"), None);
    }

    #[test]
    fn test_slot_timing() {
        let now = NaiveTime::from_hms_opt(14, 20, 0).unwrap();
        assert_eq!(slot_timing("08:00", now), Some(SlotTiming::Past));
        assert_eq!(slot_timing("14:45", now), Some(SlotTiming::Current));
        assert_eq!(slot_timing("14:00", now), Some(SlotTiming::Current));
        assert_eq!(slot_timing("20:00", now), Some(SlotTiming::Upcoming));
        assert_eq!(slot_timing("bad", now), None);
    }
}
