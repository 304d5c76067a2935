//! Medication and weekly schedule models.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{optional_text, require_text, ValidationError};

/// Highest valid weekday index (Saturday). Sunday is 0.
pub const MAX_WEEKDAY: u8 = 6;

/// Longest accepted spacing between as-needed doses: one week.
pub const MAX_MIN_HOURS_BETWEEN: f64 = 24.0 * 7.0;

/// One recurring dose: a weekday and a 24-hour `HH:MM` time of day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ScheduleEntry {
    /// 0 = Sunday through 6 = Saturday
    pub weekday: u8,
    /// Zero-padded 24-hour time, e.g. "08:00"
    pub time: String,
}

impl ScheduleEntry {
    pub fn new(weekday: u8, time: impl Into<String>) -> Self {
        Self {
            weekday,
            time: time.into(),
        }
    }

    /// Check weekday range and time format.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.weekday > MAX_WEEKDAY {
            return Err(ValidationError::InvalidWeekday(self.weekday));
        }
        if parse_slot_time(&self.time).is_none() {
            return Err(ValidationError::InvalidTime(self.time.clone()));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Parse a strict zero-padded `HH:MM` string.
///
/// `"8:00"`, `"08:00:00"` and `"24:00"` are all rejected.
pub fn parse_slot_time(time: &str) -> Option<NaiveTime> {
    let bytes = time.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = |hi: u8, lo: u8| u32::from(hi - b'0') * 10 + u32::from(lo - b'0');
    NaiveTime::from_hms_opt(value(digits[0], digits[1]), value(digits[2], digits[3]), 0)
}

/// A medication, either on a fixed weekly schedule or taken as needed (PRN).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    /// Unique ID (UUID v4)
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text dosage, e.g. "5/325mg"
    pub dosage: Option<String>,
    /// Why it is taken
    pub purpose: Option<String>,
    pub notes: Option<String>,
    /// As-needed medication; schedule must be empty
    pub is_prn: bool,
    /// Weekly recurrence (scheduled medications only)
    pub schedule: Vec<ScheduleEntry>,
    /// Minimum spacing between PRN doses, in hours
    pub min_hours_between: Option<f64>,
    /// Display-only hint
    pub take_with_food: bool,
    /// Known interaction warnings (display only)
    pub interactions: Vec<String>,
    /// Short care notes (display only)
    pub key_notes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Medication {
    /// Create a scheduled medication.
    pub fn scheduled(name: impl Into<String>, schedule: Vec<ScheduleEntry>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            dosage: None,
            purpose: None,
            notes: None,
            is_prn: false,
            schedule,
            min_hours_between: None,
            take_with_food: false,
            interactions: Vec::new(),
            key_notes: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create an as-needed medication with optional dose spacing.
    pub fn as_needed(name: impl Into<String>, min_hours_between: Option<f64>) -> Self {
        Self {
            is_prn: true,
            min_hours_between,
            ..Self::scheduled(name, Vec::new())
        }
    }

    /// Validate the whole record. Called before every insert or update.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        for entry in &self.schedule {
            entry.validate()?;
        }
        if self.is_prn && !self.schedule.is_empty() {
            return Err(ValidationError::PrnWithSchedule);
        }
        if let Some(hours) = self.min_hours_between {
            if !(hours.is_finite() && hours > 0.0) {
                return Err(ValidationError::NonPositiveInterval(hours));
            }
            if hours > MAX_MIN_HOURS_BETWEEN {
                return Err(ValidationError::IntervalTooLong {
                    hours,
                    max: MAX_MIN_HOURS_BETWEEN,
                });
            }
            if !self.is_prn {
                return Err(ValidationError::IntervalWithoutPrn);
            }
        }
        Ok(())
    }

    /// Trim text fields and drop blank optionals.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.dosage = optional_text(self.dosage);
        self.purpose = optional_text(self.purpose);
        self.notes = optional_text(self.notes);
        self
    }

    /// Whether any schedule entry exists, regardless of weekday.
    pub fn has_schedule(&self) -> bool {
        !self.is_prn && !self.schedule.is_empty()
    }

    /// Valid entries falling on `weekday`. Malformed entries are skipped.
    pub fn entries_for_weekday(&self, weekday: u8) -> impl Iterator<Item = &ScheduleEntry> {
        self.schedule
            .iter()
            .filter(move |entry| entry.weekday == weekday && entry.is_valid())
    }
}
