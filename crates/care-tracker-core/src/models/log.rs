//! Medication log models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Outcome recorded for a dose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Taken,
    Skipped,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Taken => "taken",
            LogStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "taken" => Ok(LogStatus::Taken),
            "skipped" => Ok(LogStatus::Skipped),
            other => Err(ValidationError::UnknownVariant {
                kind: "log status",
                value: other.to_string(),
            }),
        }
    }
}

/// Identity of one expected dose: medication, slot time and calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub medication_id: String,
    pub scheduled_time: String,
    pub log_date: NaiveDate,
}

/// A recorded dose event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationLog {
    /// Unique log ID (UUID v4)
    pub id: String,
    /// Medication this log refers to; may no longer exist
    pub medication_id: String,
    /// Slot satisfied by this log, `None` for an as-needed dose
    pub scheduled_time: Option<String>,
    pub status: LogStatus,
    /// Acting user
    pub logged_by: String,
    /// When the action happened
    pub logged_at: DateTime<Utc>,
    /// Date of the obligation being satisfied
    pub log_date: NaiveDate,
    pub notes: Option<String>,
}

impl MedicationLog {
    pub fn is_prn(&self) -> bool {
        self.scheduled_time.is_none()
    }

    /// Slot identity, `None` for as-needed logs (those have no slot).
    pub fn slot_key(&self) -> Option<SlotKey> {
        self.scheduled_time.as_ref().map(|time| SlotKey {
            medication_id: self.medication_id.clone(),
            scheduled_time: time.clone(),
            log_date: self.log_date,
        })
    }

    /// Whether this log occupies the given slot.
    pub fn occupies(&self, medication_id: &str, scheduled_time: &str, log_date: NaiveDate) -> bool {
        self.medication_id == medication_id
            && self.scheduled_time.as_deref() == Some(scheduled_time)
            && self.log_date == log_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_log(scheduled_time: Option<&str>) -> MedicationLog {
        MedicationLog {
            id: "log-1".into(),
            medication_id: "med-1".into(),
            scheduled_time: scheduled_time.map(String::from),
            status: LogStatus::Taken,
            logged_by: "patient".into(),
            logged_at: Utc::now(),
            log_date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("taken".parse::<LogStatus>().unwrap(), LogStatus::Taken);
        assert_eq!(LogStatus::Skipped.to_string(), "skipped");
        assert!("undone".parse::<LogStatus>().is_err());
    }

    #[test]
    fn test_prn_log_has_no_slot() {
        let log = make_log(None);
        assert!(log.is_prn());
        assert!(log.slot_key().is_none());
    }

    #[test]
    fn test_occupies_exact_slot_only() {
        let log = make_log(Some("08:00"));
        let date = log.log_date;
        assert!(log.occupies("med-1", "08:00", date));
        assert!(!log.occupies("med-1", "20:00", date));
        assert!(!log.occupies("med-2", "08:00", date));
        assert!(!log.occupies("med-1", "08:00", date.succ_opt().unwrap()));
    }
}
