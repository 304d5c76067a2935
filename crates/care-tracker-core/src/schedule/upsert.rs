//! Log upsert resolver.
//!
//! Decides how a logging action maps onto storage: at most one log per
//! `(medication, scheduled_time, date)` slot, while as-needed doses always
//! append. The decision is returned as a [`LogMutation`] for the storage
//! adapter to execute.

use chrono::{DateTime, NaiveDate, Utc};

use super::reconciler::find_slot_log;
use crate::models::{parse_slot_time, LogStatus, MedicationLog, SlotKey, ValidationError};

/// A logging action from the patient or caregiver.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRequest {
    pub medication_id: String,
    pub status: LogStatus,
    /// Slot being satisfied, `None` for an as-needed dose
    pub scheduled_time: Option<String>,
    /// Acting user
    pub logged_by: String,
    pub notes: Option<String>,
}

impl LogRequest {
    pub fn scheduled(
        medication_id: impl Into<String>,
        status: LogStatus,
        scheduled_time: impl Into<String>,
        logged_by: impl Into<String>,
    ) -> Self {
        Self {
            medication_id: medication_id.into(),
            status,
            scheduled_time: Some(scheduled_time.into()),
            logged_by: logged_by.into(),
            notes: None,
        }
    }

    pub fn as_needed(medication_id: impl Into<String>, logged_by: impl Into<String>) -> Self {
        Self {
            medication_id: medication_id.into(),
            status: LogStatus::Taken,
            scheduled_time: None,
            logged_by: logged_by.into(),
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.medication_id.trim().is_empty() {
            return Err(ValidationError::BlankField("medication_id"));
        }
        if self.logged_by.trim().is_empty() {
            return Err(ValidationError::BlankField("logged_by"));
        }
        if let Some(time) = &self.scheduled_time {
            if parse_slot_time(time).is_none() {
                return Err(ValidationError::InvalidTime(time.clone()));
            }
        }
        Ok(())
    }
}

/// Storage change decided by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum LogMutation {
    /// New row. For slotted logs the adapter executes this as an atomic
    /// insert-on-conflict-update keyed on the slot, so a concurrent duplicate
    /// converges to one row.
    Insert(MedicationLog),
    /// Overwrite the mutable fields of an existing slot log, keeping its id.
    Update {
        id: String,
        status: LogStatus,
        logged_by: String,
        logged_at: DateTime<Utc>,
    },
    /// Remove a log entirely (undo).
    Delete { id: String },
}

impl LogMutation {
    /// Id of the row this mutation targets or creates.
    pub fn log_id(&self) -> &str {
        match self {
            LogMutation::Insert(log) => &log.id,
            LogMutation::Update { id, .. } | LogMutation::Delete { id } => id,
        }
    }

    /// Slot protected by this mutation, if it creates a slotted row.
    pub fn slot_key(&self) -> Option<SlotKey> {
        match self {
            LogMutation::Insert(log) => log.slot_key(),
            _ => None,
        }
    }
}

/// Resolve a logging action against the logs already recorded for `today`.
///
/// Slotted requests update the existing slot log in place when one exists;
/// otherwise, and always for as-needed requests, a new row is inserted with
/// `log_date = today`.
pub fn resolve_log(
    request: LogRequest,
    todays_logs: &[MedicationLog],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<LogMutation, ValidationError> {
    request.validate()?;

    if let Some(time) = request.scheduled_time.as_deref() {
        let existing = find_slot_log(todays_logs, &request.medication_id, time)
            .filter(|log| log.log_date == today);
        if let Some(existing) = existing {
            return Ok(LogMutation::Update {
                id: existing.id.clone(),
                status: request.status,
                logged_by: request.logged_by,
                logged_at: now,
            });
        }
    }

    Ok(LogMutation::Insert(MedicationLog {
        id: uuid::Uuid::new_v4().to_string(),
        medication_id: request.medication_id,
        scheduled_time: request.scheduled_time,
        status: request.status,
        logged_by: request.logged_by,
        logged_at: now,
        log_date: today,
        notes: request.notes,
    }))
}

/// Undo is an unconditional delete; the obligation reverts to pending.
pub fn resolve_undo(log_id: impl Into<String>) -> LogMutation {
    LogMutation::Delete { id: log_id.into() }
}

/// Apply a mutation to an in-memory log list, mirroring what storage does.
///
/// Returns the id of the affected row, or `None` when an update or delete
/// targeted a row that does not exist.
pub fn apply_mutation(logs: &mut Vec<MedicationLog>, mutation: LogMutation) -> Option<String> {
    match mutation {
        LogMutation::Insert(log) => {
            if let Some(key) = log.slot_key() {
                let slot = logs.iter_mut().find(|existing| {
                    existing.occupies(&key.medication_id, &key.scheduled_time, key.log_date)
                });
                if let Some(existing) = slot {
                    existing.status = log.status;
                    existing.logged_by = log.logged_by;
                    existing.logged_at = log.logged_at;
                    return Some(existing.id.clone());
                }
            }
            let id = log.id.clone();
            logs.push(log);
            Some(id)
        }
        LogMutation::Update {
            id,
            status,
            logged_by,
            logged_at,
        } => {
            let existing = logs.iter_mut().find(|log| log.id == id)?;
            existing.status = status;
            existing.logged_by = logged_by;
            existing.logged_at = logged_at;
            Some(id)
        }
        LogMutation::Delete { id } => {
            let before = logs.len();
            logs.retain(|log| log.id != id);
            (logs.len() < before).then_some(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, 8, 5, 0).unwrap()
    }

    fn record(logs: &mut Vec<MedicationLog>, request: LogRequest, at: DateTime<Utc>) -> String {
        let mutation = resolve_log(request, logs, today(), at).unwrap();
        apply_mutation(logs, mutation).unwrap()
    }

    #[test]
    fn test_relog_same_slot_updates_in_place() {
        let mut logs = Vec::new();
        let first = record(
            &mut logs,
            LogRequest::scheduled("med-1", LogStatus::Skipped, "08:00", "harris"),
            now(),
        );
        let later = now() + Duration::minutes(30);
        let second = record(
            &mut logs,
            LogRequest::scheduled("med-1", LogStatus::Taken, "08:00", "kent"),
            later,
        );

        assert_eq!(first, second);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Taken);
        assert_eq!(logs[0].logged_by, "kent");
        assert_eq!(logs[0].logged_at, later);
    }

    #[test]
    fn test_update_targets_existing_id() {
        let mut logs = Vec::new();
        let id = record(
            &mut logs,
            LogRequest::scheduled("med-1", LogStatus::Taken, "08:00", "harris"),
            now(),
        );
        let mutation = resolve_log(
            LogRequest::scheduled("med-1", LogStatus::Skipped, "08:00", "harris"),
            &logs,
            today(),
            now(),
        )
        .unwrap();
        assert!(matches!(mutation, LogMutation::Update { .. }));
        assert_eq!(mutation.log_id(), id);
    }

    #[test]
    fn test_slots_are_isolated() {
        let mut logs = Vec::new();
        record(
            &mut logs,
            LogRequest::scheduled("med-1", LogStatus::Taken, "08:00", "harris"),
            now(),
        );
        record(
            &mut logs,
            LogRequest::scheduled("med-1", LogStatus::Skipped, "20:00", "harris"),
            now(),
        );
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].status, LogStatus::Taken);
    }

    #[test]
    fn test_prn_always_appends() {
        let mut logs = Vec::new();
        let ids: Vec<_> = (0..3)
            .map(|i| {
                record(
                    &mut logs,
                    LogRequest::as_needed("med-prn", "harris"),
                    now() + Duration::hours(i),
                )
            })
            .collect();
        assert_eq!(logs.len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn test_yesterdays_slot_not_reused() {
        let mut logs = Vec::new();
        record(
            &mut logs,
            LogRequest::scheduled("med-1", LogStatus::Taken, "08:00", "harris"),
            now(),
        );
        logs[0].log_date = today().pred_opt().unwrap();

        let mutation = resolve_log(
            LogRequest::scheduled("med-1", LogStatus::Taken, "08:00", "harris"),
            &logs,
            today(),
            now(),
        )
        .unwrap();
        assert!(matches!(mutation, LogMutation::Insert(_)));
    }

    #[test]
    fn test_invalid_slot_time_rejected() {
        let result = resolve_log(
            LogRequest::scheduled("med-1", LogStatus::Taken, "8am", "harris"),
            &[],
            today(),
            now(),
        );
        assert_eq!(result, Err(ValidationError::InvalidTime("8am".into())));
    }

    #[test]
    fn test_undo_removes_row() {
        let mut logs = Vec::new();
        let id = record(
            &mut logs,
            LogRequest::scheduled("med-1", LogStatus::Taken, "08:00", "harris"),
            now(),
        );
        assert_eq!(apply_mutation(&mut logs, resolve_undo(&id)), Some(id.clone()));
        assert!(logs.is_empty());
        // Second undo is a no-op
        assert_eq!(apply_mutation(&mut logs, resolve_undo(id)), None);
    }

    #[test]
    fn test_racing_inserts_converge() {
        let mut logs = Vec::new();
        // Both callers resolved before either write landed
        let a = resolve_log(
            LogRequest::scheduled("med-1", LogStatus::Taken, "08:00", "harris"),
            &logs,
            today(),
            now(),
        )
        .unwrap();
        let b = resolve_log(
            LogRequest::scheduled("med-1", LogStatus::Skipped, "08:00", "kent"),
            &logs,
            today(),
            now() + Duration::seconds(1),
        )
        .unwrap();

        let first = apply_mutation(&mut logs, a).unwrap();
        let second = apply_mutation(&mut logs, b).unwrap();
        assert_eq!(first, second);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].logged_by, "kent");
    }
}
