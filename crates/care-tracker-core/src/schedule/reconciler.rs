//! Adherence reconciler.
//!
//! Joins today's obligations with today's logs on `(medication_id, scheduled_time)`
//! and computes the rollups shown on the daily view. Logs that reference a
//! deleted medication are kept and rendered without medication fields.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::expander::DailyPlan;
use crate::models::{LogStatus, Medication, MedicationLog};

/// State of one obligation after reconciliation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdherenceState {
    Pending,
    Taken,
    Skipped,
}

impl From<LogStatus> for AdherenceState {
    fn from(status: LogStatus) -> Self {
        match status {
            LogStatus::Taken => AdherenceState::Taken,
            LogStatus::Skipped => AdherenceState::Skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledDose<'a> {
    pub medication: &'a Medication,
    pub time: &'a str,
    pub log: Option<&'a MedicationLog>,
    pub state: AdherenceState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledSlot<'a> {
    pub time: &'a str,
    pub doses: Vec<ReconciledDose<'a>>,
}

/// As-needed doses logged today for one medication, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PrnDoses<'a> {
    pub medication_id: &'a str,
    /// `None` when the medication has been deleted
    pub medication: Option<&'a Medication>,
    pub doses: Vec<&'a MedicationLog>,
}

/// A log joined with its medication, if that still exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogEntry<'a> {
    pub log: &'a MedicationLog,
    pub medication: Option<&'a Medication>,
}

impl<'a> LogEntry<'a> {
    pub fn medication_name(&self) -> Option<&'a str> {
        self.medication.map(|m| m.name.as_str())
    }

    pub fn dosage(&self) -> Option<&'a str> {
        self.medication.and_then(|m| m.dosage.as_deref())
    }

    pub fn is_orphaned(&self) -> bool {
        self.medication.is_none()
    }
}

/// Reconciled view of one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAdherence<'a> {
    pub slots: Vec<ReconciledSlot<'a>>,
    pub prn: Vec<PrnDoses<'a>>,
    /// Every supplied log, ordered by `logged_at`
    pub entries: Vec<LogEntry<'a>>,
    /// Number of obligations due today
    pub total_scheduled: usize,
    /// Number of slotted logs today, including slots no longer on the schedule
    pub completed_count: usize,
}

impl<'a> DailyAdherence<'a> {
    pub fn all_done(&self) -> bool {
        self.total_scheduled > 0 && self.completed_count >= self.total_scheduled
    }

    /// Fraction of obligations logged, clamped to 0..=1.
    pub fn progress_fraction(&self) -> f64 {
        if self.total_scheduled == 0 {
            return 0.0;
        }
        (self.completed_count as f64 / self.total_scheduled as f64).clamp(0.0, 1.0)
    }

    pub fn pending_count(&self) -> usize {
        self.doses()
            .filter(|dose| dose.state == AdherenceState::Pending)
            .count()
    }

    pub fn doses(&self) -> impl Iterator<Item = &ReconciledDose<'a>> {
        self.slots.iter().flat_map(|slot| slot.doses.iter())
    }

    pub fn orphaned_entries(&self) -> impl Iterator<Item = &LogEntry<'a>> {
        self.entries.iter().filter(|entry| entry.is_orphaned())
    }
}

/// Find the log for a slot. Under a race two rows may exist; the latest write wins.
pub fn find_slot_log<'a>(
    logs: &'a [MedicationLog],
    medication_id: &str,
    scheduled_time: &str,
) -> Option<&'a MedicationLog> {
    logs.iter()
        .filter(|log| {
            log.medication_id == medication_id
                && log.scheduled_time.as_deref() == Some(scheduled_time)
        })
        .max_by_key(|log| log.logged_at)
}

/// Reconcile a day's plan against the logs recorded for that day.
///
/// `medications` is the full list the plan was expanded from and is used to
/// resolve medication details for PRN groups and log entries.
pub fn reconcile<'a>(
    plan: &DailyPlan<'a>,
    medications: &'a [Medication],
    logs: &'a [MedicationLog],
) -> DailyAdherence<'a> {
    let by_id: HashMap<&str, &Medication> =
        medications.iter().map(|m| (m.id.as_str(), m)).collect();

    let slots: Vec<ReconciledSlot<'a>> = plan
        .slots
        .iter()
        .map(|slot| ReconciledSlot {
            time: slot.time,
            doses: slot
                .medications
                .iter()
                .map(|&medication| {
                    let log = find_slot_log(logs, &medication.id, slot.time);
                    ReconciledDose {
                        medication,
                        time: slot.time,
                        log,
                        state: log.map_or(AdherenceState::Pending, |l| l.status.into()),
                    }
                })
                .collect(),
        })
        .collect();

    let mut sorted: Vec<&MedicationLog> = logs.iter().collect();
    sorted.sort_by_key(|log| log.logged_at);

    let mut prn: Vec<PrnDoses<'a>> = plan
        .as_needed
        .iter()
        .map(|&medication| PrnDoses {
            medication_id: medication.id.as_str(),
            medication: Some(medication),
            doses: Vec::new(),
        })
        .collect();
    for &log in sorted.iter().filter(|log| log.is_prn()) {
        match prn.iter_mut().find(|group| group.medication_id == log.medication_id) {
            Some(group) => group.doses.push(log),
            None => prn.push(PrnDoses {
                medication_id: log.medication_id.as_str(),
                medication: by_id.get(log.medication_id.as_str()).copied(),
                doses: vec![log],
            }),
        }
    }

    let entries: Vec<LogEntry<'a>> = sorted
        .iter()
        .map(|&log| LogEntry {
            log,
            medication: by_id.get(log.medication_id.as_str()).copied(),
        })
        .collect();

    let orphaned = entries.iter().filter(|e| e.is_orphaned()).count();
    if orphaned > 0 {
        tracing::debug!(orphaned, "Logs reference medications that no longer exist");
    }

    DailyAdherence {
        slots,
        prn,
        entries,
        total_scheduled: plan.total_obligations(),
        completed_count: logs.iter().filter(|log| !log.is_prn()).count(),
    }
}
