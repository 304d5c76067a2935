//! Owned view types for the daily dashboard.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::models::{Medication, MedicationLog};
use crate::schedule::{
    evaluate_gate, format_12h, slot_timing, AdherenceState, DailyAdherence, GateState,
    ReconciledDose, ReconciledSlot, SlotTiming,
};

/// One scheduled dose as shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DoseCard {
    pub medication_id: String,
    pub name: String,
    pub dosage: Option<String>,
    pub take_with_food: bool,
    pub scheduled_time: String,
    pub state: AdherenceState,
    /// Present once the dose is logged; needed for undo
    pub log_id: Option<String>,
    pub logged_by: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
}

impl From<&ReconciledDose<'_>> for DoseCard {
    fn from(dose: &ReconciledDose<'_>) -> Self {
        Self {
            medication_id: dose.medication.id.clone(),
            name: dose.medication.name.clone(),
            dosage: dose.medication.dosage.clone(),
            take_with_food: dose.medication.take_with_food,
            scheduled_time: dose.time.to_string(),
            state: dose.state,
            log_id: dose.log.map(|log| log.id.clone()),
            logged_by: dose.log.map(|log| log.logged_by.clone()),
            logged_at: dose.log.map(|log| log.logged_at),
        }
    }
}

/// A time-of-day row with every dose due at that time.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCard {
    pub time: String,
    /// 12-hour label, e.g. "8:00 PM"
    pub label: String,
    pub timing: Option<SlotTiming>,
    pub doses: Vec<DoseCard>,
}

impl SlotCard {
    fn build(slot: &ReconciledSlot<'_>, local_time: NaiveTime) -> Self {
        Self {
            time: slot.time.to_string(),
            label: format_12h(slot.time).unwrap_or_else(|| slot.time.to_string()),
            timing: slot_timing(slot.time, local_time),
            doses: slot.doses.iter().map(DoseCard::from).collect(),
        }
    }

    pub fn all_logged(&self) -> bool {
        self.doses
            .iter()
            .all(|dose| dose.state != AdherenceState::Pending)
    }
}

/// An as-needed medication with its doses today and interval gate.
#[derive(Debug, Clone, PartialEq)]
pub struct PrnCard {
    pub medication_id: String,
    /// Absent when the medication was deleted
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub min_hours_between: Option<f64>,
    /// Times of today's doses, oldest first
    pub doses_today: Vec<DateTime<Utc>>,
    pub last_taken_at: Option<DateTime<Utc>>,
    pub gate: GateState,
    /// Countdown text while cooling down
    pub countdown: Option<String>,
}

impl PrnCard {
    pub fn build(
        medication_id: &str,
        medication: Option<&Medication>,
        doses_today: &[&MedicationLog],
        last_taken_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let min_hours_between = medication.and_then(|m| m.min_hours_between);
        let gate = evaluate_gate(last_taken_at, min_hours_between, now);
        Self {
            medication_id: medication_id.to_string(),
            name: medication.map(|m| m.name.clone()),
            dosage: medication.and_then(|m| m.dosage.clone()),
            min_hours_between,
            doses_today: doses_today.iter().map(|log| log.logged_at).collect(),
            last_taken_at,
            countdown: gate.remaining_label(),
            gate,
        }
    }
}

/// Everything the "today" screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct TodaySummary {
    pub date: NaiveDate,
    pub weekday: u8,
    pub slots: Vec<SlotCard>,
    pub prn: Vec<PrnCard>,
    pub total_scheduled: usize,
    pub completed_count: usize,
    pub pending_count: usize,
    pub progress_fraction: f64,
    pub all_done: bool,
    /// Today's logs whose medication no longer exists
    pub orphaned_logs: usize,
}

impl TodaySummary {
    pub(crate) fn build(
        date: NaiveDate,
        weekday: u8,
        adherence: &DailyAdherence<'_>,
        local_time: NaiveTime,
        prn: Vec<PrnCard>,
    ) -> Self {
        Self {
            date,
            weekday,
            slots: adherence
                .slots
                .iter()
                .map(|slot| SlotCard::build(slot, local_time))
                .collect(),
            prn,
            total_scheduled: adherence.total_scheduled,
            completed_count: adherence.completed_count,
            pending_count: adherence.pending_count(),
            progress_fraction: adherence.progress_fraction(),
            all_done: adherence.all_done(),
            orphaned_logs: adherence.orphaned_entries().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.prn.is_empty()
    }
}
