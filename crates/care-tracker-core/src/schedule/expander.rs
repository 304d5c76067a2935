//! Daily obligation expander.
//!
//! Turns weekly schedules into the dose obligations due on one weekday,
//! grouped by time of day so a view can render one row per time.

use std::collections::BTreeMap;

use crate::models::Medication;

/// One dose due today.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseObligation<'a> {
    pub medication: &'a Medication,
    pub time: &'a str,
}

/// Every medication due at one time of day.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlot<'a> {
    pub time: &'a str,
    pub medications: Vec<&'a Medication>,
}

/// How a medication's schedule relates to a given weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleCoverage {
    /// PRN medication, never expanded
    AsNeeded,
    /// Scheduled medication with no entries at all
    NoSchedule,
    /// Has entries, none on this weekday
    NotToday,
    /// Number of distinct times due on this weekday
    Today(usize),
}

/// Expansion of all medications for one weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPlan<'a> {
    pub weekday: u8,
    /// Distinct times in chronological order
    pub slots: Vec<TimeSlot<'a>>,
    /// PRN medications, in input order
    pub as_needed: Vec<&'a Medication>,
    /// Scheduled medications with nothing due on this weekday
    pub idle: Vec<(&'a Medication, ScheduleCoverage)>,
}

impl<'a> DailyPlan<'a> {
    /// Flatten slots into individual obligations.
    pub fn obligations(&self) -> impl Iterator<Item = DoseObligation<'a>> + '_ {
        self.slots.iter().flat_map(|slot| {
            slot.medications.iter().map(move |&medication| DoseObligation {
                medication,
                time: slot.time,
            })
        })
    }

    pub fn total_obligations(&self) -> usize {
        self.slots.iter().map(|slot| slot.medications.len()).sum()
    }

    pub fn times(&self) -> Vec<&'a str> {
        self.slots.iter().map(|slot| slot.time).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Classify a medication's schedule for `weekday`.
pub fn coverage(medication: &Medication, weekday: u8) -> ScheduleCoverage {
    if medication.is_prn {
        return ScheduleCoverage::AsNeeded;
    }
    if !medication.has_schedule() {
        return ScheduleCoverage::NoSchedule;
    }
    let mut times: Vec<&str> = medication
        .entries_for_weekday(weekday)
        .map(|entry| entry.time.as_str())
        .collect();
    times.sort_unstable();
    times.dedup();
    match times.len() {
        0 => ScheduleCoverage::NotToday,
        n => ScheduleCoverage::Today(n),
    }
}

/// Expand scheduled medications into time slots for `weekday`.
///
/// Duplicate `(weekday, time)` entries collapse, malformed entries are skipped,
/// and PRN medications never produce obligations.
pub fn expand_day(medications: &[Medication], weekday: u8) -> DailyPlan<'_> {
    let mut by_time: BTreeMap<&str, Vec<&Medication>> = BTreeMap::new();
    let mut as_needed = Vec::new();
    let mut idle = Vec::new();

    for medication in medications {
        match coverage(medication, weekday) {
            ScheduleCoverage::AsNeeded => as_needed.push(medication),
            ScheduleCoverage::Today(_) => {
                for entry in medication.entries_for_weekday(weekday) {
                    let due = by_time.entry(entry.time.as_str()).or_default();
                    if !due.iter().any(|m| m.id == medication.id) {
                        due.push(medication);
                    }
                }
            }
            other => idle.push((medication, other)),
        }
    }

    DailyPlan {
        weekday,
        slots: by_time
            .into_iter()
            .map(|(time, medications)| TimeSlot { time, medications })
            .collect(),
        as_needed,
        idle,
    }
}
