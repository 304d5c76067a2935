//! PRN interval gate.
//!
//! Advisory only: a cooling-down state is a warning, never a block. The
//! upsert resolver does not consult it.

use chrono::{DateTime, Duration, Utc};

use crate::models::{LogStatus, MedicationLog, MAX_MIN_HOURS_BETWEEN};

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Readiness of an as-needed medication.
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Ready,
    CoolingDown {
        next_allowed_at: DateTime<Utc>,
        remaining: Duration,
        /// Elapsed share of the interval, 0..=1
        progress_fraction: f64,
    },
}

impl GateState {
    pub fn is_ready(&self) -> bool {
        matches!(self, GateState::Ready)
    }

    /// Countdown text, `None` when ready.
    pub fn remaining_label(&self) -> Option<String> {
        match self {
            GateState::Ready => None,
            GateState::CoolingDown { remaining, .. } => Some(format_remaining(*remaining)),
        }
    }
}

fn interval_from_hours(hours: f64) -> Option<Duration> {
    if !(hours.is_finite() && hours > 0.0 && hours <= MAX_MIN_HOURS_BETWEEN) {
        return None;
    }
    Some(Duration::milliseconds((hours * MS_PER_HOUR as f64).round() as i64))
}

/// Evaluate readiness at `now`.
///
/// No interval or no previous dose means ready. An interval that is not a
/// positive number of at most [`MAX_MIN_HOURS_BETWEEN`] hours is treated as
/// no interval.
pub fn evaluate_gate(
    last_taken_at: Option<DateTime<Utc>>,
    min_hours_between: Option<f64>,
    now: DateTime<Utc>,
) -> GateState {
    let (Some(last_taken_at), Some(hours)) = (last_taken_at, min_hours_between) else {
        return GateState::Ready;
    };
    let Some(interval) = interval_from_hours(hours) else {
        tracing::warn!(hours, "Ignoring invalid minimum dose interval");
        return GateState::Ready;
    };

    let Some(next_allowed_at) = last_taken_at.checked_add_signed(interval) else {
        tracing::warn!(hours, %last_taken_at, "Dose interval overflows the calendar");
        return GateState::Ready;
    };
    if now >= next_allowed_at {
        return GateState::Ready;
    }

    let elapsed = (now - last_taken_at).num_milliseconds() as f64;
    let total = interval.num_milliseconds() as f64;
    GateState::CoolingDown {
        next_allowed_at,
        remaining: next_allowed_at - now,
        progress_fraction: (elapsed / total).clamp(0.0, 1.0),
    }
}

/// Most recent `taken` dose of a medication across the supplied logs.
pub fn last_taken_at(logs: &[MedicationLog], medication_id: &str) -> Option<DateTime<Utc>> {
    logs.iter()
        .filter(|log| log.medication_id == medication_id && log.status == LogStatus::Taken)
        .map(|log| log.logged_at)
        .max()
}

/// Format a remaining duration as `"{h}h {m}m"` or `"{m}m"`.
///
/// Minutes round up, so any positive duration shows at least `"1m"`; a full
/// 60 minutes carries into the hour.
pub fn format_remaining(remaining: Duration) -> String {
    let ms = remaining.num_milliseconds().max(0);
    let mut hours = ms / MS_PER_HOUR;
    let mut minutes = (ms % MS_PER_HOUR + MS_PER_MINUTE - 1) / MS_PER_MINUTE;
    if minutes == 60 {
        hours += 1;
        minutes = 0;
    }
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
