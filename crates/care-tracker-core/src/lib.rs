//! Care Tracker Core Library
//!
//! Local-first medication scheduling and adherence engine for home care.
//!
//! # Architecture
//!
//! ```text
//!                 Weekly Schedule (per medication)
//!                               │
//!                               ▼
//!                      Daily Expansion ── clock.today_weekday()
//!                               │
//!             ┌─────────────────┼──────────────────┐
//!             │                 │                  │
//!             ▼                 ▼                  ▼
//!       Reconciliation    Upsert Resolution   Interval Gate
//!        (read path)        (write path)      (PRN, advisory)
//!             │                 │                  │
//!             ▼                 ▼                  ▼
//!       Today Dashboard   INSERT .. ON CONFLICT   Countdown
//!                         (slot unique index)
//! ```
//!
//! # Core Principle
//!
//! **One log per dose slot.** A slot is `(medication, scheduled_time, date)`;
//! re-logging updates it in place and concurrent writers converge on one row.
//! As-needed doses have no slot and always append.
//!
//! # Modules
//!
//! - [`config`]: Configuration file and `tracing` setup
//! - [`db`]: SQLite storage adapter and change log
//! - [`models`]: Domain types (Medication, MedicationLog, CareTask, etc.)
//! - [`schedule`]: Pure scheduling core (expander, reconciler, resolver, gate)
//! - [`tracker`]: Service coordinating storage, clock and the core

pub mod config;
pub mod db;
pub mod models;
pub mod schedule;
pub mod tracker;

// Re-export commonly used types
pub use config::CoreConfig;
pub use db::Database;
pub use models::{
    ActivityCategory, CareActivity, CareTask, CheckinLevels, CheckinPeriod, DoctorContact,
    FeelingCheckin, FieldUpdate, LogStatus, Medication, MedicationLog, MedicationUpdate,
    ScheduleEntry, TaskBoard, ValidationError,
};
pub use schedule::{Clock, FixedClock, GateState, LogRequest, SystemClock};
pub use tracker::{PrnCard, TodaySummary, Tracker, TrackerError, TrackerResult};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CareTrackerError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for CareTrackerError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => CareTrackerError::NotFound(what),
            other => CareTrackerError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ValidationError> for CareTrackerError {
    fn from(e: ValidationError) -> Self {
        CareTrackerError::InvalidInput(e.to_string())
    }
}

impl From<TrackerError> for CareTrackerError {
    fn from(e: TrackerError) -> Self {
        match e {
            TrackerError::Validation(e) => e.into(),
            TrackerError::Database(e) => e.into(),
            not_found @ TrackerError::NotFound { .. } => {
                CareTrackerError::NotFound(not_found.to_string())
            }
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for CareTrackerError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CareTrackerError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<CareTrackerCore>, CareTrackerError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(CareTrackerCore::new(
        db,
        Arc::new(SystemClock),
        tracker::DEFAULT_COMPLETED_PREVIEW,
    )))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<CareTrackerCore>, CareTrackerError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(CareTrackerCore::new(
        db,
        Arc::new(SystemClock),
        tracker::DEFAULT_COMPLETED_PREVIEW,
    )))
}

/// Load a JSON config file, start logging and open its database.
#[uniffi::export]
pub fn open_with_config(config_path: String) -> Result<Arc<CareTrackerCore>, CareTrackerError> {
    let config = CoreConfig::load(&config_path)
        .map_err(|e| CareTrackerError::ConfigError(format!("{:#}", e)))?;
    config::init_tracing(&config.log_filter);
    let db = Database::open(&config.database_path)?;
    Ok(Arc::new(CareTrackerCore::new(
        db,
        Arc::new(SystemClock),
        config.completed_task_preview,
    )))
}

/// Install the log subscriber. `RUST_LOG` takes precedence over `filter`.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) {
    let filter = filter.unwrap_or_else(config::default_log_filter);
    config::init_tracing(&filter);
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe tracker wrapper for FFI.
#[derive(uniffi::Object)]
pub struct CareTrackerCore {
    db: Arc<Mutex<Database>>,
    clock: Arc<dyn Clock>,
    completed_task_preview: usize,
}

impl CareTrackerCore {
    /// Build over an existing database and clock.
    pub fn new(db: Database, clock: Arc<dyn Clock>, completed_task_preview: usize) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            clock,
            completed_task_preview,
        }
    }

    fn with_tracker<T>(
        &self,
        op: impl FnOnce(&Tracker<'_>) -> TrackerResult<T>,
    ) -> Result<T, CareTrackerError> {
        let db = self.db.lock()?;
        let tracker = Tracker::new(&db, self.clock.as_ref())
            .with_completed_task_preview(self.completed_task_preview);
        Ok(op(&tracker)?)
    }
}

#[uniffi::export]
impl CareTrackerCore {
    // =========================================================================
    // Medication Operations
    // =========================================================================

    /// Create a medication.
    pub fn create_medication(
        &self,
        input: FfiMedicationInput,
    ) -> Result<FfiMedication, CareTrackerError> {
        let medication = Medication::from(input);
        let created = self.with_tracker(|t| t.create_medication(medication))?;
        Ok(created.into())
    }

    /// Apply a partial update.
    pub fn update_medication(
        &self,
        id: String,
        update: FfiMedicationUpdate,
    ) -> Result<FfiMedication, CareTrackerError> {
        let update = MedicationUpdate::from(update);
        let updated = self.with_tracker(|t| t.update_medication(&id, update))?;
        Ok(updated.into())
    }

    /// Delete a medication. Returns false when it did not exist.
    pub fn delete_medication(&self, id: String) -> Result<bool, CareTrackerError> {
        self.with_tracker(|t| t.delete_medication(&id))
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, id: String) -> Result<Option<FfiMedication>, CareTrackerError> {
        let medication = self.with_tracker(|t| t.medication(&id))?;
        Ok(medication.map(|m| m.into()))
    }

    /// List all medications.
    pub fn list_medications(&self) -> Result<Vec<FfiMedication>, CareTrackerError> {
        let medications = self.with_tracker(|t| t.medications())?;
        Ok(medications.into_iter().map(|m| m.into()).collect())
    }

    // =========================================================================
    // Log Operations
    // =========================================================================

    /// Log a dose. `scheduled_time` is `None` for as-needed doses.
    pub fn record_log(
        &self,
        medication_id: String,
        status: String,
        scheduled_time: Option<String>,
        logged_by: String,
    ) -> Result<String, CareTrackerError> {
        let status: LogStatus = status.parse()?;
        self.with_tracker(|t| {
            t.log_dose(&medication_id, status, scheduled_time.as_deref(), &logged_by)
        })
    }

    /// Remove a log. A missing id is not an error.
    pub fn undo_log(&self, log_id: String) -> Result<bool, CareTrackerError> {
        self.with_tracker(|t| t.undo_log(&log_id))
    }

    /// Every log recorded today.
    pub fn todays_logs(&self) -> Result<Vec<FfiMedicationLog>, CareTrackerError> {
        let logs = self.with_tracker(|t| t.todays_logs())?;
        Ok(logs.into_iter().map(|l| l.into()).collect())
    }

    // =========================================================================
    // Dashboard Operations
    // =========================================================================

    /// Today's reconciled schedule, as-needed cards and rollups.
    pub fn today(&self) -> Result<FfiTodaySummary, CareTrackerError> {
        let summary = self.with_tracker(|t| t.today())?;
        Ok(summary.into())
    }

    /// Interval gate for one as-needed medication.
    pub fn prn_status(&self, medication_id: String) -> Result<FfiPrnCard, CareTrackerError> {
        let card = self.with_tracker(|t| t.prn_status(&medication_id))?;
        Ok(card.into())
    }

    // =========================================================================
    // Check-in Operations
    // =========================================================================

    /// Submit a check-in for the current period of the day.
    pub fn submit_checkin(
        &self,
        user_id: String,
        pain_level: u8,
        mood_level: u8,
        energy_level: u8,
        notes: Option<String>,
    ) -> Result<FfiCheckin, CareTrackerError> {
        let levels = CheckinLevels {
            pain: pain_level,
            mood: mood_level,
            energy: energy_level,
        };
        let checkin = self.with_tracker(|t| t.submit_checkin(&user_id, levels, notes))?;
        Ok(checkin.into())
    }

    /// Period a check-in submitted now would fall in.
    pub fn current_checkin_period(&self) -> Result<String, CareTrackerError> {
        let period = self.with_tracker(|t| Ok(t.current_checkin_period()))?;
        Ok(period.as_str().to_string())
    }

    /// A user's check-ins for today.
    pub fn todays_checkins(&self, user_id: String) -> Result<Vec<FfiCheckin>, CareTrackerError> {
        let checkins = self.with_tracker(|t| t.todays_checkins(&user_id))?;
        Ok(checkins.into_iter().map(|c| c.into()).collect())
    }

    // =========================================================================
    // Task Operations
    // =========================================================================

    /// Create a task.
    pub fn create_task(
        &self,
        title: String,
        description: Option<String>,
        assigned_to: String,
        assigned_by: String,
    ) -> Result<FfiCareTask, CareTrackerError> {
        let task =
            self.with_tracker(|t| t.create_task(&title, description, &assigned_to, &assigned_by))?;
        Ok(task.into())
    }

    /// Mark a task completed.
    pub fn complete_task(&self, id: String) -> Result<FfiCareTask, CareTrackerError> {
        let task = self.with_tracker(|t| t.complete_task(&id))?;
        Ok(task.into())
    }

    /// Pending tasks and the most recently completed ones.
    pub fn task_board(&self) -> Result<FfiTaskBoard, CareTrackerError> {
        let board = self.with_tracker(|t| t.task_board())?;
        Ok(board.into())
    }

    // =========================================================================
    // Care Activity Operations
    // =========================================================================

    /// Log a care activity.
    pub fn log_care_activity(
        &self,
        category: String,
        description: String,
        logged_by: String,
        notes: Option<String>,
    ) -> Result<FfiCareActivity, CareTrackerError> {
        let category: ActivityCategory = category.parse()?;
        let activity =
            self.with_tracker(|t| t.log_care_activity(category, &description, &logged_by, notes))?;
        Ok(activity.into())
    }

    /// Activities logged today.
    pub fn activities_today(&self) -> Result<Vec<FfiCareActivity>, CareTrackerError> {
        let activities = self.with_tracker(|t| t.activities_today())?;
        Ok(activities.into_iter().map(|a| a.into()).collect())
    }

    // =========================================================================
    // Doctor Contacts
    // =========================================================================

    /// Add a doctor contact. A blank specialty is stored as null.
    pub fn add_doctor_contact(
        &self,
        name: String,
        phone: String,
        specialty: Option<String>,
        is_emergency: bool,
        created_by: String,
    ) -> Result<FfiDoctorContact, CareTrackerError> {
        let contact = self.with_tracker(|t| {
            t.add_doctor_contact(&name, &phone, specialty, is_emergency, &created_by)
        })?;
        Ok(contact.into())
    }

    /// All contacts, emergency first.
    pub fn doctor_contacts(&self) -> Result<Vec<FfiDoctorContact>, CareTrackerError> {
        let contacts = self.with_tracker(|t| t.doctor_contacts())?;
        Ok(contacts.into_iter().map(|c| c.into()).collect())
    }

    pub fn remove_doctor_contact(&self, id: String) -> Result<bool, CareTrackerError> {
        self.with_tracker(|t| t.remove_doctor_contact(&id))
    }

    // =========================================================================
    // Change Feed
    // =========================================================================

    /// Changes recorded after `after_seq`, oldest first.
    pub fn changes_since(
        &self,
        after_seq: i64,
        limit: u32,
    ) -> Result<Vec<FfiChangeRecord>, CareTrackerError> {
        let changes = self.with_tracker(|t| t.changes_since(after_seq, limit as usize))?;
        Ok(changes.into_iter().map(|c| c.into()).collect())
    }

    /// Latest changes, newest first.
    pub fn recent_changes(&self, limit: u32) -> Result<Vec<FfiChangeRecord>, CareTrackerError> {
        let changes = self.with_tracker(|t| t.recent_changes(limit as usize))?;
        Ok(changes.into_iter().map(|c| c.into()).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

fn date(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// FFI-safe schedule entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScheduleEntry {
    pub weekday: u8,
    pub time: String,
}

impl From<ScheduleEntry> for FfiScheduleEntry {
    fn from(entry: ScheduleEntry) -> Self {
        Self {
            weekday: entry.weekday,
            time: entry.time,
        }
    }
}

impl From<FfiScheduleEntry> for ScheduleEntry {
    fn from(entry: FfiScheduleEntry) -> Self {
        ScheduleEntry::new(entry.weekday, entry.time)
    }
}

/// FFI-safe medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: String,
    pub name: String,
    pub dosage: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub is_prn: bool,
    pub schedule: Vec<FfiScheduleEntry>,
    pub min_hours_between: Option<f64>,
    pub take_with_food: bool,
    pub interactions: Vec<String>,
    pub key_notes: Vec<String>,
    pub created_at: String,
}

impl From<Medication> for FfiMedication {
    fn from(med: Medication) -> Self {
        Self {
            id: med.id,
            name: med.name,
            dosage: med.dosage,
            purpose: med.purpose,
            notes: med.notes,
            is_prn: med.is_prn,
            schedule: med.schedule.into_iter().map(|e| e.into()).collect(),
            min_hours_between: med.min_hours_between,
            take_with_food: med.take_with_food,
            interactions: med.interactions,
            key_notes: med.key_notes,
            created_at: timestamp(med.created_at),
        }
    }
}

/// FFI-safe input for a new medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationInput {
    pub name: String,
    pub dosage: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub is_prn: bool,
    pub schedule: Vec<FfiScheduleEntry>,
    pub min_hours_between: Option<f64>,
    pub take_with_food: bool,
    pub interactions: Vec<String>,
    pub key_notes: Vec<String>,
}

impl From<FfiMedicationInput> for Medication {
    fn from(input: FfiMedicationInput) -> Self {
        Medication {
            dosage: input.dosage,
            purpose: input.purpose,
            notes: input.notes,
            is_prn: input.is_prn,
            min_hours_between: input.min_hours_between,
            take_with_food: input.take_with_food,
            interactions: input.interactions,
            key_notes: input.key_notes,
            ..Medication::scheduled(
                input.name,
                input.schedule.into_iter().map(|e| e.into()).collect(),
            )
        }
    }
}

/// FFI-safe partial medication update.
///
/// `None` leaves a field unchanged. Blank text clears an optional text field;
/// `clear_min_hours_between` removes the dose interval.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiMedicationUpdate {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub is_prn: Option<bool>,
    pub schedule: Option<Vec<FfiScheduleEntry>>,
    pub min_hours_between: Option<f64>,
    pub clear_min_hours_between: bool,
    pub take_with_food: Option<bool>,
    pub interactions: Option<Vec<String>>,
    pub key_notes: Option<Vec<String>>,
}

impl From<FfiMedicationUpdate> for MedicationUpdate {
    fn from(update: FfiMedicationUpdate) -> Self {
        let min_hours_between = if update.clear_min_hours_between {
            FieldUpdate::Set(None)
        } else {
            update.min_hours_between.map(Some).into()
        };
        MedicationUpdate {
            name: update.name.into(),
            dosage: update.dosage.map(Some).into(),
            purpose: update.purpose.map(Some).into(),
            notes: update.notes.map(Some).into(),
            is_prn: update.is_prn.into(),
            schedule: update
                .schedule
                .map(|entries| entries.into_iter().map(|e| e.into()).collect())
                .into(),
            min_hours_between,
            take_with_food: update.take_with_food.into(),
            interactions: update.interactions.into(),
            key_notes: update.key_notes.into(),
        }
    }
}

/// FFI-safe medication log.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationLog {
    pub id: String,
    pub medication_id: String,
    pub scheduled_time: Option<String>,
    pub status: String,
    pub logged_by: String,
    pub logged_at: String,
    pub log_date: String,
    pub notes: Option<String>,
}

impl From<MedicationLog> for FfiMedicationLog {
    fn from(log: MedicationLog) -> Self {
        Self {
            id: log.id,
            medication_id: log.medication_id,
            scheduled_time: log.scheduled_time,
            status: log.status.to_string(),
            logged_by: log.logged_by,
            logged_at: timestamp(log.logged_at),
            log_date: date(log.log_date),
            notes: log.notes,
        }
    }
}

/// FFI-safe scheduled dose.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoseCard {
    pub medication_id: String,
    pub name: String,
    pub dosage: Option<String>,
    pub take_with_food: bool,
    pub scheduled_time: String,
    /// "pending", "taken" or "skipped"
    pub state: String,
    pub log_id: Option<String>,
    pub logged_by: Option<String>,
    pub logged_at: Option<String>,
}

impl From<tracker::DoseCard> for FfiDoseCard {
    fn from(dose: tracker::DoseCard) -> Self {
        let state = match dose.state {
            schedule::AdherenceState::Pending => "pending",
            schedule::AdherenceState::Taken => "taken",
            schedule::AdherenceState::Skipped => "skipped",
        };
        Self {
            medication_id: dose.medication_id,
            name: dose.name,
            dosage: dose.dosage,
            take_with_food: dose.take_with_food,
            scheduled_time: dose.scheduled_time,
            state: state.to_string(),
            log_id: dose.log_id,
            logged_by: dose.logged_by,
            logged_at: dose.logged_at.map(timestamp),
        }
    }
}

/// FFI-safe time slot row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSlotCard {
    pub time: String,
    pub label: String,
    /// "past", "current" or "upcoming"
    pub timing: Option<String>,
    pub doses: Vec<FfiDoseCard>,
}

impl From<tracker::SlotCard> for FfiSlotCard {
    fn from(slot: tracker::SlotCard) -> Self {
        let timing = slot.timing.map(|timing| {
            match timing {
                schedule::SlotTiming::Past => "past",
                schedule::SlotTiming::Current => "current",
                schedule::SlotTiming::Upcoming => "upcoming",
            }
            .to_string()
        });
        Self {
            time: slot.time,
            label: slot.label,
            timing,
            doses: slot.doses.into_iter().map(|d| d.into()).collect(),
        }
    }
}

/// FFI-safe as-needed medication card.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrnCard {
    pub medication_id: String,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub min_hours_between: Option<f64>,
    pub doses_today: Vec<String>,
    pub last_taken_at: Option<String>,
    pub ready: bool,
    pub next_allowed_at: Option<String>,
    pub remaining_seconds: Option<i64>,
    pub progress_fraction: Option<f64>,
    pub countdown: Option<String>,
}

impl From<PrnCard> for FfiPrnCard {
    fn from(card: PrnCard) -> Self {
        let (ready, next_allowed_at, remaining_seconds, progress_fraction) = match card.gate {
            GateState::Ready => (true, None, None, None),
            GateState::CoolingDown {
                next_allowed_at,
                remaining,
                progress_fraction,
            } => (
                false,
                Some(timestamp(next_allowed_at)),
                Some(remaining.num_seconds()),
                Some(progress_fraction),
            ),
        };
        Self {
            medication_id: card.medication_id,
            name: card.name,
            dosage: card.dosage,
            min_hours_between: card.min_hours_between,
            doses_today: card.doses_today.into_iter().map(timestamp).collect(),
            last_taken_at: card.last_taken_at.map(timestamp),
            ready,
            next_allowed_at,
            remaining_seconds,
            progress_fraction,
            countdown: card.countdown,
        }
    }
}

/// FFI-safe daily dashboard.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTodaySummary {
    pub date: String,
    pub weekday: u8,
    pub slots: Vec<FfiSlotCard>,
    pub prn: Vec<FfiPrnCard>,
    pub total_scheduled: u32,
    pub completed_count: u32,
    pub pending_count: u32,
    pub progress_fraction: f64,
    pub all_done: bool,
    pub orphaned_logs: u32,
}

impl From<TodaySummary> for FfiTodaySummary {
    fn from(summary: TodaySummary) -> Self {
        Self {
            date: date(summary.date),
            weekday: summary.weekday,
            slots: summary.slots.into_iter().map(|s| s.into()).collect(),
            prn: summary.prn.into_iter().map(|p| p.into()).collect(),
            total_scheduled: summary.total_scheduled as u32,
            completed_count: summary.completed_count as u32,
            pending_count: summary.pending_count as u32,
            progress_fraction: summary.progress_fraction,
            all_done: summary.all_done,
            orphaned_logs: summary.orphaned_logs as u32,
        }
    }
}

/// FFI-safe feeling check-in.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCheckin {
    pub id: String,
    pub user_id: String,
    pub period: String,
    pub pain_level: u8,
    pub mood_level: u8,
    pub energy_level: u8,
    pub notes: Option<String>,
    pub checkin_date: String,
}

impl From<FeelingCheckin> for FfiCheckin {
    fn from(checkin: FeelingCheckin) -> Self {
        Self {
            id: checkin.id,
            user_id: checkin.user_id,
            period: checkin.period.as_str().to_string(),
            pain_level: checkin.levels.pain,
            mood_level: checkin.levels.mood,
            energy_level: checkin.levels.energy,
            notes: checkin.notes,
            checkin_date: date(checkin.checkin_date),
        }
    }
}

/// FFI-safe care task.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCareTask {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: String,
    pub assigned_by: String,
    pub status: String,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl From<CareTask> for FfiCareTask {
    fn from(task: CareTask) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            assigned_to: task.assigned_to,
            assigned_by: task.assigned_by,
            status: task.status.as_str().to_string(),
            created_at: timestamp(task.created_at),
            completed_at: task.completed_at.map(timestamp),
        }
    }
}

/// FFI-safe task board.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTaskBoard {
    pub pending: Vec<FfiCareTask>,
    pub recently_completed: Vec<FfiCareTask>,
    pub completed_count: u32,
}

impl From<TaskBoard> for FfiTaskBoard {
    fn from(board: TaskBoard) -> Self {
        Self {
            pending: board.pending.into_iter().map(|t| t.into()).collect(),
            recently_completed: board
                .recently_completed
                .into_iter()
                .map(|t| t.into())
                .collect(),
            completed_count: board.completed_count as u32,
        }
    }
}

/// FFI-safe care activity.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCareActivity {
    pub id: String,
    pub category: String,
    pub category_label: String,
    pub description: String,
    pub logged_by: String,
    pub notes: Option<String>,
    pub activity_time: String,
}

impl From<CareActivity> for FfiCareActivity {
    fn from(activity: CareActivity) -> Self {
        Self {
            id: activity.id,
            category: activity.category.as_str().to_string(),
            category_label: activity.category.label().to_string(),
            description: activity.description,
            logged_by: activity.logged_by,
            notes: activity.notes,
            activity_time: timestamp(activity.activity_time),
        }
    }
}

/// FFI-safe doctor contact.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoctorContact {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub specialty: Option<String>,
    pub is_emergency: bool,
    /// `tel:` link for the dialer
    pub dial_uri: String,
    pub created_by: String,
    pub created_at: String,
}

impl From<DoctorContact> for FfiDoctorContact {
    fn from(contact: DoctorContact) -> Self {
        Self {
            dial_uri: contact.dial_uri(),
            id: contact.id,
            name: contact.name,
            phone: contact.phone,
            specialty: contact.specialty,
            is_emergency: contact.is_emergency,
            created_by: contact.created_by,
            created_at: timestamp(contact.created_at),
        }
    }
}

/// FFI-safe change log record. `payload` is a JSON object string.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChangeRecord {
    pub seq: i64,
    pub table_name: String,
    pub record_id: String,
    pub action: String,
    pub changed_by: Option<String>,
    pub changed_at: String,
    pub payload: Option<String>,
}

impl From<db::ChangeRecord> for FfiChangeRecord {
    fn from(change: db::ChangeRecord) -> Self {
        Self {
            seq: change.seq,
            table_name: change.table_name,
            record_id: change.record_id,
            action: change.action,
            changed_by: change.changed_by,
            changed_at: change.changed_at,
            payload: change.payload.map(|p| p.to_string()),
        }
    }
}
