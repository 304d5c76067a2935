//! Care tracker service.
//!
//! Coordinates storage, the injected clock and the pure scheduling core:
//! fetch → expand/reconcile/resolve → persist.

mod dashboard;

pub use dashboard::*;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::db::{ChangeRecord, Database, DbError};
use crate::models::{
    ActivityCategory, CareActivity, CareTask, CheckinLevels, CheckinPeriod, DoctorContact,
    FeelingCheckin, LogStatus, Medication, MedicationLog, MedicationUpdate, TaskBoard, ValidationError,
};
use crate::schedule::{
    expand_day, reconcile, resolve_log, resolve_undo, weekday_index, Clock, LogMutation,
    LogRequest,
};

/// Default number of completed tasks shown on the task board.
pub const DEFAULT_COMPLETED_PREVIEW: usize = 5;

/// Tracker errors.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Main entry point over a database and a clock.
pub struct Tracker<'a> {
    db: &'a Database,
    clock: &'a dyn Clock,
    completed_task_preview: usize,
}

impl<'a> Tracker<'a> {
    /// Create a new tracker.
    pub fn new(db: &'a Database, clock: &'a dyn Clock) -> Self {
        Self {
            db,
            clock,
            completed_task_preview: DEFAULT_COMPLETED_PREVIEW,
        }
    }

    pub fn with_completed_task_preview(mut self, preview: usize) -> Self {
        self.completed_task_preview = preview;
        self
    }

    // ------------------------------------------------------------------
    // Medications
    // ------------------------------------------------------------------

    /// Validate and store a new medication, stamped with the clock's time.
    pub fn create_medication(&self, medication: Medication) -> TrackerResult<Medication> {
        let mut medication = medication.normalized();
        medication.created_at = self.clock.now();
        medication.validate()?;
        self.db.insert_medication(&medication)?;
        tracing::info!(
            medication_id = %medication.id,
            is_prn = medication.is_prn,
            "Created medication"
        );
        Ok(medication)
    }

    /// Apply a partial update. Fields left `Unchanged` keep their value.
    pub fn update_medication(&self, id: &str, update: MedicationUpdate) -> TrackerResult<Medication> {
        let current = self.require_medication(id)?;
        if update.is_empty() {
            return Ok(current);
        }
        let updated = update.apply(&current)?;
        if !self.db.update_medication(&updated)? {
            return Err(not_found("medication", id));
        }
        tracing::info!(medication_id = %id, "Updated medication");
        Ok(updated)
    }

    /// Delete a medication. Its logs stay and reconcile as orphans.
    pub fn delete_medication(&self, id: &str) -> TrackerResult<bool> {
        let deleted = self.db.delete_medication(id)?;
        if deleted {
            tracing::info!(medication_id = %id, "Deleted medication");
        }
        Ok(deleted)
    }

    pub fn medication(&self, id: &str) -> TrackerResult<Option<Medication>> {
        Ok(self.db.get_medication(id)?)
    }

    pub fn medications(&self) -> TrackerResult<Vec<Medication>> {
        Ok(self.db.list_medications()?)
    }

    fn require_medication(&self, id: &str) -> TrackerResult<Medication> {
        self.db
            .get_medication(id)?
            .ok_or_else(|| not_found("medication", id))
    }

    // ------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------

    /// Record a dose against today. Returns the id of the stored log.
    ///
    /// Re-logging a slot updates it in place; as-needed doses always append.
    pub fn record_log(&self, request: LogRequest) -> TrackerResult<String> {
        let today = self.clock.today();
        let now = self.clock.now();
        let medication_id = request.medication_id.clone();
        let todays_logs = self.db.list_logs_for_date(today)?;
        let mutation = resolve_log(request.clone(), &todays_logs, today, now)?;
        let id = self.persist_log(request, &mutation, today, now)?;

        tracing::info!(log_id = %id, medication_id = %medication_id, "Recorded medication log");
        Ok(id)
    }

    /// Apply a resolved mutation. An update whose row is gone becomes an insert.
    fn persist_log(
        &self,
        request: LogRequest,
        mutation: &LogMutation,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> TrackerResult<String> {
        if let Some(id) = self.db.apply_log_mutation(mutation)? {
            return Ok(id);
        }
        // Slot log was undone between read and write.
        tracing::debug!(log_id = %mutation.log_id(), "Slot log vanished, inserting");
        let retry = resolve_log(request, &[], today, now)?;
        self.db
            .apply_log_mutation(&retry)?
            .ok_or_else(|| not_found("medication log", retry.log_id()))
    }

    /// Convenience over [`Tracker::record_log`].
    pub fn log_dose(
        &self,
        medication_id: &str,
        status: LogStatus,
        scheduled_time: Option<&str>,
        logged_by: &str,
    ) -> TrackerResult<String> {
        let request = LogRequest {
            medication_id: medication_id.to_string(),
            status,
            scheduled_time: scheduled_time.map(String::from),
            logged_by: logged_by.to_string(),
            notes: None,
        };
        self.record_log(request)
    }

    /// Delete a log. Returns whether a row was removed; a missing id is not an error.
    pub fn undo_log(&self, log_id: &str) -> TrackerResult<bool> {
        let removed = self.db.apply_log_mutation(&resolve_undo(log_id))?.is_some();
        if removed {
            tracing::info!(log_id = %log_id, "Undid medication log");
        } else {
            tracing::debug!(log_id = %log_id, "Undo of unknown log ignored");
        }
        Ok(removed)
    }

    pub fn todays_logs(&self) -> TrackerResult<Vec<MedicationLog>> {
        Ok(self.db.list_logs_for_date(self.clock.today())?)
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    /// Build the daily dashboard.
    pub fn today(&self) -> TrackerResult<TodaySummary> {
        let today = self.clock.today();
        let weekday = weekday_index(today);
        let now = self.clock.now();
        let medications = self.db.list_medications()?;
        let logs = self.db.list_logs_for_date(today)?;

        let plan = expand_day(&medications, weekday);
        let adherence = reconcile(&plan, &medications, &logs);

        let mut prn = Vec::with_capacity(adherence.prn.len());
        for group in &adherence.prn {
            let last_taken_at = self.db.latest_taken_at(group.medication_id)?;
            prn.push(PrnCard::build(
                group.medication_id,
                group.medication,
                &group.doses,
                last_taken_at,
                now,
            ));
        }

        Ok(TodaySummary::build(
            today,
            weekday,
            &adherence,
            self.clock.local_time(),
            prn,
        ))
    }

    /// Gate state and today's doses for one as-needed medication.
    pub fn prn_status(&self, medication_id: &str) -> TrackerResult<PrnCard> {
        let medication = self.require_medication(medication_id)?;
        let logs = self.db.list_logs_for_date(self.clock.today())?;
        let mut doses: Vec<&MedicationLog> = logs
            .iter()
            .filter(|log| log.is_prn() && log.medication_id == medication_id)
            .collect();
        doses.sort_by_key(|log| log.logged_at);
        let last_taken_at = self.db.latest_taken_at(medication_id)?;

        Ok(PrnCard::build(
            medication_id,
            Some(&medication),
            &doses,
            last_taken_at,
            self.clock.now(),
        ))
    }

    // ------------------------------------------------------------------
    // Check-ins
    // ------------------------------------------------------------------

    pub fn current_checkin_period(&self) -> CheckinPeriod {
        CheckinPeriod::for_time(&self.clock.local_time())
    }

    /// Submit a check-in for the current period, replacing an earlier one.
    pub fn submit_checkin(
        &self,
        user_id: &str,
        levels: CheckinLevels,
        notes: Option<String>,
    ) -> TrackerResult<FeelingCheckin> {
        let mut checkin = FeelingCheckin::new(
            user_id,
            self.current_checkin_period(),
            levels,
            notes,
            self.clock.today(),
        )?;
        checkin.id = self.db.upsert_checkin(&checkin)?;
        tracing::info!(
            checkin_id = %checkin.id,
            period = checkin.period.as_str(),
            "Submitted check-in"
        );
        Ok(checkin)
    }

    pub fn todays_checkins(&self, user_id: &str) -> TrackerResult<Vec<FeelingCheckin>> {
        Ok(self.db.list_checkins_for_date(user_id, self.clock.today())?)
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub fn create_task(
        &self,
        title: &str,
        description: Option<String>,
        assigned_to: &str,
        assigned_by: &str,
    ) -> TrackerResult<CareTask> {
        let task = CareTask::new(title, description, assigned_to, assigned_by, self.clock.now())?;
        self.db.insert_task(&task)?;
        tracing::info!(task_id = %task.id, assigned_to = %assigned_to, "Created task");
        Ok(task)
    }

    pub fn complete_task(&self, id: &str) -> TrackerResult<CareTask> {
        if !self.db.complete_task(id, self.clock.now())? {
            return Err(not_found("task", id));
        }
        tracing::info!(task_id = %id, "Completed task");
        self.db.get_task(id)?.ok_or_else(|| not_found("task", id))
    }

    pub fn task_board(&self) -> TrackerResult<TaskBoard> {
        let tasks = self.db.list_tasks()?;
        Ok(TaskBoard::from_tasks(tasks, self.completed_task_preview))
    }

    // ------------------------------------------------------------------
    // Care activities
    // ------------------------------------------------------------------

    pub fn log_care_activity(
        &self,
        category: ActivityCategory,
        description: &str,
        logged_by: &str,
        notes: Option<String>,
    ) -> TrackerResult<CareActivity> {
        let activity = CareActivity::new(
            category,
            description,
            logged_by,
            notes,
            self.clock.now(),
            self.clock.today(),
        )?;
        self.db.insert_activity(&activity)?;
        tracing::info!(
            activity_id = %activity.id,
            category = category.as_str(),
            "Logged care activity"
        );
        Ok(activity)
    }

    pub fn activities_today(&self) -> TrackerResult<Vec<CareActivity>> {
        Ok(self.db.list_activities_for_date(self.clock.today())?)
    }

    // ------------------------------------------------------------------
    // Doctor contacts
    // ------------------------------------------------------------------

    pub fn add_doctor_contact(
        &self,
        name: &str,
        phone: &str,
        specialty: Option<String>,
        is_emergency: bool,
        created_by: &str,
    ) -> TrackerResult<DoctorContact> {
        let contact = DoctorContact::new(
            name,
            phone,
            specialty,
            is_emergency,
            created_by,
            self.clock.now(),
        )?;
        self.db.insert_contact(&contact)?;
        tracing::info!(contact_id = %contact.id, is_emergency, "Added doctor contact");
        Ok(contact)
    }

    /// Emergency contacts first, then routine ones by name.
    pub fn doctor_contacts(&self) -> TrackerResult<Vec<DoctorContact>> {
        Ok(self.db.list_contacts()?)
    }

    pub fn remove_doctor_contact(&self, id: &str) -> TrackerResult<bool> {
        let removed = self.db.delete_contact(id)?;
        if removed {
            tracing::info!(contact_id = %id, "Removed doctor contact");
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Change feed
    // ------------------------------------------------------------------

    pub fn changes_since(&self, after_seq: i64, limit: usize) -> TrackerResult<Vec<ChangeRecord>> {
        Ok(self.db.list_changes_since(after_seq, limit)?)
    }

    pub fn recent_changes(&self, limit: usize) -> TrackerResult<Vec<ChangeRecord>> {
        Ok(self.db.list_recent_changes(limit)?)
    }
}

fn not_found(kind: &'static str, id: &str) -> TrackerError {
    TrackerError::NotFound {
        kind,
        id: id.to_string(),
    }
}
