//! Medication log database operations.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_column, Database, DbError, DbResult};
use crate::models::{MedicationLog, SlotKey};
use crate::schedule::LogMutation;

const LOG_COLUMNS: &str = r#"
    id, medication_id, scheduled_time, status, logged_by, logged_at, log_date, notes
"#;

impl Database {
    /// Execute a mutation decided by the upsert resolver.
    ///
    /// Inserts go through `ON CONFLICT` on the slot index, so a duplicate
    /// slotted insert updates the existing row and returns its id. Returns
    /// `None` when an update or delete matched no row.
    pub fn apply_log_mutation(&self, mutation: &LogMutation) -> DbResult<Option<String>> {
        match mutation {
            LogMutation::Insert(log) => {
                let id: String = self.conn.query_row(
                    r#"
                    INSERT INTO medication_logs (
                        id, medication_id, scheduled_time, status,
                        logged_by, logged_at, log_date, notes
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT (medication_id, scheduled_time, log_date) DO UPDATE SET
                        status = excluded.status,
                        logged_by = excluded.logged_by,
                        logged_at = excluded.logged_at
                    RETURNING id
                    "#,
                    params![
                        log.id,
                        log.medication_id,
                        log.scheduled_time,
                        log.status.as_str(),
                        log.logged_by,
                        log.logged_at,
                        log.log_date,
                        log.notes,
                    ],
                    |row| row.get(0),
                )?;
                if id != log.id {
                    tracing::debug!(
                        requested = %log.id,
                        existing = %id,
                        "Slot already logged, converged onto existing row"
                    );
                }
                Ok(Some(id))
            }
            LogMutation::Update {
                id,
                status,
                logged_by,
                logged_at,
            } => {
                let rows_affected = self.conn.execute(
                    r#"
                    UPDATE medication_logs SET
                        status = ?2,
                        logged_by = ?3,
                        logged_at = ?4
                    WHERE id = ?1
                    "#,
                    params![id, status.as_str(), logged_by, logged_at],
                )?;
                Ok((rows_affected > 0).then(|| id.clone()))
            }
            LogMutation::Delete { id } => {
                let rows_affected = self
                    .conn
                    .execute("DELETE FROM medication_logs WHERE id = ?", [id])?;
                Ok((rows_affected > 0).then(|| id.clone()))
            }
        }
    }

    /// Get a log by ID.
    pub fn get_log(&self, id: &str) -> DbResult<Option<MedicationLog>> {
        let sql = format!("SELECT {} FROM medication_logs WHERE id = ?", LOG_COLUMNS);
        self.conn
            .query_row(&sql, [id], LogRow::from_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get the log occupying a slot, if any.
    pub fn get_slot_log(&self, key: &SlotKey) -> DbResult<Option<MedicationLog>> {
        let sql = format!(
            r#"
            SELECT {} FROM medication_logs
            WHERE medication_id = ?1 AND scheduled_time = ?2 AND log_date = ?3
            "#,
            LOG_COLUMNS
        );
        self.conn
            .query_row(
                &sql,
                params![key.medication_id, key.scheduled_time, key.log_date],
                LogRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// All logs recorded against a calendar day, oldest first.
    pub fn list_logs_for_date(&self, date: NaiveDate) -> DbResult<Vec<MedicationLog>> {
        let sql = format!(
            "SELECT {} FROM medication_logs WHERE log_date = ? ORDER BY logged_at",
            LOG_COLUMNS
        );
        self.query_logs(&sql, params![date])
    }

    /// Recent history for one medication, newest first.
    pub fn list_logs_for_medication(
        &self,
        medication_id: &str,
        limit: usize,
    ) -> DbResult<Vec<MedicationLog>> {
        let sql = format!(
            r#"
            SELECT {} FROM medication_logs
            WHERE medication_id = ?1
            ORDER BY logged_at DESC
            LIMIT ?2
            "#,
            LOG_COLUMNS
        );
        self.query_logs(&sql, params![medication_id, limit as i64])
    }

    /// Timestamp of the most recent `taken` log for a medication, across all days.
    pub fn latest_taken_at(&self, medication_id: &str) -> DbResult<Option<DateTime<Utc>>> {
        let latest = self
            .conn
            .query_row(
                r#"
                SELECT logged_at FROM medication_logs
                WHERE medication_id = ?1 AND status = 'taken'
                ORDER BY logged_at DESC
                LIMIT 1
                "#,
                [medication_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(latest)
    }

    fn query_logs(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> DbResult<Vec<MedicationLog>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, LogRow::from_row)?;

        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?.try_into()?);
        }
        Ok(logs)
    }
}

/// Intermediate row struct for database mapping.
struct LogRow {
    id: String,
    medication_id: String,
    scheduled_time: Option<String>,
    status: String,
    logged_by: String,
    logged_at: DateTime<Utc>,
    log_date: NaiveDate,
    notes: Option<String>,
}

impl LogRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            medication_id: row.get(1)?,
            scheduled_time: row.get(2)?,
            status: row.get(3)?,
            logged_by: row.get(4)?,
            logged_at: row.get(5)?,
            log_date: row.get(6)?,
            notes: row.get(7)?,
        })
    }
}

impl TryFrom<LogRow> for MedicationLog {
    type Error = DbError;

    fn try_from(row: LogRow) -> Result<Self, Self::Error> {
        Ok(MedicationLog {
            id: row.id,
            medication_id: row.medication_id,
            scheduled_time: row.scheduled_time,
            status: parse_column("status", &row.status)?,
            logged_by: row.logged_by,
            logged_at: row.logged_at,
            log_date: row.log_date,
            notes: row.notes,
        })
    }
}
