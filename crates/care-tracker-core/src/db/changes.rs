//! Change log reads.
//!
//! Rows are written by triggers in the schema. A realtime delivery layer
//! polls with the last `seq` it has seen.

use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{Database, DbError, DbResult};

/// One recorded change to a synced table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeRecord {
    /// Monotonic cursor
    pub seq: i64,
    pub table_name: String,
    pub record_id: String,
    /// `INSERT`, `UPDATE` or `DELETE`
    pub action: String,
    pub changed_by: Option<String>,
    pub changed_at: String,
    pub payload: Option<serde_json::Value>,
}

impl Database {
    /// Changes recorded after `after_seq`, oldest first.
    pub fn list_changes_since(&self, after_seq: i64, limit: usize) -> DbResult<Vec<ChangeRecord>> {
        self.query_changes(
            r#"
            SELECT seq, table_name, record_id, action, changed_by, changed_at, payload
            FROM sync_log
            WHERE seq > ?1
            ORDER BY seq
            LIMIT ?2
            "#,
            params![after_seq, limit as i64],
        )
    }

    /// The most recent changes, newest first.
    pub fn list_recent_changes(&self, limit: usize) -> DbResult<Vec<ChangeRecord>> {
        self.query_changes(
            r#"
            SELECT seq, table_name, record_id, action, changed_by, changed_at, payload
            FROM sync_log
            ORDER BY seq DESC
            LIMIT ?1
            "#,
            params![limit as i64],
        )
    }

    fn query_changes(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> DbResult<Vec<ChangeRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<String>>(6)?,
            ))
        })?;

        let mut changes = Vec::new();
        for row in rows {
            let (seq, table_name, record_id, action, changed_by, changed_at, payload) = row?;
            let payload = payload
                .map(|json| serde_json::from_str(&json))
                .transpose()
                .map_err(DbError::Json)?;
            changes.push(ChangeRecord {
                seq,
                table_name,
                record_id,
                action,
                changed_by,
                changed_at,
                payload,
            });
        }
        Ok(changes)
    }

    /// Highest sequence number recorded so far, 0 when empty.
    pub fn latest_change_seq(&self) -> DbResult<i64> {
        let seq = self
            .conn
            .query_row("SELECT COALESCE(MAX(seq), 0) FROM sync_log", [], |row| {
                row.get(0)
            })?;
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogStatus, Medication};
    use crate::schedule::{resolve_log, LogRequest};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_log_writes_are_recorded() {
        let db = Database::open_in_memory().unwrap();
        let med = Medication::as_needed("Zofran", None);
        db.insert_medication(&med).unwrap();
        let cursor = db.latest_change_seq().unwrap();
        assert!(cursor > 0);

        let now = Utc.with_ymd_and_hms(2026, 3, 3, 8, 0, 0).unwrap();
        let request = LogRequest::scheduled("med-1", LogStatus::Taken, "08:00", "patient");
        let mutation = resolve_log(request, &[], now.date_naive(), now).unwrap();
        db.apply_log_mutation(&mutation).unwrap();

        let changes = db.list_changes_since(cursor, 10).unwrap();
        assert_eq!(changes.len(), 1);
        let change = &changes[0];
        assert_eq!(change.table_name, "medication_logs");
        assert_eq!(change.action, "INSERT");
        assert_eq!(change.changed_by.as_deref(), Some("patient"));
        let payload = change.payload.as_ref().unwrap();
        assert_eq!(payload["scheduled_time"], "08:00");
        assert_eq!(payload["status"], "taken");
    }

    #[test]
    fn test_converged_insert_recorded_as_update() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 3, 8, 0, 0).unwrap();
        let request = LogRequest::scheduled("med-1", LogStatus::Taken, "08:00", "patient");
        let a = resolve_log(request.clone(), &[], now.date_naive(), now).unwrap();
        let b = resolve_log(request, &[], now.date_naive(), now).unwrap();
        db.apply_log_mutation(&a).unwrap();
        db.apply_log_mutation(&b).unwrap();

        let actions: Vec<_> = db
            .list_changes_since(0, 10)
            .unwrap()
            .into_iter()
            .map(|c| c.action)
            .collect();
        assert_eq!(actions, vec!["INSERT", "UPDATE"]);

        let recent = db.list_recent_changes(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].action, "UPDATE");
    }
}
