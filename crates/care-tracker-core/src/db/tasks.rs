//! Care task database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_column, Database, DbError, DbResult};
use crate::models::CareTask;

const TASK_COLUMNS: &str = r#"
    id, title, description, assigned_to, assigned_by, status, created_at, completed_at
"#;

impl Database {
    /// Insert a new task.
    pub fn insert_task(&self, task: &CareTask) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO care_tasks (
                id, title, description, assigned_to, assigned_by,
                status, created_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                task.id,
                task.title,
                task.description,
                task.assigned_to,
                task.assigned_by,
                task.status.as_str(),
                task.created_at,
                task.completed_at,
            ],
        )?;
        Ok(())
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: &str) -> DbResult<Option<CareTask>> {
        let sql = format!("SELECT {} FROM care_tasks WHERE id = ?", TASK_COLUMNS);
        self.conn
            .query_row(&sql, [id], TaskRow::from_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Mark a task completed. Completing twice keeps the first timestamp.
    pub fn complete_task(&self, id: &str, completed_at: DateTime<Utc>) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE care_tasks SET
                status = 'completed',
                completed_at = COALESCE(completed_at, ?2)
            WHERE id = ?1
            "#,
            params![id, completed_at],
        )?;
        Ok(rows_affected > 0)
    }

    /// List all tasks, newest first.
    pub fn list_tasks(&self) -> DbResult<Vec<CareTask>> {
        let sql = format!(
            "SELECT {} FROM care_tasks ORDER BY created_at DESC",
            TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], TaskRow::from_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.try_into()?);
        }
        Ok(tasks)
    }
}

/// Intermediate row struct for database mapping.
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    assigned_to: String,
    assigned_by: String,
    status: String,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            assigned_to: row.get(3)?,
            assigned_by: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
            completed_at: row.get(7)?,
        })
    }
}

impl TryFrom<TaskRow> for CareTask {
    type Error = DbError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(CareTask {
            id: row.id,
            title: row.title,
            description: row.description,
            assigned_to: row.assigned_to,
            assigned_by: row.assigned_by,
            status: parse_column("status", &row.status)?,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}
