//! Care tasks assigned between patient and caregiver.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{optional_text, require_text, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::UnknownVariant {
                kind: "task status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareTask {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// User the task is for
    pub assigned_to: String,
    /// User who created it
    pub assigned_by: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CareTask {
    /// Create a pending task. The title is trimmed and must not be blank.
    pub fn new(
        title: &str,
        description: Option<String>,
        assigned_to: impl Into<String>,
        assigned_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: require_text("title", title)?,
            description: optional_text(description),
            assigned_to: assigned_to.into(),
            assigned_by: assigned_by.into(),
            status: TaskStatus::Pending,
            created_at,
            completed_at: None,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }
}

/// Tasks split for display: all pending, plus the most recent completed ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    pub pending: Vec<CareTask>,
    pub recently_completed: Vec<CareTask>,
    pub completed_count: usize,
}

impl TaskBoard {
    /// Build a board from tasks in any order.
    ///
    /// Pending tasks are ordered oldest first; completed ones newest first,
    /// truncated to `completed_preview`.
    pub fn from_tasks(tasks: Vec<CareTask>, completed_preview: usize) -> Self {
        let (mut pending, mut completed): (Vec<_>, Vec<_>) =
            tasks.into_iter().partition(CareTask::is_pending);
        pending.sort_by_key(|t| t.created_at);
        completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        let completed_count = completed.len();
        completed.truncate(completed_preview);
        Self {
            pending,
            recently_completed: completed,
            completed_count,
        }
    }
}
