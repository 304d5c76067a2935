//! Care activity database operations.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Row};

use super::{parse_column, Database, DbError, DbResult};
use crate::models::CareActivity;

impl Database {
    /// Insert a new care activity.
    pub fn insert_activity(&self, activity: &CareActivity) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO care_activities (
                id, category, description, logged_by, notes, activity_time, activity_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                activity.id,
                activity.category.as_str(),
                activity.description,
                activity.logged_by,
                activity.notes,
                activity.activity_time,
                activity.activity_date,
            ],
        )?;
        Ok(())
    }

    /// Activities for one day, newest first.
    pub fn list_activities_for_date(&self, date: NaiveDate) -> DbResult<Vec<CareActivity>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, category, description, logged_by, notes, activity_time, activity_date
            FROM care_activities
            WHERE activity_date = ?
            ORDER BY activity_time DESC
            "#,
        )?;
        let rows = stmt.query_map(params![date], |row: &Row<'_>| {
            Ok(ActivityRow {
                id: row.get(0)?,
                category: row.get(1)?,
                description: row.get(2)?,
                logged_by: row.get(3)?,
                notes: row.get(4)?,
                activity_time: row.get(5)?,
                activity_date: row.get(6)?,
            })
        })?;

        let mut activities = Vec::new();
        for row in rows {
            activities.push(row?.try_into()?);
        }
        Ok(activities)
    }
}

/// Intermediate row struct for database mapping.
struct ActivityRow {
    id: String,
    category: String,
    description: String,
    logged_by: String,
    notes: Option<String>,
    activity_time: DateTime<Utc>,
    activity_date: NaiveDate,
}

impl TryFrom<ActivityRow> for CareActivity {
    type Error = DbError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(CareActivity {
            id: row.id,
            category: parse_column("category", &row.category)?,
            description: row.description,
            logged_by: row.logged_by,
            notes: row.notes,
            activity_time: row.activity_time,
            activity_date: row.activity_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityCategory;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_activities_grouped_by_date() {
        let db = Database::open_in_memory().unwrap();
        let morning = Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap();
        let today = morning.date_naive();

        let walk = CareActivity::new(
            ActivityCategory::Exercise,
            "Walked to the mailbox",
            "kent",
            None,
            morning,
            today,
        )
        .unwrap();
        let dressing = CareActivity::new(
            ActivityCategory::WoundCare,
            "Changed dressing",
            "harris",
            Some("Looks clean".into()),
            morning + Duration::hours(2),
            today,
        )
        .unwrap();
        let yesterday = CareActivity::new(
            ActivityCategory::Hygiene,
            "Shower",
            "kent",
            None,
            morning - Duration::days(1),
            today - Duration::days(1),
        )
        .unwrap();
        for activity in [&walk, &dressing, &yesterday] {
            db.insert_activity(activity).unwrap();
        }

        let listed = db.list_activities_for_date(today).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].category, ActivityCategory::WoundCare);
        assert_eq!(listed[0].notes.as_deref(), Some("Looks clean"));
        assert_eq!(listed[1].id, walk.id);
    }
}
