//! Feeling check-in database operations.

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_column, Database, DbError, DbResult};
use crate::models::{CheckinLevels, FeelingCheckin};

impl Database {
    /// Record a check-in, replacing the user's earlier one for the same
    /// period and day. Returns the id of the stored row.
    pub fn upsert_checkin(&self, checkin: &FeelingCheckin) -> DbResult<String> {
        let id = self.conn.query_row(
            r#"
            INSERT INTO feeling_checkins (
                id, user_id, period, pain_level, mood_level, energy_level, notes, checkin_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (user_id, period, checkin_date) DO UPDATE SET
                pain_level = excluded.pain_level,
                mood_level = excluded.mood_level,
                energy_level = excluded.energy_level,
                notes = excluded.notes
            RETURNING id
            "#,
            params![
                checkin.id,
                checkin.user_id,
                checkin.period.as_str(),
                checkin.levels.pain,
                checkin.levels.mood,
                checkin.levels.energy,
                checkin.notes,
                checkin.checkin_date,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// A user's check-ins for one day, in period order.
    pub fn list_checkins_for_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> DbResult<Vec<FeelingCheckin>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, period, pain_level, mood_level, energy_level, notes, checkin_date
            FROM feeling_checkins
            WHERE user_id = ?1 AND checkin_date = ?2
            ORDER BY CASE period
                WHEN 'morning' THEN 0
                WHEN 'afternoon' THEN 1
                ELSE 2
            END
            "#,
        )?;
        let rows = stmt.query_map(params![user_id, date], CheckinRow::from_row)?;

        let mut checkins = Vec::new();
        for row in rows {
            checkins.push(row?.try_into()?);
        }
        Ok(checkins)
    }
}

/// Intermediate row struct for database mapping.
struct CheckinRow {
    id: String,
    user_id: String,
    period: String,
    pain: u8,
    mood: u8,
    energy: u8,
    notes: Option<String>,
    checkin_date: NaiveDate,
}

impl CheckinRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            period: row.get(2)?,
            pain: row.get(3)?,
            mood: row.get(4)?,
            energy: row.get(5)?,
            notes: row.get(6)?,
            checkin_date: row.get(7)?,
        })
    }
}

impl TryFrom<CheckinRow> for FeelingCheckin {
    type Error = DbError;

    fn try_from(row: CheckinRow) -> Result<Self, Self::Error> {
        Ok(FeelingCheckin {
            id: row.id,
            user_id: row.user_id,
            period: parse_column("period", &row.period)?,
            levels: CheckinLevels {
                pain: row.pain,
                mood: row.mood,
                energy: row.energy,
            },
            notes: row.notes,
            checkin_date: row.checkin_date,
        })
    }
}
