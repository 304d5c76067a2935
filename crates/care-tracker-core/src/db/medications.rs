//! Medication database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Medication, ScheduleEntry};

const MEDICATION_COLUMNS: &str = r#"
    id, name, dosage, purpose, notes, is_prn, schedule,
    min_hours_between, take_with_food, interactions, key_notes, created_at
"#;

impl Database {
    /// Insert a new medication.
    pub fn insert_medication(&self, medication: &Medication) -> DbResult<()> {
        let schedule_json = serde_json::to_string(&medication.schedule)?;
        let interactions_json = serde_json::to_string(&medication.interactions)?;
        let key_notes_json = serde_json::to_string(&medication.key_notes)?;

        self.conn.execute(
            r#"
            INSERT INTO medications (
                id, name, dosage, purpose, notes, is_prn, schedule,
                min_hours_between, take_with_food, interactions, key_notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                medication.id,
                medication.name,
                medication.dosage,
                medication.purpose,
                medication.notes,
                medication.is_prn,
                schedule_json,
                medication.min_hours_between,
                medication.take_with_food,
                interactions_json,
                key_notes_json,
                medication.created_at,
            ],
        )?;
        Ok(())
    }

    /// Overwrite every mutable field of an existing medication.
    pub fn update_medication(&self, medication: &Medication) -> DbResult<bool> {
        let schedule_json = serde_json::to_string(&medication.schedule)?;
        let interactions_json = serde_json::to_string(&medication.interactions)?;
        let key_notes_json = serde_json::to_string(&medication.key_notes)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE medications SET
                name = ?2,
                dosage = ?3,
                purpose = ?4,
                notes = ?5,
                is_prn = ?6,
                schedule = ?7,
                min_hours_between = ?8,
                take_with_food = ?9,
                interactions = ?10,
                key_notes = ?11,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                medication.id,
                medication.name,
                medication.dosage,
                medication.purpose,
                medication.notes,
                medication.is_prn,
                schedule_json,
                medication.min_hours_between,
                medication.take_with_food,
                interactions_json,
                key_notes_json,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, id: &str) -> DbResult<Option<Medication>> {
        let sql = format!("SELECT {} FROM medications WHERE id = ?", MEDICATION_COLUMNS);
        self.conn
            .query_row(&sql, [id], MedicationRow::from_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all medications, oldest first.
    pub fn list_medications(&self) -> DbResult<Vec<Medication>> {
        let sql = format!(
            "SELECT {} FROM medications ORDER BY created_at, name",
            MEDICATION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], MedicationRow::from_row)?;

        let mut medications = Vec::new();
        for row in rows {
            medications.push(row?.try_into()?);
        }
        Ok(medications)
    }

    /// Delete a medication. Its logs are kept.
    pub fn delete_medication(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medications WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct MedicationRow {
    id: String,
    name: String,
    dosage: Option<String>,
    purpose: Option<String>,
    notes: Option<String>,
    is_prn: bool,
    schedule: String,
    min_hours_between: Option<f64>,
    take_with_food: bool,
    interactions: String,
    key_notes: String,
    created_at: DateTime<Utc>,
}

impl MedicationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            dosage: row.get(2)?,
            purpose: row.get(3)?,
            notes: row.get(4)?,
            is_prn: row.get(5)?,
            schedule: row.get(6)?,
            min_hours_between: row.get(7)?,
            take_with_food: row.get(8)?,
            interactions: row.get(9)?,
            key_notes: row.get(10)?,
            created_at: row.get(11)?,
        })
    }
}

impl TryFrom<MedicationRow> for Medication {
    type Error = DbError;

    fn try_from(row: MedicationRow) -> Result<Self, Self::Error> {
        let schedule: Vec<ScheduleEntry> = serde_json::from_str(&row.schedule)?;
        let interactions: Vec<String> = serde_json::from_str(&row.interactions)?;
        let key_notes: Vec<String> = serde_json::from_str(&row.key_notes)?;

        Ok(Medication {
            id: row.id,
            name: row.name,
            dosage: row.dosage,
            purpose: row.purpose,
            notes: row.notes,
            is_prn: row.is_prn,
            schedule,
            min_hours_between: row.min_hours_between,
            take_with_food: row.take_with_food,
            interactions,
            key_notes,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_scheduled() -> Medication {
        let mut med = Medication::scheduled(
            "Methocarbamol",
            vec![ScheduleEntry::new(1, "08:00"), ScheduleEntry::new(1, "20:00")],
        );
        med.dosage = Some("750mg".into());
        med.take_with_food = true;
        med.interactions = vec!["Alcohol".into()];
        med.key_notes = vec!["May cause drowsiness".into()];
        med
    }

    #[test]
    fn test_insert_and_get_medication() {
        let db = Database::open_in_memory().unwrap();
        let med = make_scheduled();
        db.insert_medication(&med).unwrap();

        let loaded = db.get_medication(&med.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Methocarbamol");
        assert_eq!(loaded.schedule, med.schedule);
        assert_eq!(loaded.interactions, vec!["Alcohol"]);
        assert!(loaded.take_with_food);
        assert!(!loaded.is_prn);
    }

    #[test]
    fn test_get_missing_medication() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_medication("nope").unwrap().is_none());
    }

    #[test]
    fn test_update_medication() {
        let db = Database::open_in_memory().unwrap();
        let mut med = make_scheduled();
        db.insert_medication(&med).unwrap();

        med.dosage = Some("500mg".into());
        med.schedule = vec![ScheduleEntry::new(3, "09:30")];
        assert!(db.update_medication(&med).unwrap());

        let loaded = db.get_medication(&med.id).unwrap().unwrap();
        assert_eq!(loaded.dosage.as_deref(), Some("500mg"));
        assert_eq!(loaded.schedule, vec![ScheduleEntry::new(3, "09:30")]);
    }

    #[test]
    fn test_update_missing_medication() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.update_medication(&make_scheduled()).unwrap());
    }

    #[test]
    fn test_prn_interval_round_trips() {
        let db = Database::open_in_memory().unwrap();
        let med = Medication::as_needed("Oxycodone", Some(4.5));
        db.insert_medication(&med).unwrap();

        let loaded = db.get_medication(&med.id).unwrap().unwrap();
        assert!(loaded.is_prn);
        assert_eq!(loaded.min_hours_between, Some(4.5));
        assert!(loaded.schedule.is_empty());
    }

    #[test]
    fn test_list_and_delete_medications() {
        let db = Database::open_in_memory().unwrap();
        let a = make_scheduled();
        let b = Medication::as_needed("Zofran", Some(8.0));
        db.insert_medication(&a).unwrap();
        db.insert_medication(&b).unwrap();
        assert_eq!(db.list_medications().unwrap().len(), 2);

        assert!(db.delete_medication(&a.id).unwrap());
        assert!(!db.delete_medication(&a.id).unwrap());

        let remaining = db.list_medications().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }
}
