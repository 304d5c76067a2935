//! Doctor contact database operations.

use rusqlite::{params, Row};

use super::{Database, DbResult};
use crate::models::DoctorContact;

impl Database {
    pub fn insert_contact(&self, contact: &DoctorContact) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO doctor_contacts (
                id, name, phone, specialty, is_emergency, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                contact.id,
                contact.name,
                contact.phone,
                contact.specialty,
                contact.is_emergency,
                contact.created_by,
                contact.created_at,
            ],
        )?;
        Ok(())
    }

    /// All contacts, emergency first, then by name.
    pub fn list_contacts(&self) -> DbResult<Vec<DoctorContact>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, phone, specialty, is_emergency, created_by, created_at
            FROM doctor_contacts
            ORDER BY is_emergency DESC, name COLLATE NOCASE, created_at
            "#,
        )?;
        let contacts = stmt
            .query_map([], |row: &Row<'_>| {
                Ok(DoctorContact {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    phone: row.get(2)?,
                    specialty: row.get(3)?,
                    is_emergency: row.get(4)?,
                    created_by: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    pub fn delete_contact(&self, id: &str) -> DbResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM doctor_contacts WHERE id = ?", params![id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn contact(name: &str, is_emergency: bool) -> DoctorContact {
        DoctorContact::new(name, "555-0100", None, is_emergency, "harris", Utc::now()).unwrap()
    }

    #[test]
    fn test_emergency_contacts_listed_first() {
        let db = Database::open_in_memory().unwrap();
        for c in [
            contact("dr. Young", false),
            contact("Urgent Care", true),
            contact("Dr. Alvarez", false),
        ] {
            db.insert_contact(&c).unwrap();
        }

        let names: Vec<_> = db
            .list_contacts()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Urgent Care", "Dr. Alvarez", "dr. Young"]);
    }

    #[test]
    fn test_delete_contact() {
        let db = Database::open_in_memory().unwrap();
        let c = contact("Dr. Alvarez", false);
        db.insert_contact(&c).unwrap();

        assert!(db.delete_contact(&c.id).unwrap());
        assert!(!db.delete_contact(&c.id).unwrap());
        assert!(db.list_contacts().unwrap().is_empty());
    }
}
