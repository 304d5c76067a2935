//! Doctor and clinic phone contacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{optional_text, require_text, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorContact {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub specialty: Option<String>,
    /// Emergency contacts are listed ahead of routine ones
    pub is_emergency: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl DoctorContact {
    pub fn new(
        name: &str,
        phone: &str,
        specialty: Option<String>,
        is_emergency: bool,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: require_text("name", name)?,
            phone: require_text("phone", phone)?,
            specialty: optional_text(specialty),
            is_emergency,
            created_by: created_by.into(),
            created_at,
        })
    }

    /// `tel:` link for dialing from the client.
    pub fn dial_uri(&self) -> String {
        let digits: String = self
            .phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        format!("tel:{}", digits)
    }
}
