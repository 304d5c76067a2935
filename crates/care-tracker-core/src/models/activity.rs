//! Care activity log (wound care, exercise, ...).

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{optional_text, require_text, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    WoundCare,
    Exercise,
    Hygiene,
    Nutrition,
    Other,
}

impl ActivityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::WoundCare => "wound_care",
            ActivityCategory::Exercise => "exercise",
            ActivityCategory::Hygiene => "hygiene",
            ActivityCategory::Nutrition => "nutrition",
            ActivityCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityCategory::WoundCare => "Wound Care",
            ActivityCategory::Exercise => "Exercise",
            ActivityCategory::Hygiene => "Hygiene",
            ActivityCategory::Nutrition => "Nutrition",
            ActivityCategory::Other => "Other",
        }
    }
}

impl FromStr for ActivityCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wound_care" => Ok(ActivityCategory::WoundCare),
            "exercise" => Ok(ActivityCategory::Exercise),
            "hygiene" => Ok(ActivityCategory::Hygiene),
            "nutrition" => Ok(ActivityCategory::Nutrition),
            "other" => Ok(ActivityCategory::Other),
            other => Err(ValidationError::UnknownVariant {
                kind: "activity category",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareActivity {
    pub id: String,
    pub category: ActivityCategory,
    /// What was done, e.g. "Changed gauze"
    pub description: String,
    pub logged_by: String,
    pub notes: Option<String>,
    pub activity_time: DateTime<Utc>,
    /// Local calendar day the activity is listed under
    pub activity_date: NaiveDate,
}

impl CareActivity {
    pub fn new(
        category: ActivityCategory,
        description: &str,
        logged_by: impl Into<String>,
        notes: Option<String>,
        activity_time: DateTime<Utc>,
        activity_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            description: require_text("description", description)?,
            logged_by: logged_by.into(),
            notes: optional_text(notes),
            activity_time,
            activity_date,
        })
    }
}
