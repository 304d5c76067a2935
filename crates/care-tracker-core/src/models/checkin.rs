//! Daily feeling check-ins.

use std::str::FromStr;

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use super::validation::{optional_text, ValidationError};

/// Part of the day a check-in belongs to. One check-in per user per period per day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckinPeriod {
    Morning,
    Afternoon,
    Evening,
}

impl CheckinPeriod {
    pub const ALL: [CheckinPeriod; 3] = [
        CheckinPeriod::Morning,
        CheckinPeriod::Afternoon,
        CheckinPeriod::Evening,
    ];

    /// Period for a local hour of day (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => CheckinPeriod::Morning,
            12..=16 => CheckinPeriod::Afternoon,
            _ => CheckinPeriod::Evening,
        }
    }

    pub fn for_time<T: Timelike>(time: &T) -> Self {
        Self::from_hour(time.hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinPeriod::Morning => "morning",
            CheckinPeriod::Afternoon => "afternoon",
            CheckinPeriod::Evening => "evening",
        }
    }
}

impl FromStr for CheckinPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(CheckinPeriod::Morning),
            "afternoon" => Ok(CheckinPeriod::Afternoon),
            "evening" => Ok(CheckinPeriod::Evening),
            other => Err(ValidationError::UnknownVariant {
                kind: "check-in period",
                value: other.to_string(),
            }),
        }
    }
}

/// Self-reported levels, each on a 1-10 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckinLevels {
    pub pain: u8,
    pub mood: u8,
    pub energy: u8,
}

impl Default for CheckinLevels {
    fn default() -> Self {
        Self {
            pain: 5,
            mood: 5,
            energy: 5,
        }
    }
}

impl CheckinLevels {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("pain", self.pain), ("mood", self.mood), ("energy", self.energy)] {
            if !(1..=10).contains(&value) {
                return Err(ValidationError::LevelOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// A feeling check-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeelingCheckin {
    pub id: String,
    pub user_id: String,
    pub period: CheckinPeriod,
    pub levels: CheckinLevels,
    pub notes: Option<String>,
    pub checkin_date: NaiveDate,
}

impl FeelingCheckin {
    /// Build a validated check-in. Blank notes are stored as `None`.
    pub fn new(
        user_id: impl Into<String>,
        period: CheckinPeriod,
        levels: CheckinLevels,
        notes: Option<String>,
        checkin_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        levels.validate()?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            period,
            levels,
            notes: optional_text(notes),
            checkin_date,
        })
    }
}
