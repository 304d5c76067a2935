//! Partial-field updates.
//!
//! Every field of an update record is either left alone or replaced. Optional
//! fields use `FieldUpdate<Option<T>>`, so clearing a value is an explicit
//! `Set(None)` and never confused with "not provided".

use serde::{Deserialize, Serialize};

use super::medication::{Medication, ScheduleEntry};
use super::validation::ValidationError;

/// A single field change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldUpdate<T> {
    Unchanged,
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Unchanged
    }
}

impl<T> FieldUpdate<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, FieldUpdate::Set(_))
    }

    /// Overwrite `target` when set.
    pub fn apply_to(self, target: &mut T) {
        if let FieldUpdate::Set(value) = self {
            *target = value;
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldUpdate::Set(v),
            None => FieldUpdate::Unchanged,
        }
    }
}

/// Partial update for a [`Medication`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationUpdate {
    pub name: FieldUpdate<String>,
    pub dosage: FieldUpdate<Option<String>>,
    pub purpose: FieldUpdate<Option<String>>,
    pub notes: FieldUpdate<Option<String>>,
    pub is_prn: FieldUpdate<bool>,
    pub schedule: FieldUpdate<Vec<ScheduleEntry>>,
    pub min_hours_between: FieldUpdate<Option<f64>>,
    pub take_with_food: FieldUpdate<bool>,
    pub interactions: FieldUpdate<Vec<String>>,
    pub key_notes: FieldUpdate<Vec<String>>,
}

impl MedicationUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        !(self.name.is_set()
            || self.dosage.is_set()
            || self.purpose.is_set()
            || self.notes.is_set()
            || self.is_prn.is_set()
            || self.schedule.is_set()
            || self.min_hours_between.is_set()
            || self.take_with_food.is_set()
            || self.interactions.is_set()
            || self.key_notes.is_set())
    }

    /// Produce the updated medication, validated as a whole.
    ///
    /// The identity and creation time of `current` are preserved.
    pub fn apply(self, current: &Medication) -> Result<Medication, ValidationError> {
        let mut updated = current.clone();
        self.name.apply_to(&mut updated.name);
        self.dosage.apply_to(&mut updated.dosage);
        self.purpose.apply_to(&mut updated.purpose);
        self.notes.apply_to(&mut updated.notes);
        self.is_prn.apply_to(&mut updated.is_prn);
        self.schedule.apply_to(&mut updated.schedule);
        self.min_hours_between.apply_to(&mut updated.min_hours_between);
        self.take_with_food.apply_to(&mut updated.take_with_food);
        self.interactions.apply_to(&mut updated.interactions);
        self.key_notes.apply_to(&mut updated.key_notes);

        let updated = updated.normalized();
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Medication {
        let mut med = Medication::scheduled("Lisinopril", vec![ScheduleEntry::new(1, "08:00")]);
        med.dosage = Some("10mg".into());
        med
    }

    #[test]
    fn test_empty_update_is_noop() {
        let med = base();
        let update = MedicationUpdate::default();
        assert!(update.is_empty());
        assert_eq!(update.apply(&med).unwrap(), med);
    }

    #[test]
    fn test_unchanged_vs_cleared() {
        let med = base();

        let keep = MedicationUpdate {
            name: FieldUpdate::Set("Lisinopril HCT".into()),
            ..Default::default()
        };
        let kept = keep.apply(&med).unwrap();
        assert_eq!(kept.dosage, Some("10mg".into()));
        assert_eq!(kept.name, "Lisinopril HCT");

        let clear = MedicationUpdate {
            dosage: FieldUpdate::Set(None),
            ..Default::default()
        };
        let cleared = clear.apply(&med).unwrap();
        assert_eq!(cleared.dosage, None);
        assert_eq!(cleared.id, med.id);
    }

    #[test]
    fn test_switch_to_prn_requires_clearing_schedule() {
        let med = base();

        let hybrid = MedicationUpdate {
            is_prn: FieldUpdate::Set(true),
            ..Default::default()
        };
        assert_eq!(hybrid.apply(&med), Err(ValidationError::PrnWithSchedule));

        let clean = MedicationUpdate {
            is_prn: FieldUpdate::Set(true),
            schedule: FieldUpdate::Set(Vec::new()),
            min_hours_between: FieldUpdate::Set(Some(6.0)),
            ..Default::default()
        };
        let prn = clean.apply(&med).unwrap();
        assert!(prn.is_prn);
        assert_eq!(prn.min_hours_between, Some(6.0));
    }

    #[test]
    fn test_from_option() {
        let set: FieldUpdate<u8> = Some(3).into();
        let unchanged: FieldUpdate<u8> = None.into();
        assert_eq!(set, FieldUpdate::Set(3));
        assert_eq!(unchanged, FieldUpdate::Unchanged);
    }
}
