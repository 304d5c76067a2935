//! End-to-end adherence tests through the tracker service.

use care_tracker_core::db::Database;
use care_tracker_core::models::{FieldUpdate, LogStatus, Medication, MedicationUpdate, ScheduleEntry};
use care_tracker_core::schedule::{AdherenceState, Clock, FixedClock, GateState};
use care_tracker_core::tracker::Tracker;
use chrono::{DateTime, Duration, TimeZone, Utc};

// 2026-03-03 is a Tuesday (weekday 2).
fn tuesday(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 3, hour, minute, 0).unwrap()
}

fn scheduled(name: &str, entries: &[(u8, &str)]) -> Medication {
    Medication::scheduled(
        name,
        entries
            .iter()
            .map(|&(weekday, time)| ScheduleEntry::new(weekday, time))
            .collect(),
    )
}

#[test]
fn test_expansion_follows_weekday() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(7, 0));
    let tracker = Tracker::new(&db, &clock);
    tracker
        .create_medication(scheduled(
            "Metoprolol",
            &[(2, "08:00"), (2, "20:00"), (4, "08:00")],
        ))
        .unwrap();

    let summary = tracker.today().unwrap();
    let times: Vec<_> = summary.slots.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(times, vec!["08:00", "20:00"]);

    // Sunday
    clock.set(Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap());
    assert_eq!(clock.today_weekday(), 0);
    let summary = tracker.today().unwrap();
    assert!(summary.slots.is_empty());
    assert_eq!(summary.total_scheduled, 0);
    assert!(!summary.all_done);
    assert_eq!(summary.progress_fraction, 0.0);
}

#[test]
fn test_shared_time_is_one_slot() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap());
    let tracker = Tracker::new(&db, &clock);
    tracker.create_medication(scheduled("Aspirin", &[(1, "09:00")])).unwrap();
    tracker.create_medication(scheduled("Statin", &[(1, "09:00")])).unwrap();

    let summary = tracker.today().unwrap();
    assert_eq!(summary.slots.len(), 1);
    let names: Vec<_> = summary.slots[0].doses.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Aspirin", "Statin"]);
    assert_eq!(summary.total_scheduled, 2);
}

#[test]
fn test_relogging_slot_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(8, 1));
    let tracker = Tracker::new(&db, &clock);
    let med = tracker
        .create_medication(scheduled("Metoprolol", &[(2, "08:00")]))
        .unwrap();

    let first = tracker
        .log_dose(&med.id, LogStatus::Taken, Some("08:00"), "patient")
        .unwrap();
    clock.advance(Duration::minutes(1));
    let second = tracker
        .log_dose(&med.id, LogStatus::Taken, Some("08:00"), "harris")
        .unwrap();

    assert_eq!(first, second);
    let logs = tracker.todays_logs().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].logged_at, tuesday(8, 2));
    assert_eq!(logs[0].logged_by, "harris");
}

#[test]
fn test_slots_are_isolated() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(8, 0));
    let tracker = Tracker::new(&db, &clock);
    let med = tracker
        .create_medication(scheduled("Metoprolol", &[(2, "08:00"), (2, "20:00")]))
        .unwrap();

    let morning = tracker
        .log_dose(&med.id, LogStatus::Taken, Some("08:00"), "patient")
        .unwrap();
    clock.set(tuesday(20, 0));
    let evening = tracker
        .log_dose(&med.id, LogStatus::Skipped, Some("20:00"), "patient")
        .unwrap();
    assert_ne!(morning, evening);

    let summary = tracker.today().unwrap();
    let states: Vec<_> = summary.slots.iter().map(|s| s.doses[0].state).collect();
    assert_eq!(states, vec![AdherenceState::Taken, AdherenceState::Skipped]);
    assert!(summary.all_done);
}

#[test]
fn test_prn_logs_append() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(6, 0));
    let tracker = Tracker::new(&db, &clock);
    let med = tracker
        .create_medication(Medication::as_needed("Acetaminophen", None))
        .unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(tracker.log_dose(&med.id, LogStatus::Taken, None, "patient").unwrap());
        clock.advance(Duration::hours(1));
    }
    ids.dedup();
    assert_eq!(ids.len(), 3);

    let summary = tracker.today().unwrap();
    assert_eq!(summary.prn.len(), 1);
    assert_eq!(summary.prn[0].doses_today.len(), 3);
    assert!(summary.prn[0].gate.is_ready());
    assert_eq!(summary.completed_count, 0);
}

#[test]
fn test_undo_restores_pending() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(8, 0));
    let tracker = Tracker::new(&db, &clock);
    let med = tracker
        .create_medication(scheduled("Metoprolol", &[(2, "08:00")]))
        .unwrap();

    let id = tracker
        .log_dose(&med.id, LogStatus::Taken, Some("08:00"), "patient")
        .unwrap();
    assert!(tracker.today().unwrap().all_done);

    assert!(tracker.undo_log(&id).unwrap());
    let summary = tracker.today().unwrap();
    assert_eq!(summary.slots[0].doses[0].state, AdherenceState::Pending);
    assert_eq!(summary.slots[0].doses[0].log_id, None);
    assert_eq!(summary.pending_count, 1);

    // Undoing again is a quiet no-op.
    assert!(!tracker.undo_log(&id).unwrap());
}

#[test]
fn test_gate_boundary() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(8, 0));
    let tracker = Tracker::new(&db, &clock);
    let med = tracker
        .create_medication(Medication::as_needed("Oxycodone", Some(4.0)))
        .unwrap();
    tracker.log_dose(&med.id, LogStatus::Taken, None, "patient").unwrap();

    clock.set(tuesday(11, 59));
    let card = tracker.prn_status(&med.id).unwrap();
    assert!(matches!(card.gate, GateState::CoolingDown { .. }));
    assert_eq!(card.countdown.as_deref(), Some("1m"));

    clock.set(tuesday(12, 0));
    let card = tracker.prn_status(&med.id).unwrap();
    assert_eq!(card.gate, GateState::Ready);
    assert_eq!(card.countdown, None);
}

#[test]
fn test_gate_sees_yesterdays_dose() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(22, 0) - Duration::days(1));
    let tracker = Tracker::new(&db, &clock);
    let med = tracker
        .create_medication(Medication::as_needed("Zofran", Some(8.0)))
        .unwrap();
    tracker.log_dose(&med.id, LogStatus::Taken, None, "patient").unwrap();

    clock.set(tuesday(2, 0));
    let card = tracker.prn_status(&med.id).unwrap();
    assert!(card.doses_today.is_empty());
    assert_eq!(card.countdown.as_deref(), Some("4h 0m"));
}

#[test]
fn test_skipped_prn_does_not_gate() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(8, 0));
    let tracker = Tracker::new(&db, &clock);
    let med = tracker
        .create_medication(Medication::as_needed("Oxycodone", Some(4.0)))
        .unwrap();
    tracker.log_dose(&med.id, LogStatus::Skipped, None, "patient").unwrap();

    assert!(tracker.prn_status(&med.id).unwrap().gate.is_ready());
}

#[test]
fn test_stale_slot_still_counts_as_completed() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(8, 0));
    let tracker = Tracker::new(&db, &clock);
    let med = tracker
        .create_medication(scheduled("Metoprolol", &[(2, "08:00")]))
        .unwrap();
    tracker
        .log_dose(&med.id, LogStatus::Taken, Some("08:00"), "patient")
        .unwrap();

    // Reschedule to 09:00 after the 08:00 dose was logged.
    let update = MedicationUpdate {
        schedule: FieldUpdate::Set(vec![ScheduleEntry::new(2, "09:00")]),
        ..Default::default()
    };
    tracker.update_medication(&med.id, update).unwrap();

    let summary = tracker.today().unwrap();
    assert_eq!(summary.total_scheduled, 1);
    assert_eq!(summary.completed_count, 1);
    assert_eq!(summary.slots[0].time, "09:00");
    assert_eq!(summary.slots[0].doses[0].state, AdherenceState::Pending);
    assert!(summary.all_done);
}

#[test]
fn test_orphaned_logs_do_not_fail() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(8, 0));
    let tracker = Tracker::new(&db, &clock);
    let scheduled_med = tracker
        .create_medication(scheduled("Metoprolol", &[(2, "08:00")]))
        .unwrap();
    let prn_med = tracker
        .create_medication(Medication::as_needed("Zofran", Some(8.0)))
        .unwrap();
    tracker
        .log_dose(&scheduled_med.id, LogStatus::Taken, Some("08:00"), "patient")
        .unwrap();
    tracker.log_dose(&prn_med.id, LogStatus::Taken, None, "patient").unwrap();

    assert!(tracker.delete_medication(&scheduled_med.id).unwrap());
    assert!(tracker.delete_medication(&prn_med.id).unwrap());

    let summary = tracker.today().unwrap();
    assert!(summary.slots.is_empty());
    assert_eq!(summary.orphaned_logs, 2);
    assert_eq!(summary.completed_count, 1);
    assert_eq!(summary.prn.len(), 1);
    assert_eq!(summary.prn[0].name, None);
    assert_eq!(summary.prn[0].dosage, None);
    // Without its medication the interval is unknown.
    assert!(summary.prn[0].gate.is_ready());
}

#[test]
fn test_logs_roll_over_at_midnight() {
    let db = Database::open_in_memory().unwrap();
    let clock = FixedClock::new(tuesday(20, 0));
    let tracker = Tracker::new(&db, &clock);
    let med = tracker
        .create_medication(scheduled("Metoprolol", &[(2, "20:00"), (3, "20:00")]))
        .unwrap();
    tracker
        .log_dose(&med.id, LogStatus::Taken, Some("20:00"), "patient")
        .unwrap();

    clock.advance(Duration::days(1));
    let summary = tracker.today().unwrap();
    assert_eq!(summary.weekday, 3);
    assert_eq!(summary.slots[0].doses[0].state, AdherenceState::Pending);
    assert_eq!(summary.completed_count, 0);

    tracker
        .log_dose(&med.id, LogStatus::Taken, Some("20:00"), "patient")
        .unwrap();
    assert_eq!(tracker.todays_logs().unwrap().len(), 1);
}
