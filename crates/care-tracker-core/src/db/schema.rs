//! SQLite schema definition.

/// Complete database schema for the care tracker.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medications
-- ============================================================================

CREATE TABLE IF NOT EXISTS medications (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    dosage TEXT,
    purpose TEXT,
    notes TEXT,
    is_prn INTEGER NOT NULL DEFAULT 0,
    schedule TEXT NOT NULL DEFAULT '[]',          -- JSON array of {weekday, time}
    min_hours_between REAL,
    take_with_food INTEGER NOT NULL DEFAULT 0,
    interactions TEXT NOT NULL DEFAULT '[]',      -- JSON array of strings
    key_notes TEXT NOT NULL DEFAULT '[]',         -- JSON array of strings
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK (min_hours_between IS NULL OR min_hours_between > 0),
    CHECK (is_prn = 1 OR min_hours_between IS NULL)
);

CREATE INDEX IF NOT EXISTS idx_medications_name ON medications(name);

-- ============================================================================
-- Medication Logs
-- ============================================================================

-- No foreign key: logs outlive a deleted medication.
CREATE TABLE IF NOT EXISTS medication_logs (
    id TEXT PRIMARY KEY,
    medication_id TEXT NOT NULL,
    scheduled_time TEXT,                          -- HH:MM, NULL for as-needed doses
    status TEXT NOT NULL CHECK (status IN ('taken', 'skipped')),
    logged_by TEXT NOT NULL,
    logged_at TEXT NOT NULL,
    log_date TEXT NOT NULL,                       -- YYYY-MM-DD of the obligation
    notes TEXT
);

-- One row per slot per day. NULL slots are distinct, so as-needed logs append.
CREATE UNIQUE INDEX IF NOT EXISTS idx_logs_slot
    ON medication_logs(medication_id, scheduled_time, log_date);
CREATE INDEX IF NOT EXISTS idx_logs_date ON medication_logs(log_date);
CREATE INDEX IF NOT EXISTS idx_logs_taken ON medication_logs(medication_id, status, logged_at);

-- ============================================================================
-- Feeling Check-ins
-- ============================================================================

CREATE TABLE IF NOT EXISTS feeling_checkins (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    period TEXT NOT NULL CHECK (period IN ('morning', 'afternoon', 'evening')),
    pain_level INTEGER NOT NULL CHECK (pain_level BETWEEN 1 AND 10),
    mood_level INTEGER NOT NULL CHECK (mood_level BETWEEN 1 AND 10),
    energy_level INTEGER NOT NULL CHECK (energy_level BETWEEN 1 AND 10),
    notes TEXT,
    checkin_date TEXT NOT NULL,
    UNIQUE (user_id, period, checkin_date)
);

-- ============================================================================
-- Care Tasks
-- ============================================================================

CREATE TABLE IF NOT EXISTS care_tasks (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    assigned_to TEXT NOT NULL,
    assigned_by TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'completed')),
    created_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_tasks_status ON care_tasks(status);

-- ============================================================================
-- Care Activities
-- ============================================================================

CREATE TABLE IF NOT EXISTS care_activities (
    id TEXT PRIMARY KEY,
    category TEXT NOT NULL,
    description TEXT NOT NULL,
    logged_by TEXT NOT NULL,
    notes TEXT,
    activity_time TEXT NOT NULL,
    activity_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_activities_date ON care_activities(activity_date);

CREATE TABLE IF NOT EXISTS doctor_contacts (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    specialty TEXT,
    is_emergency INTEGER NOT NULL DEFAULT 0,
    created_by TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- ============================================================================
-- Change Log (polled by the realtime delivery collaborator)
-- ============================================================================

CREATE TABLE IF NOT EXISTS sync_log (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT NOT NULL,
    record_id TEXT NOT NULL,
    action TEXT NOT NULL CHECK (action IN ('INSERT', 'UPDATE', 'DELETE')),
    changed_by TEXT,
    changed_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    payload TEXT                                  -- JSON object
);

CREATE TRIGGER IF NOT EXISTS medication_logs_sync_ai AFTER INSERT ON medication_logs BEGIN
    INSERT INTO sync_log (table_name, record_id, action, changed_by, payload)
    VALUES ('medication_logs', new.id, 'INSERT', new.logged_by,
            json_object('medication_id', new.medication_id,
                        'scheduled_time', new.scheduled_time,
                        'status', new.status,
                        'log_date', new.log_date));
END;

CREATE TRIGGER IF NOT EXISTS medication_logs_sync_au AFTER UPDATE ON medication_logs BEGIN
    INSERT INTO sync_log (table_name, record_id, action, changed_by, payload)
    VALUES ('medication_logs', new.id, 'UPDATE', new.logged_by,
            json_object('medication_id', new.medication_id,
                        'scheduled_time', new.scheduled_time,
                        'status', new.status,
                        'log_date', new.log_date));
END;

CREATE TRIGGER IF NOT EXISTS medication_logs_sync_ad AFTER DELETE ON medication_logs BEGIN
    INSERT INTO sync_log (table_name, record_id, action, changed_by, payload)
    VALUES ('medication_logs', old.id, 'DELETE', NULL,
            json_object('medication_id', old.medication_id,
                        'scheduled_time', old.scheduled_time,
                        'log_date', old.log_date));
END;

CREATE TRIGGER IF NOT EXISTS medications_sync_ai AFTER INSERT ON medications BEGIN
    INSERT INTO sync_log (table_name, record_id, action, payload)
    VALUES ('medications', new.id, 'INSERT', json_object('name', new.name));
END;

CREATE TRIGGER IF NOT EXISTS medications_sync_au AFTER UPDATE ON medications BEGIN
    INSERT INTO sync_log (table_name, record_id, action, payload)
    VALUES ('medications', new.id, 'UPDATE', json_object('name', new.name));
END;

CREATE TRIGGER IF NOT EXISTS medications_sync_ad AFTER DELETE ON medications BEGIN
    INSERT INTO sync_log (table_name, record_id, action, payload)
    VALUES ('medications', old.id, 'DELETE', json_object('name', old.name));
END;
"#;
