//! SQLite schema definition.

/// Complete database schema for care-flow.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    age INTEGER,
    gender TEXT,
    phone_number TEXT,
    address TEXT,
    nida_number TEXT,
    current_department TEXT NOT NULL DEFAULT 'Reception' CHECK (current_department IN (
        'Reception', 'Consultation', 'Laboratory', 'Pharmacy', 'Billing', 'Discharged'
    )),
    department_since TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_department ON patients(current_department, department_since);
CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(full_name);

-- ============================================================================
-- Clinical Records (Append-Only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS consultations (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    chief_complaint TEXT NOT NULL,
    diagnosis TEXT,
    prescription TEXT,
    notes TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_consultations_patient ON consultations(patient_id);

CREATE TABLE IF NOT EXISTS lab_results (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    test_name TEXT NOT NULL,
    result_value TEXT NOT NULL DEFAULT '',
    cost INTEGER NOT NULL CHECK (cost >= 0),       -- price snapshot, not a reference
    status TEXT NOT NULL DEFAULT 'completed',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_lab_results_patient ON lab_results(patient_id);

CREATE TABLE IF NOT EXISTS vitals (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    systolic INTEGER CHECK (systolic > 0),          -- mmHg
    diastolic INTEGER CHECK (diastolic > 0),        -- mmHg
    heart_rate INTEGER CHECK (heart_rate > 0),      -- bpm
    temperature REAL CHECK (temperature > 0),       -- degrees Celsius
    weight REAL CHECK (weight > 0),                 -- kg
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_vitals_patient ON vitals(patient_id);

-- ============================================================================
-- Invoices
-- ============================================================================

CREATE TABLE IF NOT EXISTS invoices (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    amount INTEGER NOT NULL CHECK (amount >= 0),
    status TEXT NOT NULL DEFAULT 'unpaid' CHECK (status IN ('unpaid', 'paid')),
    description TEXT NOT NULL,
    source TEXT NOT NULL,                           -- lab_test, dispensing, consultation, manual
    payment_method TEXT,
    created_at TEXT NOT NULL,
    paid_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_invoices_patient ON invoices(patient_id, status);
CREATE INDEX IF NOT EXISTS idx_invoices_status ON invoices(status);

-- Paid invoices are final
CREATE TRIGGER IF NOT EXISTS invoices_paid_is_final BEFORE UPDATE OF status ON invoices
WHEN old.status = 'paid'
BEGIN
    SELECT RAISE(ABORT, 'Paid invoices cannot change status');
END;

-- ============================================================================
-- Inventory
-- ============================================================================

CREATE TABLE IF NOT EXISTS inventory (
    id TEXT PRIMARY KEY,
    item_name TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'Tablet',
    stock_quantity INTEGER NOT NULL DEFAULT 0 CHECK (stock_quantity >= 0),
    unit_price INTEGER NOT NULL DEFAULT 0 CHECK (unit_price >= 0),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_inventory_name ON inventory(item_name);

-- Stock ledger (Append-Only)
CREATE TABLE IF NOT EXISTS stock_movements (
    id TEXT PRIMARY KEY,
    item_id TEXT NOT NULL REFERENCES inventory(id),
    delta INTEGER NOT NULL CHECK (delta != 0),
    reason TEXT NOT NULL CHECK (reason IN ('dispensed', 'restock', 'expired', 'damaged', 'correction')),
    resulting_quantity INTEGER NOT NULL CHECK (resulting_quantity >= 0),
    patient_id TEXT REFERENCES patients(id),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_stock_movements_item ON stock_movements(item_id);

-- ============================================================================
-- Service Catalog (Reference Data)
-- ============================================================================

CREATE TABLE IF NOT EXISTS lab_services (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    price INTEGER NOT NULL CHECK (price >= 0),
    kind TEXT NOT NULL CHECK (kind IN ('lab_test', 'drug')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_lab_services_name ON lab_services(kind, name COLLATE NOCASE);
"#;
