//! SQL DDL for the school database (SQLite).
//!
//! `SQLITE_INIT` is the base layout. Academic sessions, enrollments and the
//! `session_id` columns are added afterwards by `db::migrate`, so databases
//! created before sessions existed upgrade through the same path as new ones.
//! Statements are split on `;`, so none may appear inside comments or literals.

pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS schools (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    school_id INTEGER NOT NULL REFERENCES schools(id),
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL CHECK (role IN ('SUPER_ADMIN', 'ADMIN', 'CASHIER')),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS classes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    school_id INTEGER NOT NULL REFERENCES schools(id),
    name TEXT NOT NULL,
    section TEXT NULL,
    UNIQUE (school_id, name, section)
);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    school_id INTEGER NOT NULL REFERENCES schools(id),
    name TEXT NOT NULL,
    admission_no TEXT NOT NULL,
    class_id INTEGER NULL REFERENCES classes(id) ON DELETE SET NULL,
    section TEXT NULL,
    monthly_fee INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (school_id, admission_no)
);

CREATE TABLE IF NOT EXISTS staff (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    school_id INTEGER NOT NULL REFERENCES schools(id),
    name TEXT NOT NULL,
    designation TEXT NOT NULL,
    phone TEXT NULL,
    salary INTEGER NOT NULL DEFAULT 0,
    joined_on TEXT NULL
);

CREATE TABLE IF NOT EXISTS attendances (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('PRESENT', 'ABSENT', 'LATE')),
    UNIQUE (student_id, date)
);

CREATE INDEX IF NOT EXISTS idx_attendances_date ON attendances(date);

CREATE TABLE IF NOT EXISTS student_monthly_fees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    month TEXT NOT NULL,
    payable INTEGER NOT NULL,
    paid INTEGER NOT NULL DEFAULT 0,
    UNIQUE (student_id, month)
);

CREATE INDEX IF NOT EXISTS idx_student_monthly_fees_month ON student_monthly_fees(month);

CREATE TABLE IF NOT EXISTS fee_payments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fee_id INTEGER NOT NULL REFERENCES student_monthly_fees(id) ON DELETE CASCADE,
    amount INTEGER NOT NULL,
    paid_on TEXT NOT NULL,
    received_by INTEGER NOT NULL REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS holidays (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    school_id INTEGER NOT NULL REFERENCES schools(id),
    name TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    reason TEXT NULL,
    created_by INTEGER NOT NULL REFERENCES users(id),
    CHECK (end_date >= start_date)
);

CREATE TABLE IF NOT EXISTS vendors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    school_id INTEGER NOT NULL REFERENCES schools(id),
    name TEXT NOT NULL,
    phone TEXT NULL,
    service TEXT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS vendor_bills (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vendor_id INTEGER NOT NULL REFERENCES vendors(id) ON DELETE CASCADE,
    amount INTEGER NOT NULL CHECK (amount > 0),
    description TEXT NULL,
    billed_on TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vendor_payments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vendor_id INTEGER NOT NULL REFERENCES vendors(id) ON DELETE CASCADE,
    amount INTEGER NOT NULL CHECK (amount > 0),
    paid_on TEXT NOT NULL,
    note TEXT NULL
)
"#;

/// Tables introduced with academic sessions.
pub const SESSION_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS academic_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    school_id INTEGER NOT NULL REFERENCES schools(id),
    name TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    is_current INTEGER NOT NULL DEFAULT 0,
    UNIQUE (school_id, name),
    CHECK (end_date >= start_date)
);

CREATE TABLE IF NOT EXISTS student_enrollments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    session_id INTEGER NOT NULL REFERENCES academic_sessions(id) ON DELETE CASCADE,
    class_id INTEGER NULL REFERENCES classes(id) ON DELETE SET NULL,
    section TEXT NULL,
    UNIQUE (student_id, session_id)
);

CREATE INDEX IF NOT EXISTS idx_student_enrollments_session ON student_enrollments(session_id)
"#;

/// Tables that gain a nullable `session_id` column during the backfill.
pub const SESSION_SCOPED_TABLES: [&str; 3] = ["students", "attendances", "student_monthly_fees"];

/// Splits a DDL bundle into executable statements.
pub fn statements(ddl: &str) -> impl Iterator<Item = &str> {
    ddl.split(';').map(str::trim).filter(|s| !s.is_empty())
}
