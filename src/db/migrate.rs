//! Session/enrollment backfill.
//!
//! Brings a database created before academic sessions existed up to the
//! session-aware layout and fills the new foreign keys on existing rows.
//! Every step is guarded so the whole procedure can run on each startup:
//! tables use `IF NOT EXISTS`, column additions treat "duplicate column" as
//! already applied, and row inserts use `INSERT OR IGNORE`.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SessionSeed;
use crate::db::schema::{self, SESSION_SCOPED_TABLES, SESSION_TABLES};
use crate::db::store::SchoolStore;
use crate::error::SchoolError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub session_id: i64,
    pub session_created: bool,
    pub columns_added: Vec<&'static str>,
    pub students_backfilled: u64,
    pub attendances_backfilled: u64,
    pub fees_backfilled: u64,
    pub enrollments_created: u64,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        !self.session_created
            && self.columns_added.is_empty()
            && self.students_backfilled == 0
            && self.attendances_backfilled == 0
            && self.fees_backfilled == 0
            && self.enrollments_created == 0
    }
}

fn is_duplicate_column(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.message().contains("duplicate column"))
}

fn fatal(step: &str, err: sqlx::Error) -> SchoolError {
    SchoolError::Migration(format!("{step}: {err}"))
}

pub async fn run(
    store: &SchoolStore,
    school_id: i64,
    seed: &SessionSeed,
) -> Result<MigrationReport, SchoolError> {
    if seed.end_date < seed.start_date {
        return Err(SchoolError::Migration(format!(
            "default session `{}` ends before it starts",
            seed.name
        )));
    }
    let pool = store.pool();
    let mut report = MigrationReport::default();

    for stmt in schema::statements(SESSION_TABLES) {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| fatal("create session tables", e))?;
    }

    for table in SESSION_SCOPED_TABLES {
        let ddl = format!(
            "ALTER TABLE {table} ADD COLUMN session_id INTEGER NULL REFERENCES academic_sessions(id)"
        );
        match sqlx::query(&ddl).execute(pool).await {
            Ok(_) => {
                info!(table, "added session_id column");
                report.columns_added.push(table);
            }
            Err(e) if is_duplicate_column(&e) => {
                debug!(table, "session_id column already present");
            }
            Err(e) => return Err(fatal("add session_id column", e)),
        }
    }

    let mut tx = pool.begin().await.map_err(|e| fatal("begin", e))?;

    report.session_created = sqlx::query(
        "INSERT OR IGNORE INTO academic_sessions (school_id, name, start_date, end_date) VALUES (?, ?, ?, ?)",
    )
    .bind(school_id)
    .bind(&seed.name)
    .bind(seed.start_date)
    .bind(seed.end_date)
    .execute(&mut *tx)
    .await
    .map_err(|e| fatal("seed default session", e))?
    .rows_affected()
        > 0;

    let session_id: i64 =
        sqlx::query_scalar("SELECT id FROM academic_sessions WHERE school_id = ? AND name = ?")
            .bind(school_id)
            .bind(&seed.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| fatal("load default session", e))?;
    report.session_id = session_id;

    sqlx::query(
        r#"UPDATE academic_sessions SET is_current = 1
           WHERE id = ? AND NOT EXISTS (
               SELECT 1 FROM academic_sessions WHERE school_id = ? AND is_current = 1
           )"#,
    )
    .bind(session_id)
    .bind(school_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| fatal("mark current session", e))?;

    report.students_backfilled =
        sqlx::query("UPDATE students SET session_id = ? WHERE session_id IS NULL AND school_id = ?")
            .bind(session_id)
            .bind(school_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| fatal("backfill students", e))?
            .rows_affected();

    report.attendances_backfilled = sqlx::query(
        r#"UPDATE attendances SET session_id = ?
           WHERE session_id IS NULL
             AND student_id IN (SELECT id FROM students WHERE school_id = ?)"#,
    )
    .bind(session_id)
    .bind(school_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| fatal("backfill attendances", e))?
    .rows_affected();

    report.fees_backfilled = sqlx::query(
        r#"UPDATE student_monthly_fees SET session_id = ?
           WHERE session_id IS NULL
             AND student_id IN (SELECT id FROM students WHERE school_id = ?)"#,
    )
    .bind(session_id)
    .bind(school_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| fatal("backfill monthly fees", e))?
    .rows_affected();

    report.enrollments_created = sqlx::query(
        r#"INSERT OR IGNORE INTO student_enrollments (student_id, session_id, class_id, section)
           SELECT id, session_id, class_id, section FROM students
           WHERE school_id = ? AND session_id IS NOT NULL"#,
    )
    .bind(school_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| fatal("backfill enrollments", e))?
    .rows_affected();

    tx.commit().await.map_err(|e| fatal("commit", e))?;
    Ok(report)
}
