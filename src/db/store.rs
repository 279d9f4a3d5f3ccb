use crate::config::SchoolConfig;
use crate::db::migrate::{self, MigrationReport};
use crate::db::schema::{self, SQLITE_INIT};
use crate::error::SchoolError;
use crate::service::access::Role;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Id of the school every single-tenant deployment runs under.
pub const DEFAULT_SCHOOL_ID: i64 = 1;

/// Cheap-to-clone handle over the connection pool. Resource-specific queries
/// live in sibling modules as further `impl SchoolStore` blocks.
#[derive(Clone)]
pub struct SchoolStore {
    pool: SqlitePool,
}

impl SchoolStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the base schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), SchoolError> {
        // sqlx::query runs one statement at a time
        for stmt in schema::statements(SQLITE_INIT) {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn ensure_school(&self, name: &str) -> Result<(), SchoolError> {
        sqlx::query("INSERT OR IGNORE INTO schools (id, name) VALUES (?, ?)")
            .bind(DEFAULT_SCHOOL_ID)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Creates the first SUPER_ADMIN when the school has no users yet.
    /// Returns the new user's id, or `None` if users already exist.
    pub async fn ensure_bootstrap_admin(
        &self,
        name: &str,
        email: &str,
    ) -> Result<Option<i64>, SchoolError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE school_id = ?")
            .bind(DEFAULT_SCHOOL_ID)
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Ok(None);
        }
        let id = sqlx::query("INSERT INTO users (school_id, name, email, role) VALUES (?, ?, ?, ?)")
            .bind(DEFAULT_SCHOOL_ID)
            .bind(name)
            .bind(email)
            .bind(Role::SuperAdmin.as_str())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        info!(user_id = id, email, "bootstrap super admin created");
        Ok(Some(id))
    }
}

/// Opens (creating if missing) the database, applies the base schema, runs
/// the session backfill and seeds the school and its first admin.
pub async fn spawn(database_url: &str, school: &SchoolConfig) -> Result<SchoolStore, SchoolError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    let store = SchoolStore::new(pool);

    store.init_schema().await?;
    store.ensure_school(&school.name).await?;
    let report = migrate::run(&store, DEFAULT_SCHOOL_ID, &school.default_session).await?;
    log_report(&report);
    store
        .ensure_bootstrap_admin(&school.bootstrap_admin_name, &school.bootstrap_admin_email)
        .await?;
    Ok(store)
}

pub fn log_report(report: &MigrationReport) {
    if report.is_noop() {
        info!(session_id = report.session_id, "session backfill already applied");
    } else {
        info!(
            session_id = report.session_id,
            columns_added = report.columns_added.len(),
            session_created = report.session_created,
            students = report.students_backfilled,
            attendances = report.attendances_backfilled,
            fees = report.fees_backfilled,
            enrollments = report.enrollments_created,
            "session backfill applied"
        );
    }
}
