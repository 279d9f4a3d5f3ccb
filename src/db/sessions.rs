use crate::db::models::{DbClass, DbSession};
use crate::db::store::SchoolStore;
use crate::error::SchoolError;
use crate::types::payloads::{NewClass, NewSession};

const SESSION_COLUMNS: &str = "id, school_id, name, start_date, end_date, is_current";

impl SchoolStore {
    pub async fn list_sessions(&self, school_id: i64) -> Result<Vec<DbSession>, SchoolError> {
        let rows = sqlx::query_as::<_, DbSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM academic_sessions WHERE school_id = ? ORDER BY start_date DESC"
        ))
        .bind(school_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get_session(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<DbSession>, SchoolError> {
        let row = sqlx::query_as::<_, DbSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM academic_sessions WHERE school_id = ? AND id = ?"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn current_session(&self, school_id: i64) -> Result<Option<DbSession>, SchoolError> {
        let row = sqlx::query_as::<_, DbSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM academic_sessions WHERE school_id = ? AND is_current = 1"
        ))
        .bind(school_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn create_session(
        &self,
        school_id: i64,
        session: &NewSession,
    ) -> Result<DbSession, SchoolError> {
        let id = sqlx::query(
            "INSERT INTO academic_sessions (school_id, name, start_date, end_date) VALUES (?, ?, ?, ?)",
        )
        .bind(school_id)
        .bind(session.name.trim())
        .bind(session.start_date)
        .bind(session.end_date)
        .execute(self.pool())
        .await?
        .last_insert_rowid();
        self.get_session(school_id, id)
            .await?
            .ok_or(SchoolError::NotFound("session"))
    }

    /// Makes `id` the only current session of the school.
    pub async fn set_current_session(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<DbSession, SchoolError> {
        let mut tx = self.pool().begin().await?;
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM academic_sessions WHERE school_id = ? AND id = ?")
                .bind(school_id)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(SchoolError::NotFound("session"));
        }
        sqlx::query("UPDATE academic_sessions SET is_current = (id = ?) WHERE school_id = ?")
            .bind(id)
            .bind(school_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        self.get_session(school_id, id)
            .await?
            .ok_or(SchoolError::NotFound("session"))
    }

    pub async fn list_classes(&self, school_id: i64) -> Result<Vec<DbClass>, SchoolError> {
        let rows = sqlx::query_as::<_, DbClass>(
            "SELECT id, school_id, name, section FROM classes WHERE school_id = ? ORDER BY name, section",
        )
        .bind(school_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn create_class(&self, school_id: i64, class: &NewClass) -> Result<DbClass, SchoolError> {
        let id = sqlx::query("INSERT INTO classes (school_id, name, section) VALUES (?, ?, ?)")
            .bind(school_id)
            .bind(class.name.trim())
            .bind(class.section.as_deref())
            .execute(self.pool())
            .await?
            .last_insert_rowid();
        Ok(DbClass {
            id,
            school_id,
            name: class.name.trim().to_string(),
            section: class.section.clone(),
        })
    }
}
