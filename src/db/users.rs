use crate::db::models::DbUser;
use crate::db::store::SchoolStore;
use crate::error::SchoolError;
use crate::types::payloads::NewUser;

const USER_COLUMNS: &str = "id, school_id, name, email, role, created_at";

impl SchoolStore {
    pub async fn get_user(&self, id: i64) -> Result<Option<DbUser>, SchoolError> {
        let user = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    pub async fn list_users(&self, school_id: i64) -> Result<Vec<DbUser>, SchoolError> {
        let users = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE school_id = ? ORDER BY id"
        ))
        .bind(school_id)
        .fetch_all(self.pool())
        .await?;
        Ok(users)
    }

    pub async fn create_user(&self, school_id: i64, user: &NewUser) -> Result<DbUser, SchoolError> {
        let id = sqlx::query("INSERT INTO users (school_id, name, email, role) VALUES (?, ?, ?, ?)")
            .bind(school_id)
            .bind(user.name.trim())
            .bind(user.email.trim().to_lowercase())
            .bind(user.role.as_str())
            .execute(self.pool())
            .await?
            .last_insert_rowid();
        self.get_user(id).await?.ok_or(SchoolError::NotFound("user"))
    }

    pub async fn update_user(&self, id: i64, user: &NewUser) -> Result<DbUser, SchoolError> {
        let res = sqlx::query("UPDATE users SET name = ?, email = ?, role = ? WHERE id = ?")
            .bind(user.name.trim())
            .bind(user.email.trim().to_lowercase())
            .bind(user.role.as_str())
            .bind(id)
            .execute(self.pool())
            .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("user"));
        }
        self.get_user(id).await?.ok_or(SchoolError::NotFound("user"))
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), SchoolError> {
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("user"));
        }
        Ok(())
    }
}
