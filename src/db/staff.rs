use crate::db::models::DbStaff;
use crate::db::store::SchoolStore;
use crate::error::SchoolError;
use crate::types::payloads::NewStaff;

impl SchoolStore {
    pub async fn list_staff(&self, school_id: i64) -> Result<Vec<DbStaff>, SchoolError> {
        let rows = sqlx::query_as::<_, DbStaff>(
            r#"SELECT id, school_id, name, designation, phone, salary, joined_on
               FROM staff WHERE school_id = ? ORDER BY name, id"#,
        )
        .bind(school_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn create_staff(&self, school_id: i64, staff: &NewStaff) -> Result<DbStaff, SchoolError> {
        let id = sqlx::query(
            r#"INSERT INTO staff (school_id, name, designation, phone, salary, joined_on)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(school_id)
        .bind(staff.name.trim())
        .bind(staff.designation.trim())
        .bind(staff.phone.as_deref())
        .bind(staff.salary)
        .bind(staff.joined_on)
        .execute(self.pool())
        .await?
        .last_insert_rowid();
        Ok(Self::staff_row(id, school_id, staff))
    }

    pub async fn update_staff(
        &self,
        school_id: i64,
        id: i64,
        staff: &NewStaff,
    ) -> Result<DbStaff, SchoolError> {
        let res = sqlx::query(
            r#"UPDATE staff SET name = ?, designation = ?, phone = ?, salary = ?, joined_on = ?
               WHERE school_id = ? AND id = ?"#,
        )
        .bind(staff.name.trim())
        .bind(staff.designation.trim())
        .bind(staff.phone.as_deref())
        .bind(staff.salary)
        .bind(staff.joined_on)
        .bind(school_id)
        .bind(id)
        .execute(self.pool())
        .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("staff member"));
        }
        Ok(Self::staff_row(id, school_id, staff))
    }

    pub async fn delete_staff(&self, school_id: i64, id: i64) -> Result<(), SchoolError> {
        let res = sqlx::query("DELETE FROM staff WHERE school_id = ? AND id = ?")
            .bind(school_id)
            .bind(id)
            .execute(self.pool())
            .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("staff member"));
        }
        Ok(())
    }

    pub async fn count_staff(&self, school_id: i64) -> Result<i64, SchoolError> {
        let n = sqlx::query_scalar("SELECT COUNT(*) FROM staff WHERE school_id = ?")
            .bind(school_id)
            .fetch_one(self.pool())
            .await?;
        Ok(n)
    }

    fn staff_row(id: i64, school_id: i64, staff: &NewStaff) -> DbStaff {
        DbStaff {
            id,
            school_id,
            name: staff.name.trim().to_string(),
            designation: staff.designation.trim().to_string(),
            phone: staff.phone.clone(),
            salary: staff.salary,
            joined_on: staff.joined_on,
        }
    }
}
