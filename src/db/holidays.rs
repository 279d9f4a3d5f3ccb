use chrono::NaiveDate;

use crate::db::models::DbHoliday;
use crate::db::store::SchoolStore;
use crate::error::SchoolError;
use crate::types::payloads::NewHoliday;

const HOLIDAY_COLUMNS: &str = "id, school_id, name, start_date, end_date, reason, created_by";

impl SchoolStore {
    pub async fn list_holidays(&self, school_id: i64) -> Result<Vec<DbHoliday>, SchoolError> {
        let rows = sqlx::query_as::<_, DbHoliday>(&format!(
            "SELECT {HOLIDAY_COLUMNS} FROM holidays WHERE school_id = ? ORDER BY start_date"
        ))
        .bind(school_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Holidays that touch the inclusive window `[from, to]`.
    pub async fn holidays_between(
        &self,
        school_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DbHoliday>, SchoolError> {
        let rows = sqlx::query_as::<_, DbHoliday>(&format!(
            r#"SELECT {HOLIDAY_COLUMNS} FROM holidays
               WHERE school_id = ? AND start_date <= ? AND end_date >= ?
               ORDER BY start_date"#
        ))
        .bind(school_id)
        .bind(to)
        .bind(from)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get_holiday(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<DbHoliday>, SchoolError> {
        let row = sqlx::query_as::<_, DbHoliday>(&format!(
            "SELECT {HOLIDAY_COLUMNS} FROM holidays WHERE school_id = ? AND id = ?"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn create_holiday(
        &self,
        school_id: i64,
        created_by: i64,
        holiday: &NewHoliday,
    ) -> Result<DbHoliday, SchoolError> {
        let id = sqlx::query(
            r#"INSERT INTO holidays (school_id, name, start_date, end_date, reason, created_by)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(school_id)
        .bind(holiday.name.trim())
        .bind(holiday.start_date)
        .bind(holiday.end_date)
        .bind(holiday.reason.as_deref())
        .bind(created_by)
        .execute(self.pool())
        .await?
        .last_insert_rowid();
        self.get_holiday(school_id, id)
            .await?
            .ok_or(SchoolError::NotFound("holiday"))
    }

    pub async fn update_holiday(
        &self,
        school_id: i64,
        id: i64,
        holiday: &NewHoliday,
    ) -> Result<DbHoliday, SchoolError> {
        let res = sqlx::query(
            r#"UPDATE holidays SET name = ?, start_date = ?, end_date = ?, reason = ?
               WHERE school_id = ? AND id = ?"#,
        )
        .bind(holiday.name.trim())
        .bind(holiday.start_date)
        .bind(holiday.end_date)
        .bind(holiday.reason.as_deref())
        .bind(school_id)
        .bind(id)
        .execute(self.pool())
        .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("holiday"));
        }
        self.get_holiday(school_id, id)
            .await?
            .ok_or(SchoolError::NotFound("holiday"))
    }

    pub async fn delete_holiday(&self, school_id: i64, id: i64) -> Result<(), SchoolError> {
        let res = sqlx::query("DELETE FROM holidays WHERE school_id = ? AND id = ?")
            .bind(school_id)
            .bind(id)
            .execute(self.pool())
            .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("holiday"));
        }
        Ok(())
    }
}
