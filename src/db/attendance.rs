use chrono::NaiveDate;

use crate::db::models::{AttendanceStatus, DbAttendance};
use crate::db::store::SchoolStore;
use crate::error::SchoolError;
use crate::types::payloads::MarkAttendance;

impl SchoolStore {
    /// Upserts one row per record for the given day; re-marking a student
    /// overwrites the earlier status. Unknown students abort the whole batch.
    pub async fn mark_attendance(
        &self,
        school_id: i64,
        batch: &MarkAttendance,
    ) -> Result<u64, SchoolError> {
        let session_id = self.current_session(school_id).await?.map(|s| s.id);
        let mut tx = self.pool().begin().await?;
        let mut written = 0;
        for record in &batch.records {
            let known: Option<i64> =
                sqlx::query_scalar("SELECT id FROM students WHERE school_id = ? AND id = ?")
                    .bind(school_id)
                    .bind(record.student_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if known.is_none() {
                return Err(SchoolError::validation(format!(
                    "student {} does not belong to this school",
                    record.student_id
                )));
            }
            written += sqlx::query(
                r#"INSERT INTO attendances (student_id, date, status, session_id) VALUES (?, ?, ?, ?)
                   ON CONFLICT(student_id, date) DO UPDATE SET status = excluded.status"#,
            )
            .bind(record.student_id)
            .bind(batch.date)
            .bind(record.status.as_str())
            .bind(session_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    pub async fn attendance_on(
        &self,
        school_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<DbAttendance>, SchoolError> {
        let rows = sqlx::query_as::<_, DbAttendance>(
            r#"SELECT a.id, a.student_id, a.date, a.status, a.session_id
               FROM attendances a JOIN students s ON s.id = a.student_id
               WHERE s.school_id = ? AND a.date = ? ORDER BY a.student_id"#,
        )
        .bind(school_id)
        .bind(date)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Every mark of one student inside `[from, to]`, oldest first.
    pub async fn attendance_marks(
        &self,
        student_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(NaiveDate, AttendanceStatus)>, SchoolError> {
        let rows: Vec<(NaiveDate, String)> = sqlx::query_as(
            r#"SELECT date, status FROM attendances
               WHERE student_id = ? AND date BETWEEN ? AND ? ORDER BY date"#,
        )
        .bind(student_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter()
            .map(|(date, status)| {
                status
                    .parse::<AttendanceStatus>()
                    .map(|s| (date, s))
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)).into())
            })
            .collect()
    }
}
