use crate::db::models::{DbEnrollment, DbStudent};
use crate::db::store::SchoolStore;
use crate::error::SchoolError;
use crate::types::payloads::{NewEnrollment, NewStudent};

const STUDENT_COLUMNS: &str =
    "id, school_id, name, admission_no, class_id, section, monthly_fee, session_id";

impl SchoolStore {
    pub async fn list_students(&self, school_id: i64) -> Result<Vec<DbStudent>, SchoolError> {
        let rows = sqlx::query_as::<_, DbStudent>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE school_id = ? ORDER BY name, id"
        ))
        .bind(school_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get_student(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<DbStudent>, SchoolError> {
        let row = sqlx::query_as::<_, DbStudent>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE school_id = ? AND id = ?"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    /// Inserts the student and, when a current session exists, enrolls them
    /// into it with the same class and section.
    pub async fn create_student(
        &self,
        school_id: i64,
        student: &NewStudent,
    ) -> Result<DbStudent, SchoolError> {
        let current = self.current_session(school_id).await?.map(|s| s.id);
        let mut tx = self.pool().begin().await?;
        let id = sqlx::query(
            r#"INSERT INTO students (school_id, name, admission_no, class_id, section, monthly_fee, session_id)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(school_id)
        .bind(student.name.trim())
        .bind(student.admission_no.trim())
        .bind(student.class_id)
        .bind(student.section.as_deref())
        .bind(student.monthly_fee)
        .bind(current)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        if let Some(session_id) = current {
            sqlx::query(
                "INSERT INTO student_enrollments (student_id, session_id, class_id, section) VALUES (?, ?, ?, ?)",
            )
            .bind(id)
            .bind(session_id)
            .bind(student.class_id)
            .bind(student.section.as_deref())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        self.get_student(school_id, id)
            .await?
            .ok_or(SchoolError::NotFound("student"))
    }

    pub async fn update_student(
        &self,
        school_id: i64,
        id: i64,
        student: &NewStudent,
    ) -> Result<DbStudent, SchoolError> {
        let res = sqlx::query(
            r#"UPDATE students SET name = ?, admission_no = ?, class_id = ?, section = ?, monthly_fee = ?
               WHERE school_id = ? AND id = ?"#,
        )
        .bind(student.name.trim())
        .bind(student.admission_no.trim())
        .bind(student.class_id)
        .bind(student.section.as_deref())
        .bind(student.monthly_fee)
        .bind(school_id)
        .bind(id)
        .execute(self.pool())
        .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("student"));
        }
        self.get_student(school_id, id)
            .await?
            .ok_or(SchoolError::NotFound("student"))
    }

    pub async fn delete_student(&self, school_id: i64, id: i64) -> Result<(), SchoolError> {
        let res = sqlx::query("DELETE FROM students WHERE school_id = ? AND id = ?")
            .bind(school_id)
            .bind(id)
            .execute(self.pool())
            .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("student"));
        }
        Ok(())
    }

    pub async fn list_enrollments(&self, student_id: i64) -> Result<Vec<DbEnrollment>, SchoolError> {
        let rows = sqlx::query_as::<_, DbEnrollment>(
            r#"SELECT e.id, e.student_id, e.session_id, e.class_id, e.section
               FROM student_enrollments e
               JOIN academic_sessions s ON s.id = e.session_id
               WHERE e.student_id = ? ORDER BY s.start_date"#,
        )
        .bind(student_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// One enrollment per (student, session); a second attempt is a conflict.
    pub async fn create_enrollment(
        &self,
        student_id: i64,
        enrollment: &NewEnrollment,
    ) -> Result<DbEnrollment, SchoolError> {
        let id = sqlx::query(
            "INSERT INTO student_enrollments (student_id, session_id, class_id, section) VALUES (?, ?, ?, ?)",
        )
        .bind(student_id)
        .bind(enrollment.session_id)
        .bind(enrollment.class_id)
        .bind(enrollment.section.as_deref())
        .execute(self.pool())
        .await
        .map_err(|e| match SchoolError::from(e) {
            SchoolError::Conflict(_) => SchoolError::Conflict(
                "student is already enrolled in this session".to_string(),
            ),
            other => other,
        })?
        .last_insert_rowid();
        Ok(DbEnrollment {
            id,
            student_id,
            session_id: enrollment.session_id,
            class_id: enrollment.class_id,
            section: enrollment.section.clone(),
        })
    }

    /// Students enrolled in `session_id` with their monthly fee.
    pub async fn enrolled_fee_schedule(
        &self,
        session_id: i64,
    ) -> Result<Vec<(i64, i64)>, SchoolError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"SELECT st.id, st.monthly_fee FROM student_enrollments e
               JOIN students st ON st.id = e.student_id
               WHERE e.session_id = ? ORDER BY st.id"#,
        )
        .bind(session_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn count_students(&self, school_id: i64) -> Result<i64, SchoolError> {
        let n = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE school_id = ?")
            .bind(school_id)
            .fetch_one(self.pool())
            .await?;
        Ok(n)
    }
}
