use chrono::NaiveDate;

use crate::db::models::{DbFeePayment, DbMonthlyFee};
use crate::db::store::SchoolStore;
use crate::error::SchoolError;
use crate::service::dues;
use crate::service::fee_period::FeeMonth;
use crate::types::payloads::{FeeQuery, NewMonthlyFee};

const FEE_SELECT: &str = r#"SELECT f.id, f.student_id, s.name AS student_name, f.month,
       f.payable, f.paid, f.session_id
  FROM student_monthly_fees f JOIN students s ON s.id = f.student_id"#;

impl SchoolStore {
    pub async fn list_fees(
        &self,
        school_id: i64,
        query: &FeeQuery,
    ) -> Result<Vec<DbMonthlyFee>, SchoolError> {
        let month = query.month.map(|m| m.to_string());
        let rows = sqlx::query_as::<_, DbMonthlyFee>(&format!(
            r#"{FEE_SELECT}
               WHERE s.school_id = ?
                 AND (? IS NULL OR f.month = ?)
                 AND (? IS NULL OR f.student_id = ?)
               ORDER BY f.month DESC, s.name"#
        ))
        .bind(school_id)
        .bind(month.as_deref())
        .bind(month.as_deref())
        .bind(query.student_id)
        .bind(query.student_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get_fee(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<DbMonthlyFee>, SchoolError> {
        let row = sqlx::query_as::<_, DbMonthlyFee>(&format!(
            "{FEE_SELECT} WHERE s.school_id = ? AND f.id = ?"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn create_fee(
        &self,
        school_id: i64,
        session_id: Option<i64>,
        fee: &NewMonthlyFee,
    ) -> Result<DbMonthlyFee, SchoolError> {
        if self.get_student(school_id, fee.student_id).await?.is_none() {
            return Err(SchoolError::NotFound("student"));
        }
        let id = sqlx::query(
            r#"INSERT INTO student_monthly_fees (student_id, month, payable, paid, session_id)
               VALUES (?, ?, ?, 0, ?)"#,
        )
        .bind(fee.student_id)
        .bind(fee.month.to_string())
        .bind(fee.payable)
        .bind(session_id)
        .execute(self.pool())
        .await
        .map_err(|e| match SchoolError::from(e) {
            SchoolError::Conflict(_) => SchoolError::Conflict(format!(
                "fee for student {} in {} already exists",
                fee.student_id, fee.month
            )),
            other => other,
        })?
        .last_insert_rowid();
        self.get_fee(school_id, id)
            .await?
            .ok_or(SchoolError::NotFound("fee"))
    }

    /// Creates one fee row per (student, month); existing rows are left alone.
    /// Returns the number of rows created.
    pub async fn generate_fees(
        &self,
        session_id: i64,
        months: &[FeeMonth],
        schedule: &[(i64, i64)],
    ) -> Result<u64, SchoolError> {
        let mut tx = self.pool().begin().await?;
        let mut created = 0;
        for month in months {
            let month = month.to_string();
            for &(student_id, payable) in schedule {
                created += sqlx::query(
                    r#"INSERT OR IGNORE INTO student_monthly_fees (student_id, month, payable, paid, session_id)
                       VALUES (?, ?, ?, 0, ?)"#,
                )
                .bind(student_id)
                .bind(month.as_str())
                .bind(payable)
                .bind(session_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            }
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Validates the amount against the current due and records it, all in
    /// one transaction so concurrent payments cannot overshoot.
    pub async fn record_fee_payment(
        &self,
        school_id: i64,
        fee_id: i64,
        amount: i64,
        paid_on: NaiveDate,
        received_by: i64,
    ) -> Result<DbFeePayment, SchoolError> {
        let mut tx = self.pool().begin().await?;
        let totals: Option<(i64, i64)> = sqlx::query_as(
            r#"SELECT f.payable, f.paid FROM student_monthly_fees f
               JOIN students s ON s.id = f.student_id
               WHERE s.school_id = ? AND f.id = ?"#,
        )
        .bind(school_id)
        .bind(fee_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (payable, paid) = totals.ok_or(SchoolError::NotFound("fee"))?;
        dues::validate_payment(amount, dues::due_amount(payable, paid))?;

        let id = sqlx::query(
            "INSERT INTO fee_payments (fee_id, amount, paid_on, received_by) VALUES (?, ?, ?, ?)",
        )
        .bind(fee_id)
        .bind(amount)
        .bind(paid_on)
        .bind(received_by)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        sqlx::query("UPDATE student_monthly_fees SET paid = paid + ? WHERE id = ?")
            .bind(amount)
            .bind(fee_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(DbFeePayment {
            id,
            fee_id,
            amount,
            paid_on,
            received_by,
        })
    }

    pub async fn list_fee_payments(&self, fee_id: i64) -> Result<Vec<DbFeePayment>, SchoolError> {
        let rows = sqlx::query_as::<_, DbFeePayment>(
            "SELECT id, fee_id, amount, paid_on, received_by FROM fee_payments WHERE fee_id = ? ORDER BY paid_on, id",
        )
        .bind(fee_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Sum of payable and paid over every fee row of `month`.
    pub async fn fee_totals(&self, school_id: i64, month: FeeMonth) -> Result<(i64, i64), SchoolError> {
        let totals: (i64, i64) = sqlx::query_as(
            r#"SELECT COALESCE(SUM(f.payable), 0), COALESCE(SUM(f.paid), 0)
               FROM student_monthly_fees f JOIN students s ON s.id = f.student_id
               WHERE s.school_id = ? AND f.month = ?"#,
        )
        .bind(school_id)
        .bind(month.to_string())
        .fetch_one(self.pool())
        .await?;
        Ok(totals)
    }
}
