use chrono::NaiveDate;

use crate::db::models::{DbVendor, DbVendorBill, DbVendorPayment, DbVendorTotals};
use crate::db::store::SchoolStore;
use crate::error::SchoolError;
use crate::service::dues;
use crate::types::payloads::{NewVendor, NewVendorBill};

const VENDOR_TOTALS_SELECT: &str = r#"SELECT v.id, v.school_id, v.name, v.phone, v.service,
       (SELECT COALESCE(SUM(b.amount), 0) FROM vendor_bills b WHERE b.vendor_id = v.id) AS total_bills,
       (SELECT COALESCE(SUM(p.amount), 0) FROM vendor_payments p WHERE p.vendor_id = v.id) AS total_payments
  FROM vendors v"#;

impl SchoolStore {
    pub async fn list_vendors(&self, school_id: i64) -> Result<Vec<DbVendorTotals>, SchoolError> {
        let rows = sqlx::query_as::<_, DbVendorTotals>(&format!(
            "{VENDOR_TOTALS_SELECT} WHERE v.school_id = ? ORDER BY v.name, v.id"
        ))
        .bind(school_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get_vendor(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<DbVendorTotals>, SchoolError> {
        let row = sqlx::query_as::<_, DbVendorTotals>(&format!(
            "{VENDOR_TOTALS_SELECT} WHERE v.school_id = ? AND v.id = ?"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn create_vendor(&self, school_id: i64, vendor: &NewVendor) -> Result<DbVendor, SchoolError> {
        let id = sqlx::query("INSERT INTO vendors (school_id, name, phone, service) VALUES (?, ?, ?, ?)")
            .bind(school_id)
            .bind(vendor.name.trim())
            .bind(vendor.phone.as_deref())
            .bind(vendor.service.as_deref())
            .execute(self.pool())
            .await?
            .last_insert_rowid();
        Ok(DbVendor {
            id,
            school_id,
            name: vendor.name.trim().to_string(),
            phone: vendor.phone.clone(),
            service: vendor.service.clone(),
        })
    }

    pub async fn update_vendor(
        &self,
        school_id: i64,
        id: i64,
        vendor: &NewVendor,
    ) -> Result<DbVendor, SchoolError> {
        let res = sqlx::query(
            "UPDATE vendors SET name = ?, phone = ?, service = ? WHERE school_id = ? AND id = ?",
        )
        .bind(vendor.name.trim())
        .bind(vendor.phone.as_deref())
        .bind(vendor.service.as_deref())
        .bind(school_id)
        .bind(id)
        .execute(self.pool())
        .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("vendor"));
        }
        Ok(DbVendor {
            id,
            school_id,
            name: vendor.name.trim().to_string(),
            phone: vendor.phone.clone(),
            service: vendor.service.clone(),
        })
    }

    pub async fn delete_vendor(&self, school_id: i64, id: i64) -> Result<(), SchoolError> {
        let res = sqlx::query("DELETE FROM vendors WHERE school_id = ? AND id = ?")
            .bind(school_id)
            .bind(id)
            .execute(self.pool())
            .await?;
        if res.rows_affected() == 0 {
            return Err(SchoolError::NotFound("vendor"));
        }
        Ok(())
    }

    pub async fn add_vendor_bill(
        &self,
        school_id: i64,
        vendor_id: i64,
        bill: &NewVendorBill,
        billed_on: NaiveDate,
    ) -> Result<DbVendorBill, SchoolError> {
        if self.get_vendor(school_id, vendor_id).await?.is_none() {
            return Err(SchoolError::NotFound("vendor"));
        }
        let id = sqlx::query(
            "INSERT INTO vendor_bills (vendor_id, amount, description, billed_on) VALUES (?, ?, ?, ?)",
        )
        .bind(vendor_id)
        .bind(bill.amount)
        .bind(bill.description.as_deref())
        .bind(billed_on)
        .execute(self.pool())
        .await?
        .last_insert_rowid();
        Ok(DbVendorBill {
            id,
            vendor_id,
            amount: bill.amount,
            description: bill.description.clone(),
            billed_on,
        })
    }

    /// Checks `amount` against bills minus payments and inserts it inside the
    /// same transaction.
    pub async fn record_vendor_payment(
        &self,
        school_id: i64,
        vendor_id: i64,
        amount: i64,
        paid_on: NaiveDate,
        note: Option<&str>,
    ) -> Result<DbVendorPayment, SchoolError> {
        let mut tx = self.pool().begin().await?;
        let totals = sqlx::query_as::<_, DbVendorTotals>(&format!(
            "{VENDOR_TOTALS_SELECT} WHERE v.school_id = ? AND v.id = ?"
        ))
        .bind(school_id)
        .bind(vendor_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SchoolError::NotFound("vendor"))?;
        dues::validate_payment(
            amount,
            dues::due_amount(totals.total_bills, totals.total_payments),
        )?;

        let id = sqlx::query(
            "INSERT INTO vendor_payments (vendor_id, amount, paid_on, note) VALUES (?, ?, ?, ?)",
        )
        .bind(vendor_id)
        .bind(amount)
        .bind(paid_on)
        .bind(note)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        tx.commit().await?;

        Ok(DbVendorPayment {
            id,
            vendor_id,
            amount,
            paid_on,
            note: note.map(str::to_string),
        })
    }

    pub async fn list_vendor_bills(&self, vendor_id: i64) -> Result<Vec<DbVendorBill>, SchoolError> {
        let rows = sqlx::query_as::<_, DbVendorBill>(
            "SELECT id, vendor_id, amount, description, billed_on FROM vendor_bills WHERE vendor_id = ? ORDER BY billed_on, id",
        )
        .bind(vendor_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn list_vendor_payments(
        &self,
        vendor_id: i64,
    ) -> Result<Vec<DbVendorPayment>, SchoolError> {
        let rows = sqlx::query_as::<_, DbVendorPayment>(
            "SELECT id, vendor_id, amount, paid_on, note FROM vendor_payments WHERE vendor_id = ? ORDER BY paid_on, id",
        )
        .bind(vendor_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
