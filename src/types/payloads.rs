//! Request bodies and query strings accepted by the API.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::models::AttendanceStatus;
use crate::error::SchoolError;
use crate::service::access::Role;
use crate::service::fee_period::FeeMonth;
use crate::service::holiday_calendar::DateRange;

fn require_text(field: &str, value: &str) -> Result<(), SchoolError> {
    if value.trim().is_empty() {
        return Err(SchoolError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_range(start: NaiveDate, end: NaiveDate) -> Result<DateRange, SchoolError> {
    DateRange::new(start, end)
        .ok_or_else(|| SchoolError::validation("end date must not be before start date"))
}

/// Largest single amount accepted, in the smallest currency unit. Keeps
/// ledger sums far away from `i64` overflow.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

fn require_at_most_max(field: &str, value: i64) -> Result<(), SchoolError> {
    if value > MAX_AMOUNT {
        return Err(SchoolError::validation(format!(
            "{field} must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: i64) -> Result<(), SchoolError> {
    if value < 0 {
        return Err(SchoolError::validation(format!("{field} must not be negative")));
    }
    require_at_most_max(field, value)
}

fn require_positive(field: &str, value: i64) -> Result<(), SchoolError> {
    if value <= 0 {
        return Err(SchoolError::validation(format!(
            "{field} must be greater than zero"
        )));
    }
    require_at_most_max(field, value)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), SchoolError> {
        require_text("name", &self.name)?;
        if !self.email.contains('@') {
            return Err(SchoolError::validation("email is not valid"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewSession {
    pub fn validate(&self) -> Result<DateRange, SchoolError> {
        require_text("name", &self.name)?;
        require_range(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub name: String,
    #[serde(default)]
    pub section: Option<String>,
}

impl NewClass {
    pub fn validate(&self) -> Result<(), SchoolError> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub admission_no: String,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub monthly_fee: i64,
}

impl NewStudent {
    pub fn validate(&self) -> Result<(), SchoolError> {
        require_text("name", &self.name)?;
        require_text("admissionNo", &self.admission_no)?;
        require_non_negative("monthlyFee", self.monthly_fee)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEnrollment {
    pub session_id: i64,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub section: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    pub name: String,
    pub designation: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub salary: i64,
    #[serde(default)]
    pub joined_on: Option<NaiveDate>,
}

impl NewStaff {
    pub fn validate(&self) -> Result<(), SchoolError> {
        require_text("name", &self.name)?;
        require_text("designation", &self.designation)?;
        require_non_negative("salary", self.salary)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendance {
    pub date: NaiveDate,
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummaryQuery {
    pub student_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHoliday {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

impl NewHoliday {
    pub fn validate(&self) -> Result<DateRange, SchoolError> {
        require_text("name", &self.name)?;
        require_range(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMonthlyFee {
    pub student_id: i64,
    pub month: FeeMonth,
    pub payable: i64,
}

impl NewMonthlyFee {
    pub fn validate(&self) -> Result<(), SchoolError> {
        require_non_negative("payable", self.payable)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFees {
    pub from: FeeMonth,
    #[serde(default)]
    pub to: Option<FeeMonth>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuery {
    #[serde(default)]
    pub month: Option<FeeMonth>,
    #[serde(default)]
    pub student_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub amount: i64,
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewPayment {
    /// Shape check only; the upper bound against what is owed is applied
    /// with the balance in hand.
    pub fn validate(&self) -> Result<(), SchoolError> {
        require_positive("payment amount", self.amount)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVendor {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

impl NewVendor {
    pub fn validate(&self) -> Result<(), SchoolError> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVendorBill {
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub billed_on: Option<NaiveDate>,
}

impl NewVendorBill {
    pub fn validate(&self) -> Result<(), SchoolError> {
        require_positive("bill amount", self.amount)
    }
}
