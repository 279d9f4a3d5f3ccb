use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error as ThisError;

use crate::service::access::Role;
use crate::service::fee_period::FeeMonth;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbUser {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbSession {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbClass {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbStudent {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub admission_no: String,
    pub class_id: Option<i64>,
    pub section: Option<String>,
    pub monthly_fee: i64,
    pub session_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbEnrollment {
    pub id: i64,
    pub student_id: i64,
    pub session_id: i64,
    pub class_id: Option<i64>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbStaff {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub designation: String,
    pub phone: Option<String>,
    pub salary: i64,
    pub joined_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, ThisError)]
#[error("unknown attendance status `{0}`")]
pub struct UnknownAttendanceStatus(String);

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Absent => "ABSENT",
            AttendanceStatus::Late => "LATE",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownAttendanceStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRESENT" => Ok(AttendanceStatus::Present),
            "ABSENT" => Ok(AttendanceStatus::Absent),
            "LATE" => Ok(AttendanceStatus::Late),
            other => Err(UnknownAttendanceStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for AttendanceStatus {
    type Error = UnknownAttendanceStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbAttendance {
    pub id: i64,
    pub student_id: i64,
    pub date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
    pub session_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbMonthlyFee {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    #[sqlx(try_from = "String")]
    pub month: FeeMonth,
    pub payable: i64,
    pub paid: i64,
    pub session_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbFeePayment {
    pub id: i64,
    pub fee_id: i64,
    pub amount: i64,
    pub paid_on: NaiveDate,
    pub received_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbHoliday {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbVendor {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub service: Option<String>,
}

/// Vendor row joined with its bill and payment aggregates.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbVendorTotals {
    #[sqlx(flatten)]
    pub vendor: DbVendor,
    pub total_bills: i64,
    pub total_payments: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbVendorBill {
    pub id: i64,
    pub vendor_id: i64,
    pub amount: i64,
    pub description: Option<String>,
    pub billed_on: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbVendorPayment {
    pub id: i64,
    pub vendor_id: i64,
    pub amount: i64,
    pub paid_on: NaiveDate,
    pub note: Option<String>,
}
