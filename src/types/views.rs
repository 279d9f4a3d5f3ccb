//! Response shapes that enrich stored rows with derived values.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::models::{
    DbFeePayment, DbHoliday, DbMonthlyFee, DbVendor, DbVendorTotals,
};
use crate::service::dues::{Balance, LedgerEntry};
use crate::service::fee_period::FeeMonth;
use crate::service::holiday_calendar::{self, HolidayStatus};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayView {
    #[serde(flatten)]
    pub holiday: DbHoliday,
    pub status: HolidayStatus,
    pub days: i64,
    pub display_range: String,
    pub deletable: bool,
}

impl HolidayView {
    pub fn new(holiday: DbHoliday, today: NaiveDate) -> Self {
        let status = holiday_calendar::classify(holiday.start_date, holiday.end_date, today);
        Self {
            status,
            days: holiday_calendar::days_off(holiday.start_date, holiday.end_date),
            display_range: holiday_calendar::format_range(holiday.start_date, holiday.end_date),
            deletable: status != HolidayStatus::Past,
            holiday,
        }
    }

    /// Builds views for `holidays` in display order relative to `today`.
    pub fn sorted(mut holidays: Vec<DbHoliday>, today: NaiveDate) -> Vec<Self> {
        holidays.sort_by(|a, b| {
            holiday_calendar::display_order(
                (a.start_date, a.end_date),
                (b.start_date, b.end_date),
                today,
            )
        });
        holidays.into_iter().map(|h| Self::new(h, today)).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorView {
    #[serde(flatten)]
    pub vendor: DbVendor,
    #[serde(flatten)]
    pub balance: Balance,
}

impl From<DbVendorTotals> for VendorView {
    fn from(row: DbVendorTotals) -> Self {
        Self {
            balance: Balance::new(row.total_bills, row.total_payments),
            vendor: row.vendor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorLedger {
    #[serde(flatten)]
    pub vendor: VendorView,
    pub entries: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeView {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub month: FeeMonth,
    pub session_id: Option<i64>,
    #[serde(flatten)]
    pub balance: Balance,
}

impl From<DbMonthlyFee> for FeeView {
    fn from(row: DbMonthlyFee) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            student_name: row.student_name,
            month: row.month,
            session_id: row.session_id,
            balance: Balance::new(row.payable, row.paid),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeReceipt {
    pub payment: DbFeePayment,
    pub fee: FeeView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeGeneration {
    pub session_id: i64,
    pub months: Vec<FeeMonth>,
    pub students: usize,
    pub created: u64,
}

/// How many days of one holiday fall inside a summary window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayOverlap {
    pub holiday_id: i64,
    pub name: String,
    pub days: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub student_id: i64,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub calendar_days: i64,
    pub holiday_days: i64,
    pub working_days: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub unmarked: i64,
    /// Marks recorded on holiday dates; not part of the counts above.
    pub on_holidays: i64,
    pub holidays: Vec<HolidayOverlap>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today: NaiveDate,
    pub current_session: Option<String>,
    pub students: i64,
    pub staff: i64,
    pub month: FeeMonth,
    /// Days of `month` not covered by a holiday.
    pub working_days: i64,
    pub fees: Balance,
    pub vendor_due: i64,
    pub active_holidays: Vec<HolidayView>,
    pub upcoming_holidays: Vec<HolidayView>,
}
