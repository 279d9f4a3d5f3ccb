use axum::extract::State;

use super::{ApiResult, ok, today};
use crate::middleware::CurrentUser;
use crate::server::router::SchoolState;
use crate::service::dues::Balance;
use crate::service::fee_period::FeeMonth;
use crate::service::holiday_calendar::{self, DateRange, HolidayStatus};
use crate::types::views::{DashboardSummary, HolidayView, VendorView};

/// GET /api/dashboard -> headline numbers for the admin home page.
pub async fn dashboard(
    State(state): State<SchoolState>,
    user: CurrentUser,
) -> ApiResult<DashboardSummary> {
    let today = today();
    let month = FeeMonth::containing(today);
    let store = &state.store;

    let (payable, paid) = store.fee_totals(user.school_id, month).await?;
    let vendor_due: i64 = store
        .list_vendors(user.school_id)
        .await?
        .into_iter()
        .map(|row| VendorView::from(row).balance.due.max(0))
        .fold(0, i64::saturating_add);

    let holidays = store.list_holidays(user.school_id).await?;
    let ranges: Vec<DateRange> = holidays
        .iter()
        .filter_map(|h| DateRange::new(h.start_date, h.end_date))
        .collect();
    let working_days = holiday_calendar::working_days(&month.range(), &ranges);

    let (active_holidays, upcoming_holidays): (Vec<_>, Vec<_>) =
        HolidayView::sorted(holidays, today)
            .into_iter()
            .filter(|h| h.status != HolidayStatus::Past)
            .partition(|h| h.status == HolidayStatus::Active);

    ok(DashboardSummary {
        today,
        current_session: store
            .current_session(user.school_id)
            .await?
            .map(|s| s.name),
        students: store.count_students(user.school_id).await?,
        staff: store.count_staff(user.school_id).await?,
        month,
        working_days,
        fees: Balance::new(payable, paid),
        vendor_due,
        active_holidays,
        upcoming_holidays,
    })
}
