//! Pure domain rules. Nothing in here touches the database or HTTP.

pub mod access;
pub mod dues;
pub mod fee_period;
pub mod holiday_calendar;
