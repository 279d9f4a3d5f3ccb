//! Due-amount arithmetic shared by vendor accounts and student monthly fees.
//!
//! Amounts are `i64` in the smallest currency unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SchoolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    Paid,
    Partial,
    Pending,
}

/// Payable/paid totals of one account with the derived due and status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub total_payable: i64,
    pub total_paid: i64,
    pub due: i64,
    pub status: SettlementStatus,
}

impl Balance {
    pub fn new(total_payable: i64, total_paid: i64) -> Self {
        Self {
            total_payable,
            total_paid,
            due: due_amount(total_payable, total_paid),
            status: settlement_status(total_payable, total_paid),
        }
    }
}

pub fn due_amount(total_payable: i64, total_paid: i64) -> i64 {
    total_payable - total_paid
}

pub fn settlement_status(total_payable: i64, total_paid: i64) -> SettlementStatus {
    if due_amount(total_payable, total_paid) <= 0 {
        SettlementStatus::Paid
    } else if total_paid > 0 && total_paid < total_payable {
        SettlementStatus::Partial
    } else {
        SettlementStatus::Pending
    }
}

/// Rejects non-positive payments and payments larger than what is owed.
pub fn validate_payment(amount: i64, current_due: i64) -> Result<(), SchoolError> {
    if amount <= 0 {
        return Err(SchoolError::validation(
            "payment amount must be greater than zero",
        ));
    }
    if amount > current_due {
        return Err(SchoolError::validation(format!(
            "payment amount {amount} exceeds the current due of {current_due}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Bill,
    Payment,
}

/// One row of a vendor statement with the balance after it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: i64,
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub amount: i64,
    pub note: Option<String>,
    pub running_due: i64,
}

/// Merges bills and payments by date (bills first on the same day) and
/// accumulates the running due.
pub fn build_ledger(
    bills: impl IntoIterator<Item = (i64, NaiveDate, i64, Option<String>)>,
    payments: impl IntoIterator<Item = (i64, NaiveDate, i64, Option<String>)>,
) -> Vec<LedgerEntry> {
    let mut rows: Vec<(EntryKind, i64, NaiveDate, i64, Option<String>)> = bills
        .into_iter()
        .map(|(id, date, amount, note)| (EntryKind::Bill, id, date, amount, note))
        .chain(
            payments
                .into_iter()
                .map(|(id, date, amount, note)| (EntryKind::Payment, id, date, amount, note)),
        )
        .collect();
    rows.sort_by_key(|(kind, id, date, ..)| (*date, *kind == EntryKind::Payment, *id));

    let mut running = 0i64;
    rows.into_iter()
        .map(|(kind, id, date, amount, note)| {
            running += match kind {
                EntryKind::Bill => amount,
                EntryKind::Payment => -amount,
            };
            LedgerEntry {
                id,
                kind,
                date,
                amount,
                note,
                running_due: running,
            }
        })
        .collect()
}
