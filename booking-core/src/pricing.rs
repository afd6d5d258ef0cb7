//! Running total over the item rows.
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::form::ItemRow;

/// Snapshot of what the total display and submit button should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalView {
    pub total_cents: i64,
    /// Two-decimal text written into the total display
    pub display: String,
    pub submit_enabled: bool,
}

impl TotalView {
    #[must_use]
    pub fn from_cents(total_cents: i64) -> Self {
        Self {
            total_cents,
            display: format_total(total_cents),
            submit_enabled: submit_enabled(total_cents),
        }
    }
}

/// Sum of price × quantity across rows. Rows without a resolvable item count as 0.
#[must_use]
pub fn compute_total(rows: &[ItemRow], catalog: &Catalog) -> i64 {
    rows.iter().fold(0_i64, |acc, row| {
        let price = row
            .item
            .as_deref()
            .map_or(0, |value| catalog.price_of(value));
        acc.saturating_add(price.saturating_mul(i64::from(row.quantity)))
    })
}

/// Submission is only offered for a positive total.
#[must_use]
pub const fn submit_enabled(total_cents: i64) -> bool {
    total_cents > 0
}

/// Format minor units with exactly two decimals (`14000` -> `"140.00"`).
#[must_use]
pub fn format_total(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Format minor units without trailing zero cents (`4000` -> `"40"`, `4050` -> `"40.50"`).
#[must_use]
pub fn compact_amount(cents: i64) -> String {
    if cents % 100 == 0 {
        (cents / 100).to_string()
    } else {
        format_total(cents)
    }
}
