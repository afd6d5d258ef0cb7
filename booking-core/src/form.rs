//! In-memory model of the booking form: item rows plus contact fields.
//!
//! The page adapter mirrors this model into the DOM. All row bookkeeping
//! (ids, the "at least one row" rule, reset) happens here so it can be
//! exercised without a browser.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::Catalog;
use crate::pricing::{TotalView, compute_total};

/// Stable identity of a row for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u32);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// One repeatable item row: a chosen tier and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: RowId,
    /// Raw select value (a catalog id), `None` while nothing is chosen
    pub item: Option<String>,
    pub quantity: u32,
}

impl ItemRow {
    #[must_use]
    pub const fn new(id: RowId) -> Self {
        Self {
            id,
            item: None,
            quantity: 1,
        }
    }
}

/// Free-text fields of the booking form. Missing fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub hostel: String,
    pub date: String,
    pub time: String,
    pub description: String,
}

/// Result of asking to remove a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRemoval {
    Removed,
    /// The row is the last one left and stays.
    LastRow,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    rows: Vec<ItemRow>,
    next_id: u32,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// A form holding the single pre-rendered row.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: vec![ItemRow::new(RowId(0))],
            next_id: 1,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[ItemRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&ItemRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    fn row_mut(&mut self, id: RowId) -> Option<&mut ItemRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The remove affordance is shown only while more than one row exists.
    #[must_use]
    pub fn remove_visible(&self) -> bool {
        self.rows.len() > 1
    }

    /// Append a fresh row (no item, quantity 1).
    pub fn add_row(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.rows.push(ItemRow::new(id));
        id
    }

    /// Remove a row unless it is the last one.
    pub fn remove_row(&mut self, id: RowId) -> RowRemoval {
        let Some(index) = self.rows.iter().position(|row| row.id == id) else {
            return RowRemoval::Unknown;
        };
        if self.rows.len() <= 1 {
            return RowRemoval::LastRow;
        }
        self.rows.remove(index);
        RowRemoval::Removed
    }

    /// Record the select value of a row. Blank values clear the selection.
    pub fn set_item(&mut self, id: RowId, value: Option<&str>) -> bool {
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        row.item = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        true
    }

    pub fn set_quantity(&mut self, id: RowId, quantity: u32) -> bool {
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        row.quantity = quantity;
        true
    }

    /// Apply the raw input values of a row as read from the page.
    pub fn apply_inputs(&mut self, id: RowId, select_value: &str, quantity_raw: &str) -> bool {
        self.set_item(id, Some(select_value)) && self.set_quantity(id, parse_quantity(quantity_raw))
    }

    /// Drop every row but the first and restore it to defaults.
    pub fn reset(&mut self) {
        self.rows.truncate(1);
        if let Some(first) = self.rows.first_mut() {
            first.item = None;
            first.quantity = 1;
        } else {
            self.rows.push(ItemRow::new(RowId(self.next_id)));
            self.next_id = self.next_id.wrapping_add(1);
        }
    }

    #[must_use]
    pub fn total_cents(&self, catalog: &Catalog) -> i64 {
        compute_total(&self.rows, catalog)
    }

    #[must_use]
    pub fn total_view(&self, catalog: &Catalog) -> TotalView {
        TotalView::from_cents(self.total_cents(catalog))
    }
}

/// Parse a quantity field the lenient way: leading digits only, anything else is 0.
///
/// `"3"` -> 3, `" 2.5"` -> 2, `"4 bags"` -> 4, `""` / `"abc"` / `"-1"` -> 0.
#[must_use]
pub fn parse_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits
        .chars()
        .take_while(char::is_ascii_digit)
        .try_fold(0_u32, |acc, c| {
            let digit = c.to_digit(10)?;
            Some(acc.saturating_mul(10).saturating_add(digit))
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_has_one_default_row() {
        let form = FormState::new();
        assert_eq!(form.row_count(), 1);
        assert!(!form.remove_visible());
        let row = &form.rows()[0];
        assert_eq!(row.item, None);
        assert_eq!(row.quantity, 1);
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut form = FormState::new();
        let only = form.rows()[0].id;
        assert_eq!(form.remove_row(only), RowRemoval::LastRow);
        assert_eq!(form.row_count(), 1);
    }

    #[test]
    fn added_rows_get_fresh_ids_and_can_be_removed() {
        let mut form = FormState::new();
        let a = form.add_row();
        let b = form.add_row();
        assert_ne!(a, b);
        assert!(form.remove_visible());
        assert_eq!(form.remove_row(a), RowRemoval::Removed);
        assert_eq!(form.remove_row(a), RowRemoval::Unknown);
        assert_eq!(form.row_count(), 2);
        assert!(form.row(b).is_some());
    }

    #[test]
    fn apply_inputs_normalizes_blank_selection() {
        let mut form = FormState::new();
        let id = form.rows()[0].id;
        assert!(form.apply_inputs(id, "fridge", "2"));
        assert_eq!(form.row(id).and_then(|r| r.item.as_deref()), Some("fridge"));
        assert!(form.apply_inputs(id, "  ", "x"));
        let row = form.row(id).expect("row");
        assert_eq!(row.item, None);
        assert_eq!(row.quantity, 0);
        assert!(!form.apply_inputs(RowId(99), "fridge", "1"));
    }

    #[test]
    fn reset_keeps_only_the_first_row() {
        let mut form = FormState::new();
        let first = form.rows()[0].id;
        form.set_item(first, Some("big-bag"));
        form.set_quantity(first, 4);
        form.add_row();
        form.add_row();
        form.reset();
        assert_eq!(form.row_count(), 1);
        assert_eq!(form.rows()[0], ItemRow::new(first));
    }

    #[test]
    fn parse_quantity_is_lenient() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 2.5"), 2);
        assert_eq!(parse_quantity("4 bags"), 4);
        assert_eq!(parse_quantity("+7"), 7);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity("-1"), 0);
        assert_eq!(parse_quantity("99999999999"), u32::MAX);
    }

    #[test]
    fn row_id_display_is_dom_friendly() {
        assert_eq!(RowId(3).to_string(), "row-3");
    }
}
