//! Bulleted item list used in the email payload and the WhatsApp message.
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::form::ItemRow;

/// Text used when no row has both an item and a quantity.
pub const NO_ITEMS_PLACEHOLDER: &str = "No items selected";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsSummary {
    pub lines: Vec<String>,
}

impl ItemsSummary {
    /// One `• <name> × <quantity>` line per row with a resolved item and quantity ≥ 1.
    #[must_use]
    pub fn from_rows(rows: &[ItemRow], catalog: &Catalog) -> Self {
        let lines = rows
            .iter()
            .filter(|row| row.quantity >= 1)
            .filter_map(|row| {
                let item = catalog.lookup(row.item.as_deref()?)?;
                Some(format!("• {} × {}", item.name, row.quantity))
            })
            .collect();
        Self { lines }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines each terminated by a newline, or the placeholder when empty.
    #[must_use]
    pub fn to_text(&self) -> String {
        if self.lines.is_empty() {
            return NO_ITEMS_PLACEHOLDER.to_string();
        }
        self.lines.iter().fold(String::new(), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormState, RowId};

    #[test]
    fn empty_rows_produce_placeholder() {
        let catalog = Catalog::load_default().expect("catalog");
        let form = FormState::new();
        let summary = ItemsSummary::from_rows(form.rows(), &catalog);
        assert!(summary.is_empty());
        assert_eq!(summary.to_text(), "No items selected");
    }

    #[test]
    fn lines_use_catalog_names() {
        let catalog = Catalog::load_default().expect("catalog");
        let mut form = FormState::new();
        let first = form.rows()[0].id;
        form.apply_inputs(first, "small-bag", "2");
        let second = form.add_row();
        form.apply_inputs(second, "70", "1");
        let summary = ItemsSummary::from_rows(form.rows(), &catalog);
        assert_eq!(summary.to_text(), "• Small Bag × 2\n• Fridge × 1\n");
    }

    #[test]
    fn free_tier_is_listed_but_zero_quantity_is_not() {
        let catalog = Catalog::load_default().expect("catalog");
        let rows = vec![
            ItemRow {
                id: RowId(0),
                item: Some("buckets".into()),
                quantity: 3,
            },
            ItemRow {
                id: RowId(1),
                item: Some("fridge".into()),
                quantity: 0,
            },
        ];
        let summary = ItemsSummary::from_rows(&rows, &catalog);
        assert_eq!(summary.lines, vec!["• Buckets / Free × 3".to_string()]);
    }
}
