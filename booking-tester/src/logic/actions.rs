//! Seeded generators for form edits, standing in for a user poking at the page.
use booking_core::pricing::compact_amount;
use booking_core::{Catalog, FormState, RowId, RowRemoval};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

const ODD_QUANTITIES: &[&str] = &["", "abc", "-3", "2 bags", " 7", "+4", "1.5", "0"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    AddRow,
    /// Remove the row at `index % row_count`.
    RemoveRow(usize),
    /// Remove a row id that was never issued.
    RemoveUnknown,
    SetItem { row: usize, value: String },
    SetQuantity { row: usize, raw: String },
}

impl FormAction {
    pub fn random(rng: &mut ChaCha8Rng, catalog: &Catalog) -> Self {
        let row = rng.gen_range(0..8);
        match rng.gen_range(0..10) {
            0 | 1 => Self::AddRow,
            2 | 3 => Self::RemoveRow(row),
            4 => Self::RemoveUnknown,
            5..=7 => Self::SetItem {
                row,
                value: random_select_value(rng, catalog),
            },
            _ => Self::SetQuantity {
                row,
                raw: random_quantity(rng),
            },
        }
    }

    /// Apply to `form`, returning the removal outcome for remove actions.
    pub fn apply(&self, form: &mut FormState) -> Option<RowRemoval> {
        match self {
            Self::AddRow => {
                form.add_row();
                None
            }
            Self::RemoveRow(index) => Some(form.remove_row(pick_row(form, *index))),
            Self::RemoveUnknown => Some(form.remove_row(RowId(u32::MAX))),
            Self::SetItem { row, value } => {
                form.set_item(pick_row(form, *row), Some(value));
                None
            }
            Self::SetQuantity { row, raw } => {
                let id = pick_row(form, *row);
                let item = form
                    .row(id)
                    .and_then(|r| r.item.clone())
                    .unwrap_or_default();
                form.apply_inputs(id, &item, raw);
                None
            }
        }
    }
}

fn pick_row(form: &FormState, index: usize) -> RowId {
    let rows = form.rows();
    rows[index % rows.len()].id
}

/// A select value as the page could report it: an id, a legacy price, blank or junk.
pub fn random_select_value(rng: &mut ChaCha8Rng, catalog: &Catalog) -> String {
    match rng.gen_range(0..10) {
        0 => String::new(),
        1 => "mystery-crate".to_string(),
        2 | 3 => catalog
            .items
            .choose(rng)
            .map(|item| compact_amount(item.price_cents))
            .unwrap_or_default(),
        _ => catalog
            .items
            .choose(rng)
            .map(|item| item.id.clone())
            .unwrap_or_default(),
    }
}

pub fn random_quantity(rng: &mut ChaCha8Rng) -> String {
    if rng.gen_bool(0.25) {
        ODD_QUANTITIES
            .choose(rng)
            .map(|raw| (*raw).to_string())
            .unwrap_or_default()
    } else {
        rng.gen_range(1..=12_u32).to_string()
    }
}

/// Build a form from a random run of up to `max_actions` edits.
pub fn random_form(rng: &mut ChaCha8Rng, catalog: &Catalog, max_actions: usize) -> FormState {
    let mut form = FormState::new();
    let steps = rng.gen_range(0..=max_actions);
    for _ in 0..steps {
        FormAction::random(rng, catalog).apply(&mut form);
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn catalog() -> Catalog {
        Catalog::load_default().expect("catalog")
    }

    #[test]
    fn same_seed_builds_the_same_form() {
        let catalog = catalog();
        let a = random_form(&mut ChaCha8Rng::seed_from_u64(7), &catalog, 30);
        let b = random_form(&mut ChaCha8Rng::seed_from_u64(7), &catalog, 30);
        assert_eq!(a, b);
    }

    #[test]
    fn remove_row_wraps_index_and_respects_last_row() {
        let mut form = FormState::new();
        assert_eq!(
            FormAction::RemoveRow(5).apply(&mut form),
            Some(RowRemoval::LastRow)
        );
        FormAction::AddRow.apply(&mut form);
        assert_eq!(
            FormAction::RemoveRow(3).apply(&mut form),
            Some(RowRemoval::Removed)
        );
        assert_eq!(form.row_count(), 1);
        assert_eq!(
            FormAction::RemoveUnknown.apply(&mut form),
            Some(RowRemoval::Unknown)
        );
    }

    #[test]
    fn set_quantity_keeps_the_selected_item() {
        let mut form = FormState::new();
        FormAction::SetItem {
            row: 0,
            value: "fridge".into(),
        }
        .apply(&mut form);
        FormAction::SetQuantity {
            row: 0,
            raw: "3".into(),
        }
        .apply(&mut form);
        assert_eq!(form.rows()[0].item.as_deref(), Some("fridge"));
        assert_eq!(form.rows()[0].quantity, 3);
    }
}
