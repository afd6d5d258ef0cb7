//! Property checks over the form model: rows, totals and the summary text.
use anyhow::{Result, ensure};
use booking_core::{
    BookingRequest, ContactDetails, FormState, ItemsSummary, NO_ITEMS_PLACEHOLDER, RowRemoval,
    whatsapp_link, whatsapp_message,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

use crate::logic::TesterAssets;
use crate::logic::actions::{FormAction, random_form};

const MAX_STEPS: usize = 60;

/// Random add/remove/edit runs never leave zero rows, and the remove
/// affordance tracks the row count.
pub fn row_invariants(rng: &mut ChaCha8Rng, assets: &TesterAssets) -> Result<()> {
    let mut form = FormState::new();
    let steps = rng.gen_range(1..=MAX_STEPS);

    for step in 1..=steps {
        let before = form.row_count();
        let action = FormAction::random(rng, &assets.catalog);
        let removal = action.apply(&mut form);
        let after = form.row_count();

        ensure!(after >= 1, "step {step} ({action:?}) left no rows");
        ensure!(
            form.remove_visible() == (after > 1),
            "step {step}: remove visible {} with {after} row(s)",
            form.remove_visible()
        );
        let expected = match (&action, removal) {
            (FormAction::AddRow, _) => before + 1,
            (_, Some(RowRemoval::Removed)) => before - 1,
            (_, Some(RowRemoval::LastRow)) => {
                ensure!(before == 1, "step {step}: last-row refusal with {before} rows");
                before
            }
            _ => before,
        };
        ensure!(
            after == expected,
            "step {step} ({action:?}): expected {expected} rows, found {after}"
        );

        let ids: HashSet<_> = form.rows().iter().map(|row| row.id).collect();
        ensure!(ids.len() == after, "step {step}: duplicate row ids");
    }

    form.reset();
    ensure!(form.row_count() == 1, "reset kept {} rows", form.row_count());
    let first = &form.rows()[0];
    ensure!(
        first.item.is_none() && first.quantity == 1,
        "reset row not restored: {first:?}"
    );
    ensure!(form.total_cents(&assets.catalog) == 0, "reset total not zero");
    Ok(())
}

/// The displayed total always equals the sum of price x quantity.
pub fn total_consistency(rng: &mut ChaCha8Rng, assets: &TesterAssets) -> Result<()> {
    let catalog = &assets.catalog;
    let form = random_form(rng, catalog, MAX_STEPS);

    let expected: i64 = form
        .rows()
        .iter()
        .map(|row| {
            let price = row
                .item
                .as_deref()
                .and_then(|value| catalog.lookup(value))
                .map_or(0, |item| item.price_cents);
            price * i64::from(row.quantity)
        })
        .sum();

    let view = form.total_view(catalog);
    ensure!(
        view.total_cents == expected,
        "total {} but rows add up to {expected}: {:?}",
        view.total_cents,
        form.rows()
    );
    let display = format!("{}.{:02}", expected / 100, expected % 100);
    ensure!(
        view.display == display,
        "displayed {} instead of {display}",
        view.display
    );
    ensure!(
        view.submit_enabled == (expected > 0),
        "submit enabled {} at total {expected}",
        view.submit_enabled
    );
    Ok(())
}

/// Rows without a resolved item or with quantity zero stay out of the
/// summary, and an empty summary reads as the placeholder. The WhatsApp
/// link carries the whole message percent-encoded.
pub fn summary_placeholder(rng: &mut ChaCha8Rng, assets: &TesterAssets) -> Result<()> {
    let catalog = &assets.catalog;
    let form = random_form(rng, catalog, MAX_STEPS / 2);

    let countable = form
        .rows()
        .iter()
        .filter(|row| {
            row.quantity >= 1
                && row
                    .item
                    .as_deref()
                    .is_some_and(|value| catalog.lookup(value).is_some())
        })
        .count();
    let summary = ItemsSummary::from_rows(form.rows(), catalog);
    let text = summary.to_text();

    if countable == 0 {
        ensure!(
            text == NO_ITEMS_PLACEHOLDER,
            "expected placeholder, got {text:?}"
        );
    } else {
        let lines: Vec<&str> = text.lines().collect();
        ensure!(
            lines.len() == countable,
            "{countable} countable rows but {} summary lines",
            lines.len()
        );
        ensure!(
            lines.iter().all(|line| line.starts_with("• ") && line.contains(" × ")),
            "malformed summary {text:?}"
        );
    }

    let contact = ContactDetails {
        name: format!("Kofi & Ama {}", rng.gen_range(1..100)),
        hostel: "Hall #3".to_string(),
        ..ContactDetails::default()
    };
    let request = BookingRequest::from_form(&form, contact, catalog);
    let message = whatsapp_message(
        &request,
        &assets.config.business_name,
        &catalog.currency_symbol,
    );
    ensure!(message.contains(&text), "message lacks the item summary");

    let link = whatsapp_link(&assets.config.whatsapp_number, &message);
    let prefix = format!("https://wa.me/{}?text=", assets.config.whatsapp_number);
    let query = link
        .strip_prefix(&prefix)
        .ok_or_else(|| anyhow::anyhow!("unexpected link shape {link}"))?;
    ensure!(
        !query.contains([' ', '\n', '&', '#']),
        "message not fully encoded: {query}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn assets() -> TesterAssets {
        TesterAssets::load_default().expect("assets")
    }

    #[test]
    fn checks_pass_across_seeds() {
        let assets = assets();
        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            row_invariants(&mut rng, &assets).expect("row invariants");
            total_consistency(&mut rng, &assets).expect("totals");
            summary_placeholder(&mut rng, &assets).expect("summary");
        }
    }
}
