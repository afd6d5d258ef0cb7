use anyhow::{Context, Result, ensure};
use booking_core::{Catalog, CatalogItem, FormState, format_total};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, ScenarioCtx, TestScenario};
use crate::browser::BookingPageDriver;
use crate::logic::TesterAssets;

pub struct SmokeScenario;

/// Pick a priced item and a quantity the way a first-time visitor might.
fn pick_order(rng: &mut ChaCha8Rng, catalog: &Catalog) -> Option<(CatalogItem, u32)> {
    let priced: Vec<&CatalogItem> = catalog
        .items
        .iter()
        .filter(|item| item.price_cents > 0)
        .collect();
    let item = (*priced.choose(rng)?).clone();
    Some((item, rng.gen_range(1..=3)))
}

fn smoke_check(rng: &mut ChaCha8Rng, assets: &TesterAssets) -> Result<()> {
    let catalog = &assets.catalog;
    let mut form = FormState::new();
    ensure!(
        !form.total_view(catalog).submit_enabled,
        "fresh form allows submit"
    );
    ensure!(!form.remove_visible(), "fresh form shows remove");

    let (item, quantity) = pick_order(rng, catalog).context("catalog has no priced items")?;
    let first = form.rows()[0].id;
    form.apply_inputs(first, &item.id, &quantity.to_string());
    let extra = form.add_row();
    ensure!(form.remove_visible(), "two rows but remove hidden");

    let view = form.total_view(catalog);
    ensure!(
        view.total_cents == item.price_cents * i64::from(quantity),
        "unexpected total {} for {quantity} x {}",
        view.display,
        item.id
    );
    ensure!(view.submit_enabled, "priced order cannot be submitted");

    form.remove_row(extra);
    ensure!(!form.remove_visible(), "single row shows remove");
    Ok(())
}

#[async_trait::async_trait]
impl BrowserScenario for SmokeScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        let page = BookingPageDriver::new(driver);
        page.open(&ctx.base_url).await?;

        let state = page
            .wait_for("initial render", |s| s.rows == Some(1))
            .await?;
        ensure!(
            state.total.as_deref() == Some("0.00"),
            "initial total {:?}",
            state.total
        );
        ensure!(!page.submit_enabled().await?, "submit enabled at zero total");

        let (item, quantity) = {
            let mut rng = ctx.rng();
            pick_order(&mut rng, &ctx.assets.catalog).context("catalog has no priced items")?
        };
        if ctx.verbose {
            println!("  🌐 Ordering {quantity} x {} (seed {})", item.id, ctx.seed);
        }

        page.choose_item(0, &item.id).await?;
        page.set_quantity(0, quantity).await?;
        let expected = format_total(item.price_cents * i64::from(quantity));
        page.wait_for("updated total", |s| s.total.as_deref() == Some(expected.as_str()))
            .await?;
        ensure!(page.submit_enabled().await?, "submit still disabled at {expected}");

        page.add_row().await?;
        page.wait_for("second row", |s| s.rows == Some(2)).await?;
        page.remove_row(1).await?;
        let state = page.wait_for("row removal", |s| s.rows == Some(1)).await?;
        ensure!(
            state.total.as_deref() == Some(expected.as_str()),
            "removing an empty row changed the total to {:?}",
            state.total
        );
        Ok(())
    }
}

impl CombinedScenario for SmokeScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new("Smoke Test", smoke_check))
    }

    fn has_browser(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn smoke_check_passes_for_many_seeds() {
        let assets = TesterAssets::load_default().expect("assets");
        for seed in 0..32 {
            smoke_check(&mut ChaCha8Rng::seed_from_u64(seed), &assets).expect("smoke");
        }
    }

    #[test]
    fn orders_are_always_priced() {
        let catalog = Catalog::load_default().expect("catalog");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let (item, quantity) = pick_order(&mut rng, &catalog).expect("order");
            assert!(item.price_cents > 0);
            assert!((1..=3).contains(&quantity));
        }
    }
}
