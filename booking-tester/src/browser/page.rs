use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;

/// Snapshot of the booking form as the browser renders it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub total: Option<String>,
    pub rows: Option<u32>,
    pub submit_disabled: Option<bool>,
    pub submit_label: Option<String>,
}

pub const STATE_SCRIPT: &str = r"
    const total = document.getElementById('totalPrice');
    const submit = document.getElementById('submitBtn');
    return {
        total: total ? total.textContent : null,
        rows: document.querySelectorAll('#itemsContainer .item-row').length,
        submitDisabled: submit ? submit.disabled : null,
        submitLabel: submit ? submit.textContent : null,
    };
";

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const POLL_ATTEMPTS: u32 = 30;

/// Drives the booking form through real DOM interactions.
#[derive(Debug, Clone)]
pub struct BookingPageDriver<'a> {
    driver: &'a WebDriver,
}

impl<'a> BookingPageDriver<'a> {
    pub const fn new(driver: &'a WebDriver) -> Self {
        Self { driver }
    }

    pub async fn open(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        self.driver
            .find(By::Id("bookingForm"))
            .await
            .context("booking form not found on page")?;
        Ok(())
    }

    pub async fn state(&self) -> Result<PageState> {
        let ret = self.driver.execute(STATE_SCRIPT, vec![]).await?;
        serde_json::from_value(ret.json().clone()).context("parsing page state")
    }

    pub async fn rows(&self) -> Result<Vec<WebElement>> {
        Ok(self
            .driver
            .find_all(By::Css("#itemsContainer .item-row"))
            .await?)
    }

    async fn row(&self, index: usize) -> Result<WebElement> {
        let rows = self.rows().await?;
        let count = rows.len();
        rows.into_iter()
            .nth(index)
            .with_context(|| format!("row {index} missing ({count} rows on page)"))
    }

    pub async fn add_row(&self) -> Result<()> {
        self.driver.find(By::Id("addItem")).await?.click().await?;
        Ok(())
    }

    pub async fn choose_item(&self, index: usize, item_id: &str) -> Result<()> {
        let row = self.row(index).await?;
        let select = row.find(By::Css(".itemSelect")).await?;
        SelectElement::new(&select)
            .await?
            .select_by_value(item_id)
            .await
            .with_context(|| format!("selecting {item_id} in row {index}"))?;
        Ok(())
    }

    pub async fn set_quantity(&self, index: usize, quantity: u32) -> Result<()> {
        let row = self.row(index).await?;
        let input = row.find(By::Css(".quantity")).await?;
        input.clear().await?;
        input.send_keys(quantity.to_string()).await?;
        Ok(())
    }

    pub async fn remove_row(&self, index: usize) -> Result<()> {
        let row = self.row(index).await?;
        row.find(By::Css(".remove-btn")).await?.click().await?;
        Ok(())
    }

    pub async fn submit_enabled(&self) -> Result<bool> {
        Ok(self.driver.find(By::Id("submitBtn")).await?.is_enabled().await?)
    }

    /// Poll until `check` accepts the rendered state.
    pub async fn wait_for<F>(&self, what: &str, check: F) -> Result<PageState>
    where
        F: Fn(&PageState) -> bool + Send,
    {
        let mut last = PageState::default();
        for _ in 0..POLL_ATTEMPTS {
            last = self.state().await?;
            if check(&last) {
                return Ok(last);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        bail!("timed out waiting for {what}; last state {last:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_state_reads_script_payload() {
        let state: PageState = serde_json::from_value(json!({
            "total": "40.00",
            "rows": 2,
            "submitDisabled": false,
            "submitLabel": "Confirm & Send Booking"
        }))
        .expect("state");
        assert_eq!(state.total.as_deref(), Some("40.00"));
        assert_eq!(state.rows, Some(2));
        assert_eq!(state.submit_disabled, Some(false));
    }

    #[test]
    fn page_state_tolerates_missing_elements() {
        let state: PageState =
            serde_json::from_value(json!({ "total": null, "rows": 0 })).expect("state");
        assert_eq!(state.total, None);
        assert_eq!(state.submit_label, None);
    }
}
