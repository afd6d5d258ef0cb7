use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use thirtyfour::prelude::*;

use crate::logic::{LogicCheck, TestScenario, TesterAssets};

pub mod form;
pub mod lifecycle;
pub mod smoke;

#[derive(Debug, Clone)]
pub struct ScenarioCtx<'a> {
    pub base_url: String,
    pub seed: u64,
    pub assets: &'a Arc<TesterAssets>,
    pub verbose: bool,
}

impl ScenarioCtx<'_> {
    /// Deterministic randomness for choices made during a browser run.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}

// Browser test scenario
#[async_trait::async_trait]
pub trait BrowserScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()>;
}

// Combined scenario that can run both logic and browser tests
pub trait CombinedScenario: BrowserScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario>;

    /// Whether `run_browser` drives a real page.
    fn has_browser(&self) -> bool {
        false
    }
}

/// A scenario that only exercises the form model.
#[derive(Clone)]
pub struct LogicOnlyScenario {
    name: &'static str,
    check: LogicCheck,
}

impl LogicOnlyScenario {
    pub const fn new(name: &'static str, check: LogicCheck) -> Self {
        Self { name, check }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

#[async_trait::async_trait]
impl BrowserScenario for LogicOnlyScenario {
    async fn run_browser(&self, _driver: &WebDriver, _ctx: &ScenarioCtx<'_>) -> Result<()> {
        anyhow::bail!("{} has no browser implementation", self.name)
    }
}

impl CombinedScenario for LogicOnlyScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new(self.name, self.check))
    }
}

const SCENARIOS: &[(&str, &str)] = &[
    ("smoke", "Smoke Test (logic and browser)"),
    ("row-invariants", "Row Add/Remove Invariants"),
    ("total-consistency", "Total Matches Price x Quantity"),
    ("summary-placeholder", "Item Summary and WhatsApp Message"),
    ("submit-lifecycle", "Submission Lifecycle"),
];

pub fn get_scenario(name: &str) -> Option<Box<dyn CombinedScenario + Send + Sync>> {
    match name.trim().to_lowercase().as_str() {
        "smoke" => Some(Box::new(smoke::SmokeScenario)),
        "row-invariants" | "rows" => Some(Box::new(LogicOnlyScenario::new(
            "Row Add/Remove Invariants",
            form::row_invariants,
        ))),
        "total-consistency" | "totals" => Some(Box::new(LogicOnlyScenario::new(
            "Total Matches Price x Quantity",
            form::total_consistency,
        ))),
        "summary-placeholder" | "summary" => Some(Box::new(LogicOnlyScenario::new(
            "Item Summary and WhatsApp Message",
            form::summary_placeholder,
        ))),
        "submit-lifecycle" | "submit" => Some(Box::new(LogicOnlyScenario::new(
            "Submission Lifecycle",
            lifecycle::submit_lifecycle,
        ))),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

/// Every scenario key, in listing order.
pub fn all_scenario_keys() -> Vec<String> {
    SCENARIOS.iter().map(|(key, _)| (*key).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, _) in list_scenarios() {
            let scenario = get_scenario(key).unwrap_or_else(|| panic!("{key} missing"));
            assert!(scenario.as_logic_scenario().is_some());
        }
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert!(get_scenario("ROWS").is_some());
        assert!(get_scenario(" submit ").is_some());
        assert!(get_scenario("boss-fight").is_none());
    }

    #[test]
    fn only_smoke_drives_the_browser() {
        for key in ["smoke", "SMOKE", " Smoke "] {
            assert!(get_scenario(key).is_some_and(|s| s.has_browser()), "{key}");
        }
        for key in ["rows", "totals", "summary", "submit"] {
            assert!(get_scenario(key).is_some_and(|s| !s.has_browser()), "{key}");
        }
    }

    #[test]
    fn logic_only_scenarios_refuse_browser_runs() {
        let scenario = LogicOnlyScenario::new("Rows", form::row_invariants);
        assert!(!scenario.has_browser());
        assert_eq!(scenario.name(), "Rows");
        assert_eq!(
            scenario.as_logic_scenario().map(|s| s.name),
            Some("Rows".to_string())
        );
    }
}
