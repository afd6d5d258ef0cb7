//! Fixed price catalog for the bookable item tiers.
//!
//! The catalog is the single source of truth for item names and prices. Row
//! rendering builds select options from it, and the booking summary reads
//! item names from it instead of re-parsing rendered option text.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::pricing::compact_amount;

const DEFAULT_CATALOG_JSON: &str = include_str!("../data/catalog.json");

/// One bookable tier (a bag size, a fridge, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Price in pesewas to avoid floating-point issues
    pub price_cents: i64,
}

impl CatalogItem {
    /// Label shown in the row's select, e.g. `Small Bag – ₵40`.
    #[must_use]
    pub fn option_label(&self, currency_symbol: &str) -> String {
        format!(
            "{name} – {currency_symbol}{price}",
            name = self.name,
            price = compact_amount(self.price_cents)
        )
    }
}

/// The complete set of tiers offered on the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    pub currency_symbol: String,
    /// Text of the empty "nothing chosen yet" option.
    pub placeholder: String,
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog has no items")]
    Empty,
    #[error("catalog item id must not be empty")]
    EmptyId,
    #[error("catalog item {id} has no name")]
    EmptyName { id: String },
    #[error("duplicate catalog item id: {id}")]
    DuplicateId { id: String },
    #[error("catalog item {id} has a negative price ({price_cents})")]
    NegativePrice { id: String, price_cents: i64 },
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the catalog fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the catalog shipped with the page.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is malformed.
    pub fn load_default() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG_JSON)
    }

    /// Check structural rules: non-empty, unique ids, names present, prices non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first rule violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.items.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if item.name.trim().is_empty() {
                return Err(CatalogError::EmptyName {
                    id: item.id.clone(),
                });
            }
            if item.price_cents < 0 {
                return Err(CatalogError::NegativePrice {
                    id: item.id.clone(),
                    price_cents: item.price_cents,
                });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: item.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Find an item by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Resolve a select value to a catalog item.
    ///
    /// Values are item ids. Markup that still carries numeric option values
    /// (`"40"`) resolves by price in major units. Anything else is `None`.
    #[must_use]
    pub fn lookup(&self, value: &str) -> Option<&CatalogItem> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        self.find(value).or_else(|| {
            let cents = parse_major_amount(value)?;
            self.items.iter().find(|item| item.price_cents == cents)
        })
    }

    /// Price of the item a select value refers to, 0 when it does not resolve.
    #[must_use]
    pub fn price_of(&self, value: &str) -> i64 {
        self.lookup(value).map_or(0, |item| item.price_cents)
    }
}

/// Parse `"40"` or `"40.5"` into minor units.
#[allow(clippy::cast_possible_truncation)]
fn parse_major_amount(value: &str) -> Option<i64> {
    let amount: f64 = value.parse().ok()?;
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    Some((amount * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::load_default().expect("default catalog")
    }

    #[test]
    fn default_catalog_has_five_tiers() {
        let catalog = catalog();
        let prices: Vec<i64> = catalog.items.iter().map(|i| i.price_cents).collect();
        assert_eq!(prices, vec![4000, 5000, 6000, 7000, 0]);
        assert_eq!(catalog.currency_symbol, "₵");
        assert_eq!(catalog.placeholder, "Select item");
    }

    #[test]
    fn option_label_uses_name_and_whole_price() {
        let catalog = catalog();
        let item = catalog.find("small-bag").expect("small bag");
        assert_eq!(item.option_label("₵"), "Small Bag – ₵40");
    }

    #[test]
    fn lookup_resolves_ids_and_legacy_price_values() {
        let catalog = catalog();
        assert_eq!(catalog.lookup("fridge").map(|i| i.name.as_str()), Some("Fridge"));
        assert_eq!(catalog.lookup("60").map(|i| i.id.as_str()), Some("big-bag"));
        assert_eq!(catalog.lookup("0").map(|i| i.id.as_str()), Some("buckets"));
        assert!(catalog.lookup("").is_none());
        assert!(catalog.lookup("45").is_none());
        assert!(catalog.lookup("not-a-thing").is_none());
    }

    #[test]
    fn price_of_fails_soft_to_zero() {
        let catalog = catalog();
        assert_eq!(catalog.price_of("medium-bag"), 5000);
        assert_eq!(catalog.price_of("garbage"), 0);
        assert_eq!(catalog.price_of("-40"), 0);
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let json = r#"{
            "currency_symbol": "₵",
            "placeholder": "Select item",
            "items": [
                { "id": "a", "name": "A", "price_cents": 100 },
                { "id": "a", "name": "B", "price_cents": 200 }
            ]
        }"#;
        let err = Catalog::from_json(json).expect_err("duplicate ids");
        assert!(matches!(err, CatalogError::DuplicateId { ref id } if id == "a"));
    }

    #[test]
    fn validate_rejects_empty_and_negative_entries() {
        let empty = r#"{ "currency_symbol": "₵", "placeholder": "-", "items": [] }"#;
        assert!(matches!(
            Catalog::from_json(empty),
            Err(CatalogError::Empty)
        ));

        let negative = r#"{
            "currency_symbol": "₵",
            "placeholder": "-",
            "items": [{ "id": "x", "name": "X", "price_cents": -1 }]
        }"#;
        let err = Catalog::from_json(negative).expect_err("negative price");
        assert!(err.to_string().contains("negative price"));
    }
}
