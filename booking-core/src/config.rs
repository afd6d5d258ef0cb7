//! Site configuration: email relay identifiers, WhatsApp contact and UI labels.
//!
//! The defaults ship as embedded JSON. When `BOOKING_EMAILJS_PUBLIC_KEY` or
//! `BOOKING_WHATSAPP_NUMBER` is set at compile time, it replaces the
//! corresponding value.
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SITE_JSON: &str = include_str!("../data/site.json");

/// Identifiers passed to the email relay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmailConfig {
    pub public_key: String,
    pub service_id: String,
    pub template_id: String,
}

/// Text of the submit button in its two states.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitLabels {
    #[serde(default = "default_idle_label")]
    pub idle: String,
    #[serde(default = "default_busy_label")]
    pub busy: String,
}

impl Default for SubmitLabels {
    fn default() -> Self {
        Self {
            idle: default_idle_label(),
            busy: default_busy_label(),
        }
    }
}

fn default_idle_label() -> String {
    "Confirm & Send Booking".to_string()
}

fn default_busy_label() -> String {
    "Sending...".to_string()
}

const fn default_loader_delay_ms() -> u32 {
    1000
}

const fn default_reveal_threshold() -> f64 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    pub business_name: String,
    /// International number without `+` or spaces, as `wa.me` expects
    pub whatsapp_number: String,
    pub email: EmailConfig,
    #[serde(default)]
    pub labels: SubmitLabels,
    /// Delay between hiding the loader and removing it from the layout
    #[serde(default = "default_loader_delay_ms")]
    pub loader_delay_ms: u32,
    /// Fraction of a section that must be visible before it is revealed
    #[serde(default = "default_reveal_threshold")]
    pub reveal_threshold: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must not be empty")]
    Missing { field: &'static str },
    #[error("whatsapp number must contain only digits (got {value})")]
    WhatsappNumber { value: String },
    #[error("reveal threshold must be in (0, 1] (got {value:.2})")]
    RevealThreshold { value: f64 },
}

impl SiteConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the embedded configuration with compile-time overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON or an override is invalid.
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(DEFAULT_SITE_JSON)?;
        config.apply_overrides(
            option_env!("BOOKING_EMAILJS_PUBLIC_KEY"),
            option_env!("BOOKING_WHATSAPP_NUMBER"),
        );
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, public_key: Option<&str>, whatsapp_number: Option<&str>) {
        if let Some(key) = public_key.map(str::trim).filter(|k| !k.is_empty()) {
            self.email.public_key = key.to_string();
        }
        if let Some(number) = whatsapp_number.map(str::trim).filter(|n| !n.is_empty()) {
            self.whatsapp_number = number.to_string();
        }
    }

    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("business_name", &self.business_name),
            ("whatsapp_number", &self.whatsapp_number),
            ("email.public_key", &self.email.public_key),
            ("email.service_id", &self.email.service_id),
            ("email.template_id", &self.email.template_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing { field });
            }
        }
        if !self.whatsapp_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::WhatsappNumber {
                value: self.whatsapp_number.clone(),
            });
        }
        if !(self.reveal_threshold > 0.0 && self.reveal_threshold <= 1.0) {
            return Err(ConfigError::RevealThreshold {
                value: self.reveal_threshold,
            });
        }
        Ok(())
    }
}
