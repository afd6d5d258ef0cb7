//! Booking request assembled at submit time.
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::form::{ContactDetails, FormState};
use crate::pricing::format_total;
use crate::summary::ItemsSummary;

/// Everything the business needs to act on a booking. Built fresh per submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub contact: ContactDetails,
    pub items: ItemsSummary,
    pub total_cents: i64,
}

/// Key-value payload handed to the email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub name: String,
    pub phone: String,
    pub hostel: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub items: String,
    pub total: String,
}

impl BookingRequest {
    #[must_use]
    pub fn from_form(form: &FormState, contact: ContactDetails, catalog: &Catalog) -> Self {
        Self {
            contact,
            items: ItemsSummary::from_rows(form.rows(), catalog),
            total_cents: form.total_cents(catalog),
        }
    }

    /// Two-decimal total as shown on the page.
    #[must_use]
    pub fn total_display(&self) -> String {
        format_total(self.total_cents)
    }

    #[must_use]
    pub fn template_params(&self) -> TemplateParams {
        let contact = &self.contact;
        TemplateParams {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            hostel: contact.hostel.clone(),
            date: contact.date.clone(),
            time: contact.time.clone(),
            description: contact.description.clone(),
            items: self.items.to_text(),
            total: self.total_display(),
        }
    }
}
