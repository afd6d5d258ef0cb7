//! Booking Core
//!
//! Platform-agnostic logic for the Kodak Logistics booking page: the item
//! catalog, the form model, pricing, the booking payload, the WhatsApp
//! follow-up and the submission lifecycle. Browser collaborators are reached
//! only through the traits defined here.

pub mod catalog;
pub mod config;
pub mod dialog;
pub mod form;
pub mod pricing;
pub mod request;
pub mod submit;
pub mod summary;
pub mod whatsapp;

pub use catalog::{Catalog, CatalogError, CatalogItem};
pub use config::{ConfigError, EmailConfig, SiteConfig, SubmitLabels};
pub use dialog::{Dialog, DialogBody, DialogButton, DialogChoice, DialogIcon};
pub use form::{ContactDetails, FormState, ItemRow, RowId, RowRemoval, parse_quantity};
pub use pricing::{TotalView, compute_total, format_total, submit_enabled};
pub use request::{BookingRequest, TemplateParams};
pub use submit::{
    BookingSession, FormSnapshot, RelayError, SubmitContext, SubmitOutcome, SubmitPhase,
    SubmitRejected, submit_booking,
};
pub use summary::{ItemsSummary, NO_ITEMS_PLACEHOLDER};
pub use whatsapp::{whatsapp_link, whatsapp_message};

/// Delivery of a booking to the third-party email relay.
/// Platform-specific implementations should provide this
#[async_trait::async_trait(?Send)]
pub trait EmailRelay {
    /// Send the template parameters through the configured service and template.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay rejects the request or cannot be reached.
    async fn send(&self, email: &EmailConfig, params: &TemplateParams) -> Result<(), RelayError>;
}

/// Modal dialogs and the external chat link.
#[async_trait::async_trait(?Send)]
pub trait Prompter {
    /// Show a dialog and wait for the user's decision.
    async fn prompt(&self, dialog: &Dialog) -> DialogChoice;

    /// Open a chat deep link in a new browsing context. Nothing is awaited.
    fn open_chat(&self, url: &str);
}

/// The page surface the submission flow reads from and writes to.
pub trait FormView {
    /// Current contact field values; absent fields read as empty strings.
    fn read_contact(&self) -> ContactDetails;

    /// Write total, submit state/label and remove-button visibility.
    fn render(&self, snapshot: &FormSnapshot);

    /// Clear every field and bring the rows in line with a freshly reset form.
    fn reset(&self, form: &FormState);
}
