//! Submission lifecycle: Idle -> Submitting -> (sent | failed) -> Idle.
//!
//! `BookingSession` holds the form together with the submit phase so that the
//! single-flight rule and the reset-on-success rule live next to the data they
//! guard. `submit_booking` drives one attempt end to end against the
//! platform traits; it never holds a session borrow across an await point.
use std::cell::RefCell;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::dialog::{Dialog, DialogChoice};
use crate::form::{ContactDetails, FormState};
use crate::pricing::TotalView;
use crate::request::BookingRequest;
use crate::whatsapp::{whatsapp_link, whatsapp_message};
use crate::{EmailRelay, FormView, Prompter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
}

/// Why a submit event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a booking is already being sent")]
    AlreadySubmitting,
    #[error("nothing to submit: total is zero")]
    NothingToSubmit,
}

/// Failure reported by the email relay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("relay rejected the booking ({status}): {text}")]
    Rejected { status: u16, text: String },
    #[error("relay unavailable: {0}")]
    Unavailable(String),
}

/// How a submission attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent {
        request: BookingRequest,
        chat_opened: bool,
    },
    Failed {
        error: RelayError,
    },
}

/// What the page should currently show for totals and controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub total: TotalView,
    pub remove_visible: bool,
    pub submitting: bool,
}

impl FormSnapshot {
    /// The submit control is usable only when idle with a positive total.
    #[must_use]
    pub const fn submit_enabled(&self) -> bool {
        self.total.submit_enabled && !self.submitting
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingSession {
    form: FormState,
    phase: SubmitPhase,
}

impl BookingSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    #[must_use]
    pub const fn phase(&self) -> SubmitPhase {
        self.phase
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    #[must_use]
    pub fn snapshot(&self, catalog: &Catalog) -> FormSnapshot {
        FormSnapshot {
            total: self.form.total_view(catalog),
            remove_visible: self.form.remove_visible(),
            submitting: self.is_submitting(),
        }
    }

    /// Enter `Submitting` and build the request, if a submission is allowed now.
    ///
    /// # Errors
    ///
    /// Rejects while another submission is in flight or when the total is not positive.
    pub fn begin(
        &mut self,
        contact: ContactDetails,
        catalog: &Catalog,
    ) -> Result<BookingRequest, SubmitRejected> {
        if self.is_submitting() {
            return Err(SubmitRejected::AlreadySubmitting);
        }
        if !self.form.total_view(catalog).submit_enabled {
            return Err(SubmitRejected::NothingToSubmit);
        }
        self.phase = SubmitPhase::Submitting;
        Ok(BookingRequest::from_form(&self.form, contact, catalog))
    }

    /// Settle the in-flight submission. A delivered booking resets the form;
    /// a failed one leaves it untouched. Either way the session is idle again.
    pub fn finish(&mut self, result: &Result<(), RelayError>) {
        if result.is_ok() {
            self.form.reset();
        }
        self.phase = SubmitPhase::Idle;
    }
}

/// Collaborators needed for one submission.
pub struct SubmitContext<'a, R, P, V> {
    pub catalog: &'a Catalog,
    pub config: &'a SiteConfig,
    pub relay: &'a R,
    pub prompter: &'a P,
    pub view: &'a V,
}

/// Run one submission attempt.
///
/// # Errors
///
/// Returns `SubmitRejected` without contacting the relay when the session is
/// busy or the total is zero.
#[allow(clippy::future_not_send)] // Browser collaborators are not `Send`.
pub async fn submit_booking<R, P, V>(
    session: &RefCell<BookingSession>,
    ctx: &SubmitContext<'_, R, P, V>,
) -> Result<SubmitOutcome, SubmitRejected>
where
    R: EmailRelay,
    P: Prompter,
    V: FormView,
{
    let contact = ctx.view.read_contact();
    let request = session.borrow_mut().begin(contact, ctx.catalog)?;
    render(session, ctx);

    let params = request.template_params();
    let result = ctx.relay.send(&ctx.config.email, &params).await;
    session.borrow_mut().finish(&result);

    match result {
        Ok(()) => {
            ctx.view.reset(session.borrow().form());
            render(session, ctx);
            log::info!(
                "booking sent for {} ({} item lines, total {})",
                request.contact.name,
                request.items.lines.len(),
                request.total_display()
            );

            let choice = ctx.prompter.prompt(&Dialog::booking_sent()).await;
            let chat_opened = choice == DialogChoice::Confirmed;
            if chat_opened {
                let message = whatsapp_message(
                    &request,
                    &ctx.config.business_name,
                    &ctx.catalog.currency_symbol,
                );
                ctx.prompter
                    .open_chat(&whatsapp_link(&ctx.config.whatsapp_number, &message));
            }
            Ok(SubmitOutcome::Sent {
                request,
                chat_opened,
            })
        }
        Err(error) => {
            log::error!("EmailJS error: {error}");
            render(session, ctx);
            let _ = ctx.prompter.prompt(&Dialog::booking_failed()).await;
            Ok(SubmitOutcome::Failed { error })
        }
    }
}

fn render<R, P, V: FormView>(session: &RefCell<BookingSession>, ctx: &SubmitContext<'_, R, P, V>) {
    let snapshot = session.borrow().snapshot(ctx.catalog);
    ctx.view.render(&snapshot);
}
