//! Submission lifecycle against scripted collaborators.
use anyhow::{Result, bail, ensure};
use booking_core::{
    BookingSession, ContactDetails, Dialog, DialogChoice, EmailConfig, EmailRelay, FormSnapshot,
    FormState, FormView, Prompter, RelayError, SubmitContext, SubmitOutcome, SubmitPhase,
    SubmitRejected, TemplateParams, submit_booking,
};
use futures::executor::block_on;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::cell::{Cell, RefCell};

use crate::logic::TesterAssets;
use crate::logic::actions::random_form;

struct ScriptedRelay {
    outcome: Result<(), RelayError>,
    calls: Cell<usize>,
}

#[async_trait::async_trait(?Send)]
impl EmailRelay for ScriptedRelay {
    async fn send(&self, _email: &EmailConfig, _params: &TemplateParams) -> Result<(), RelayError> {
        self.calls.set(self.calls.get() + 1);
        self.outcome.clone()
    }
}

struct ScriptedPrompter {
    answer: DialogChoice,
    opened: RefCell<Vec<String>>,
}

#[async_trait::async_trait(?Send)]
impl Prompter for ScriptedPrompter {
    async fn prompt(&self, _dialog: &Dialog) -> DialogChoice {
        self.answer
    }

    fn open_chat(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }
}

#[derive(Default)]
struct RecordingView {
    renders: RefCell<Vec<FormSnapshot>>,
    resets: Cell<usize>,
}

impl FormView for RecordingView {
    fn read_contact(&self) -> ContactDetails {
        ContactDetails {
            name: "QA Runner".to_string(),
            ..ContactDetails::default()
        }
    }

    fn render(&self, snapshot: &FormSnapshot) {
        self.renders.borrow_mut().push(snapshot.clone());
    }

    fn reset(&self, _form: &FormState) {
        self.resets.set(self.resets.get() + 1);
    }
}

/// One submission with a random form, relay outcome and dialog answer.
pub fn submit_lifecycle(rng: &mut ChaCha8Rng, assets: &TesterAssets) -> Result<()> {
    let catalog = &assets.catalog;
    let form = random_form(rng, catalog, 30);
    let total = form.total_cents(catalog);

    let mut seeded = BookingSession::new();
    *seeded.form_mut() = form.clone();
    let session = RefCell::new(seeded);

    let relay = ScriptedRelay {
        outcome: if rng.gen_bool(0.5) {
            Ok(())
        } else {
            Err(RelayError::Rejected {
                status: 400,
                text: "scripted failure".to_string(),
            })
        },
        calls: Cell::new(0),
    };
    let prompter = ScriptedPrompter {
        answer: if rng.gen_bool(0.5) {
            DialogChoice::Confirmed
        } else {
            DialogChoice::Dismissed
        },
        opened: RefCell::new(Vec::new()),
    };
    let view = RecordingView::default();
    let ctx = SubmitContext {
        catalog,
        config: &assets.config,
        relay: &relay,
        prompter: &prompter,
        view: &view,
    };

    let outcome = block_on(submit_booking(&session, &ctx));
    let session = session.into_inner();
    ensure!(
        session.phase() == SubmitPhase::Idle,
        "session left in {:?}",
        session.phase()
    );

    if total <= 0 {
        ensure!(
            outcome == Err(SubmitRejected::NothingToSubmit),
            "zero total produced {outcome:?}"
        );
        ensure!(relay.calls.get() == 0, "relay contacted at zero total");
        ensure!(view.renders.borrow().is_empty(), "zero total rendered busy state");
        return Ok(());
    }

    ensure!(relay.calls.get() == 1, "relay called {} times", relay.calls.get());
    let renders = view.renders.borrow();
    ensure!(
        renders.first().is_some_and(|s| s.submitting && !s.submit_enabled()),
        "busy state not rendered first: {renders:?}"
    );
    let last = renders
        .last()
        .ok_or_else(|| anyhow::anyhow!("nothing rendered"))?;
    ensure!(!last.submitting, "final render still busy");

    match outcome {
        Ok(SubmitOutcome::Sent {
            request,
            chat_opened,
        }) => {
            ensure!(relay.outcome.is_ok(), "failed relay reported as sent");
            ensure!(request.total_cents == total, "request total drifted");
            let reset = session.form();
            ensure!(
                reset.row_count() == 1
                    && reset.rows()[0].item.is_none()
                    && reset.rows()[0].quantity == 1,
                "form not reset after send: {:?}",
                reset.rows()
            );
            ensure!(view.resets.get() == 1, "view reset {} times", view.resets.get());
            ensure!(!last.submit_enabled(), "submit enabled on an empty form");
            let opened = prompter.opened.borrow();
            ensure!(
                chat_opened == (prompter.answer == DialogChoice::Confirmed),
                "chat opened {chat_opened} for {:?}",
                prompter.answer
            );
            ensure!(opened.len() == usize::from(chat_opened), "chat opened {} times", opened.len());
            ensure!(
                opened.iter().all(|url| url.starts_with("https://wa.me/")),
                "unexpected chat link {opened:?}"
            );
        }
        Ok(SubmitOutcome::Failed { error }) => {
            ensure!(relay.outcome.is_err(), "delivered booking reported as failed: {error}");
            ensure!(*session.form() == form, "failure changed the form");
            ensure!(view.resets.get() == 0, "failure reset the view");
            ensure!(last.submit_enabled(), "submit not re-enabled after failure");
            ensure!(prompter.opened.borrow().is_empty(), "chat opened after failure");
        }
        Err(rejected) => bail!("positive total {total} rejected: {rejected}"),
    }

    single_flight(&form, assets)
}

/// A second begin while one is in flight is refused.
fn single_flight(form: &FormState, assets: &TesterAssets) -> Result<()> {
    let mut session = BookingSession::new();
    *session.form_mut() = form.clone();
    session
        .begin(ContactDetails::default(), &assets.catalog)
        .map_err(|err| anyhow::anyhow!("first begin refused: {err}"))?;
    ensure!(
        session.begin(ContactDetails::default(), &assets.catalog)
            == Err(SubmitRejected::AlreadySubmitting),
        "second submission accepted while busy"
    );
    session.finish(&Err(RelayError::Unavailable("offline".to_string())));
    ensure!(!session.is_submitting(), "finish left the session busy");
    Ok(())
}
