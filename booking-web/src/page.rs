//! The booking form adapter: reads the page into the `BookingSession` model,
//! renders the model back, and runs submissions.
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use booking_core::{
    BookingSession, Catalog, ContactDetails, FormSnapshot, FormState, FormView, RowRemoval,
    SiteConfig, SubmitContext, SubmitOutcome, submit_booking,
};
use gloo_events::{EventListener, EventListenerOptions};
use thiserror::Error;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement};

use crate::dom;
use crate::relay::{EmailJsRelay, SweetAlertPrompter};
use crate::rows::{RowEvent, RowEvents, RowHandle, RowList};

pub const FORM_ID: &str = "bookingForm";
pub const SUBMIT_ID: &str = "submitBtn";
pub const TOTAL_ID: &str = "totalPrice";
pub const ITEMS_ID: &str = "itemsContainer";
pub const ADD_ITEM_ID: &str = "addItem";
const CONTACT_IDS: [&str; 6] = ["name", "phone", "hostel", "date", "time", "description"];

#[derive(Debug, Error)]
pub enum PageError {
    #[error("required element #{0} is missing")]
    MissingElement(&'static str),
    #[error("DOM error: {0}")]
    Dom(String),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        Self::Dom(dom::js_error_message(&value))
    }
}

struct PageElements {
    document: Document,
    form: HtmlFormElement,
    submit: HtmlButtonElement,
    total: Element,
    add_item: HtmlElement,
}

struct PageInner {
    catalog: Catalog,
    config: SiteConfig,
    session: RefCell<BookingSession>,
    elements: PageElements,
    rows: RefCell<RowList>,
    listeners: RefCell<Vec<EventListener>>,
}

/// A mounted booking form. Dropping it detaches every listener it registered.
pub struct BookingPage {
    inner: Rc<PageInner>,
}

impl BookingPage {
    /// Take over the booking form in `document`.
    ///
    /// # Errors
    /// Returns an error if a required element is missing or the rows cannot be set up.
    pub fn mount(
        document: &Document,
        catalog: Catalog,
        config: SiteConfig,
    ) -> Result<Self, PageError> {
        let required = |id: &'static str| {
            document
                .get_element_by_id(id)
                .ok_or(PageError::MissingElement(id))
        };
        let elements = PageElements {
            document: document.clone(),
            form: dom::by_id(document, FORM_ID).ok_or(PageError::MissingElement(FORM_ID))?,
            submit: dom::by_id(document, SUBMIT_ID).ok_or(PageError::MissingElement(SUBMIT_ID))?,
            total: required(TOTAL_ID)?,
            add_item: dom::by_id(document, ADD_ITEM_ID)
                .ok_or(PageError::MissingElement(ADD_ITEM_ID))?,
        };
        let container = required(ITEMS_ID)?;

        let inner = Rc::new(PageInner {
            catalog,
            config,
            session: RefCell::new(BookingSession::new()),
            elements,
            rows: RefCell::new(RowList::new(container)),
            listeners: RefCell::new(Vec::new()),
        });

        adopt_initial_row(&inner)?;
        attach_page_listeners(&inner);
        inner.render(&inner.snapshot());
        log::debug!(
            "booking form mounted with {} row(s)",
            inner.session.borrow().form().row_count()
        );
        Ok(Self { inner })
    }

    /// Current model, for diagnostics and tests.
    #[must_use]
    pub fn form(&self) -> FormState {
        self.inner.session.borrow().form().clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot {
        self.inner.snapshot()
    }
}

fn row_events(inner: &Rc<PageInner>) -> RowEvents {
    let weak: Weak<PageInner> = Rc::downgrade(inner);
    Rc::new(move |event| {
        if let Some(inner) = weak.upgrade() {
            inner.on_row_event(event);
        }
    })
}

/// Wire the row(s) shipped in the markup to the model's single initial row.
fn adopt_initial_row(inner: &Rc<PageInner>) -> Result<(), PageError> {
    let events = row_events(inner);
    let first_id = inner.session.borrow().form().rows()[0].id;
    let document = &inner.elements.document;

    let mut rows = inner.rows.borrow_mut();
    let existing = rows.existing_rows();
    let adopted = existing.into_iter().next().and_then(|el| {
        RowHandle::adopt(document, el, &inner.catalog, first_id, &events)
            .map_err(|err| {
                log::warn!(
                    "existing item row unusable, rendering a new one: {}",
                    dom::js_error_message(&err)
                );
            })
            .ok()
    });
    let handle = match adopted {
        Some(handle) => handle,
        None => RowHandle::render_new(document, &inner.catalog, first_id, &events)?,
    };
    let (item, quantity) = handle.inputs();
    rows.push(handle)?;
    rows.prune_unowned();
    drop(rows);

    inner
        .session
        .borrow_mut()
        .form_mut()
        .apply_inputs(first_id, &item, &quantity);
    Ok(())
}

fn attach_page_listeners(inner: &Rc<PageInner>) {
    let mut listeners = inner.listeners.borrow_mut();

    let weak = Rc::downgrade(inner);
    listeners.push(EventListener::new(&inner.elements.add_item, "click", move |_| {
        if let Some(inner) = weak.upgrade() {
            inner.add_row();
        }
    }));

    // Must not be passive or the browser ignores prevent_default.
    let weak = Rc::downgrade(inner);
    listeners.push(EventListener::new_with_options(
        &inner.elements.form,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            if let Some(inner) = weak.upgrade() {
                start_submission(inner);
            }
        },
    ));
}

fn start_submission(inner: Rc<PageInner>) {
    if inner.elements.submit.disabled() {
        return;
    }
    wasm_bindgen_futures::spawn_local(async move {
        let relay = EmailJsRelay;
        let prompter = SweetAlertPrompter;
        let ctx = SubmitContext {
            catalog: &inner.catalog,
            config: &inner.config,
            relay: &relay,
            prompter: &prompter,
            view: &*inner,
        };
        match submit_booking(&inner.session, &ctx).await {
            Ok(SubmitOutcome::Sent { chat_opened, .. }) => {
                log::debug!("booking submission finished (chat opened: {chat_opened})");
            }
            Ok(SubmitOutcome::Failed { .. }) => {}
            Err(rejected) => log::debug!("submit ignored: {rejected}"),
        }
    });
}

impl PageInner {
    fn snapshot(&self) -> FormSnapshot {
        self.session.borrow().snapshot(&self.catalog)
    }

    fn refresh(&self) {
        self.render(&self.snapshot());
    }

    fn on_row_event(&self, event: RowEvent) {
        match event {
            RowEvent::Input(id) => {
                let inputs = self.rows.borrow().get(id).map(RowHandle::inputs);
                if let Some((item, quantity)) = inputs {
                    self.session
                        .borrow_mut()
                        .form_mut()
                        .apply_inputs(id, &item, &quantity);
                }
            }
            RowEvent::Remove(id) => {
                let removal = self.session.borrow_mut().form_mut().remove_row(id);
                if removal == RowRemoval::Removed {
                    self.rows.borrow_mut().remove(id);
                }
            }
        }
        self.refresh();
    }

    fn add_row(self: &Rc<Self>) {
        let id = self.session.borrow_mut().form_mut().add_row();
        let events = row_events(self);
        let pushed = RowHandle::render_new(&self.elements.document, &self.catalog, id, &events)
            .and_then(|handle| self.rows.borrow_mut().push(handle));
        if let Err(err) = pushed {
            log::error!("could not add item row: {}", dom::js_error_message(&err));
            self.session.borrow_mut().form_mut().remove_row(id);
        }
        self.refresh();
    }
}

impl FormView for PageInner {
    fn read_contact(&self) -> ContactDetails {
        let doc = &self.elements.document;
        let [name, phone, hostel, date, time, description] =
            CONTACT_IDS.map(|id| dom::field_value(doc, id));
        ContactDetails {
            name,
            phone,
            hostel,
            date,
            time,
            description,
        }
    }

    fn render(&self, snapshot: &FormSnapshot) {
        let elements = &self.elements;
        elements
            .total
            .set_text_content(Some(&snapshot.total.display));
        elements.submit.set_disabled(!snapshot.submit_enabled());
        let labels = &self.config.labels;
        let label = if snapshot.submitting {
            &labels.busy
        } else {
            &labels.idle
        };
        elements.submit.set_text_content(Some(label));
        self.rows
            .borrow()
            .set_remove_visible(snapshot.remove_visible);
    }

    fn reset(&self, form: &FormState) {
        self.elements.form.reset();
        self.elements.total.set_text_content(Some("0.00"));
        self.rows.borrow_mut().sync(form.rows());
    }
}
