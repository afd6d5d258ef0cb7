//! DOM side of the item rows.
//!
//! Each `RowHandle` owns its elements and the listeners registered on them;
//! removing a row drops the handle, which detaches its listeners. Event
//! handlers only report what happened through a `RowEvents` sink and never
//! touch the form model themselves.
use std::rc::Rc;

use booking_core::{Catalog, ItemRow, RowId};
use gloo_events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, Node,
};

use crate::dom;

pub const ROW_CLASS: &str = "item-row";
pub const SELECT_CLASS: &str = "itemSelect";
pub const QUANTITY_CLASS: &str = "quantity";
pub const REMOVE_CLASS: &str = "remove-btn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEvent {
    /// The select or quantity of a row changed.
    Input(RowId),
    /// The row's remove button was clicked.
    Remove(RowId),
}

pub type RowEvents = Rc<dyn Fn(RowEvent)>;

pub struct RowHandle {
    id: RowId,
    element: Element,
    select: HtmlSelectElement,
    quantity: HtmlInputElement,
    remove: Option<HtmlElement>,
    _listeners: Vec<EventListener>,
}

impl RowHandle {
    /// Build a fresh row from the catalog. The caller appends it to the container.
    ///
    /// # Errors
    /// Returns an error if any element cannot be created.
    pub fn render_new(
        document: &Document,
        catalog: &Catalog,
        id: RowId,
        events: &RowEvents,
    ) -> Result<Self, JsValue> {
        let element = document.create_element("div")?;
        element.set_class_name(ROW_CLASS);

        let select = document
            .create_element("select")?
            .dyn_into::<HtmlSelectElement>()?;
        select.set_class_name(SELECT_CLASS);
        select.set_required(true);
        populate_options(document, &select, catalog, None)?;

        let quantity = document
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()?;
        quantity.set_type("number");
        quantity.set_class_name(QUANTITY_CLASS);
        quantity.set_min("1");
        quantity.set_value("1");
        quantity.set_required(true);
        quantity.set_attribute("aria-label", "Quantity")?;

        let remove = document
            .create_element("button")?
            .dyn_into::<HtmlElement>()?;
        remove.set_attribute("type", "button")?;
        remove.set_class_name(REMOVE_CLASS);
        remove.set_text_content(Some("× Remove"));

        element.append_child(&select)?;
        element.append_child(&quantity)?;
        element.append_child(&remove)?;

        Ok(Self::wire(id, element, select, quantity, Some(remove), events))
    }

    /// Take over a row that was already in the page markup.
    ///
    /// The select is rebuilt from the catalog, keeping whatever the markup had
    /// selected when it resolves to a catalog item.
    ///
    /// # Errors
    /// Returns an error if the row lacks a select or quantity field.
    pub fn adopt(
        document: &Document,
        element: Element,
        catalog: &Catalog,
        id: RowId,
        events: &RowEvents,
    ) -> Result<Self, JsValue> {
        let select = element
            .query_selector(&format!(".{SELECT_CLASS}"))?
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .ok_or_else(|| JsValue::from_str("row markup has no item select"))?;
        let quantity = element
            .query_selector(&format!(".{QUANTITY_CLASS}"))?
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .ok_or_else(|| JsValue::from_str("row markup has no quantity field"))?;
        let remove = element
            .query_selector(&format!(".{REMOVE_CLASS}"))?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());

        let selected = catalog.lookup(&select.value()).map(|item| item.id.clone());
        populate_options(document, &select, catalog, selected.as_deref())?;

        Ok(Self::wire(id, element, select, quantity, remove, events))
    }

    fn wire(
        id: RowId,
        element: Element,
        select: HtmlSelectElement,
        quantity: HtmlInputElement,
        remove: Option<HtmlElement>,
        events: &RowEvents,
    ) -> Self {
        let mut listeners = Vec::with_capacity(5);
        let targets: [&EventTarget; 2] = [select.as_ref(), quantity.as_ref()];
        for target in targets {
            for event in ["input", "change"] {
                let events = Rc::clone(events);
                listeners.push(EventListener::new(target, event, move |_| {
                    events(RowEvent::Input(id));
                }));
            }
        }
        if let Some(button) = &remove {
            let events = Rc::clone(events);
            listeners.push(EventListener::new(button, "click", move |_| {
                let events = Rc::clone(&events);
                // Removal drops this listener; run it after the handler returns.
                wasm_bindgen_futures::spawn_local(async move {
                    events(RowEvent::Remove(id));
                });
            }));
        }

        Self {
            id,
            element,
            select,
            quantity,
            remove,
            _listeners: listeners,
        }
    }

    #[must_use]
    pub const fn element(&self) -> &Element {
        &self.element
    }

    /// Current raw `(select value, quantity text)`.
    #[must_use]
    pub fn inputs(&self) -> (String, String) {
        (self.select.value(), self.quantity.value())
    }

    /// Write a model row back into the inputs.
    pub fn show(&self, row: &ItemRow) {
        self.select.set_value(row.item.as_deref().unwrap_or(""));
        self.quantity.set_value(&row.quantity.to_string());
    }

    pub fn set_remove_visible(&self, visible: bool) {
        if let Some(button) = &self.remove {
            let display = if visible { "inline-block" } else { "none" };
            if let Err(err) = button.style().set_property("display", display) {
                log::warn!("could not toggle remove button: {}", dom::js_error_message(&err));
            }
        }
    }

    fn detach(&self) {
        self.element.remove();
    }
}

/// Rebuild `select`'s options: the placeholder followed by every catalog item.
fn populate_options(
    document: &Document,
    select: &HtmlSelectElement,
    catalog: &Catalog,
    selected: Option<&str>,
) -> Result<(), JsValue> {
    select.set_inner_html("");
    let placeholder = document
        .create_element("option")?
        .dyn_into::<HtmlOptionElement>()?;
    placeholder.set_value("");
    placeholder.set_text(&catalog.placeholder);
    select.append_child(&placeholder)?;

    for item in &catalog.items {
        let option = document
            .create_element("option")?
            .dyn_into::<HtmlOptionElement>()?;
        option.set_value(&item.id);
        option.set_text(&item.option_label(&catalog.currency_symbol));
        select.append_child(&option)?;
    }
    select.set_value(selected.unwrap_or(""));
    Ok(())
}

/// The rows currently in the items container, in display order.
pub struct RowList {
    container: Element,
    rows: Vec<RowHandle>,
}

impl RowList {
    #[must_use]
    pub const fn new(container: Element) -> Self {
        Self {
            container,
            rows: Vec::new(),
        }
    }

    /// Elements already rendered in the container.
    #[must_use]
    pub fn existing_rows(&self) -> Vec<Element> {
        dom::query_all(&self.container, &format!(".{ROW_CLASS}"))
    }

    /// Append a handle, inserting its element if it is not already in the container.
    ///
    /// # Errors
    /// Returns an error if the element cannot be appended.
    pub fn push(&mut self, handle: RowHandle) -> Result<(), JsValue> {
        let node: &Node = handle.element();
        if !self.container.contains(Some(node)) {
            self.container.append_child(handle.element())?;
        }
        self.rows.push(handle);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: RowId) -> Option<&RowHandle> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Remove a row from the page and drop its listeners.
    pub fn remove(&mut self, id: RowId) -> bool {
        let Some(index) = self.rows.iter().position(|row| row.id == id) else {
            return false;
        };
        let handle = self.rows.remove(index);
        handle.detach();
        true
    }

    /// Keep only rows present in `model` and show the model's values in them.
    pub fn sync(&mut self, model: &[ItemRow]) {
        self.rows.retain(|handle| {
            let keep = model.iter().any(|row| row.id == handle.id);
            if !keep {
                handle.detach();
            }
            keep
        });
        for row in model {
            if let Some(handle) = self.get(row.id) {
                handle.show(row);
            }
        }
    }

    pub fn set_remove_visible(&self, visible: bool) {
        for row in &self.rows {
            row.set_remove_visible(visible);
        }
    }

    /// Remove anything else the container holds, such as stray markup rows.
    pub fn prune_unowned(&self) {
        for el in self.existing_rows() {
            if !self.rows.iter().any(|row| row.element == el) {
                el.remove();
            }
        }
    }
}
