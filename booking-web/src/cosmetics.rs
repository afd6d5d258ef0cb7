//! Best-effort page behaviors unrelated to the booking itself. Every function
//! tolerates missing elements.
use gloo_events::EventListener;
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlInputElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::dom;

pub const LOADER_ID: &str = "loading";
pub const DATE_ID: &str = "date";
pub const MENU_TOGGLE_SELECTOR: &str = ".menu-toggle";
pub const NAV_LINKS_SELECTOR: &str = ".nav-links";
pub const REVEAL_SELECTOR: &str = "section";

/// Fade out the loading overlay once the page has fully loaded, then remove it.
///
/// When the `load` event already fired before the module started, the
/// overlay is hidden right away.
///
/// # Errors
/// Returns an error if there is no window to listen on.
pub fn hide_loader_on_load(document: &Document, delay_ms: u32) -> Result<(), JsValue> {
    if document.ready_state() == "complete" {
        hide_loader(document, delay_ms);
        return Ok(());
    }
    let win = dom::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let doc = document.clone();
    EventListener::once(&win, "load", move |_| hide_loader(&doc, delay_ms)).forget();
    Ok(())
}

fn hide_loader(document: &Document, delay_ms: u32) {
    let Some(loader) = document.get_element_by_id(LOADER_ID) else {
        return;
    };
    if let Err(err) = loader.class_list().add_1("hidden") {
        log::warn!("could not hide loader: {}", dom::js_error_message(&err));
    }
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = dom::sleep_ms(delay).await {
            log::warn!("loader removal timer failed: {}", dom::js_error_message(&err));
        }
        loader.remove();
    });
}

/// Prevent picking a pickup date in the past.
pub fn set_date_floor(document: &Document) {
    if let Some(input) = dom::by_id::<HtmlInputElement>(document, DATE_ID) {
        input.set_min(&dom::today_iso());
    }
}

/// Mobile navigation: the menu button toggles `active` on the nav panel and
/// mirrors the state into `aria-expanded`.
///
/// # Errors
/// Returns an error if the toggle selector cannot be queried.
pub fn wire_nav_toggle(document: &Document) -> Result<(), JsValue> {
    let Some(toggle) = document.query_selector(MENU_TOGGLE_SELECTOR)? else {
        return Ok(());
    };
    let doc = document.clone();
    let button = toggle.clone();
    EventListener::new(&toggle, "click", move |_| {
        toggle_nav(&doc, &button);
    })
    .forget();
    Ok(())
}

/// Flip the nav panel and return whether it is now expanded.
pub fn toggle_nav(document: &Document, toggle: &Element) -> Option<bool> {
    let nav = document.query_selector(NAV_LINKS_SELECTOR).ok().flatten()?;
    let expanded = nav.class_list().toggle("active").ok()?;
    let _ = toggle.set_attribute("aria-expanded", if expanded { "true" } else { "false" });
    Some(expanded)
}

/// Add `visible` to each section the first time enough of it scrolls into view.
///
/// # Errors
/// Returns an error if the observer cannot be created.
pub fn observe_reveals(document: &Document, threshold: f64) -> Result<(), JsValue> {
    let Some(root) = document.document_element() else {
        return Ok(());
    };
    let sections = dom::query_all(&root, REVEAL_SELECTOR);
    if sections.is_empty() {
        return Ok(());
    }

    let on_intersect = Closure::wrap(Box::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    let target = entry.target();
                    let _ = target.class_list().add_1("visible");
                    observer.unobserve(&target);
                }
            }
        },
    ) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(
        on_intersect.as_ref().unchecked_ref(),
        &options,
    )?;
    for section in &sections {
        observer.observe(section);
    }
    on_intersect.forget();
    Ok(())
}
