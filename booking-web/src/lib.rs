#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use gloo_events::EventListener;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::cell::RefCell;

use booking_core::{Catalog, CatalogError, ConfigError, SiteConfig};
use thiserror::Error;
use web_sys::Document;

pub mod bindings;
pub mod cosmetics;
pub mod dom;
pub mod page;
pub mod relay;
pub mod rows;

pub use page::{BookingPage, PageError};

thread_local! {
    static MOUNTED: RefCell<Option<BookingPage>> = const { RefCell::new(None) };
}

#[derive(Debug, Error)]
pub enum BootError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("page error: {0}")]
    Page(#[from] PageError),
    #[error("document unavailable")]
    NoDocument,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Some(document) = dom::document() else {
        dom::console_error("booking page: document unavailable");
        return;
    };
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| boot_logged()).forget();
    } else {
        boot_logged();
    }
}

#[cfg(target_arch = "wasm32")]
fn boot_logged() {
    if let Err(err) = boot() {
        log::error!("booking page failed to start: {err}");
    }
}

/// Mount the booking form and the cosmetic behaviors on the current document.
///
/// # Errors
/// Returns an error if the embedded data is invalid or the form markup is incomplete.
pub fn boot() -> Result<(), BootError> {
    let document = dom::document().ok_or(BootError::NoDocument)?;
    let catalog = Catalog::load_default()?;
    let config = SiteConfig::load_default()?;
    boot_with(&document, catalog, config)
}

/// Like [`boot`], with explicit data.
///
/// # Errors
/// Returns an error if the form markup is incomplete.
pub fn boot_with(
    document: &Document,
    catalog: Catalog,
    config: SiteConfig,
) -> Result<(), BootError> {
    if let Err(err) = cosmetics::hide_loader_on_load(document, config.loader_delay_ms) {
        log::warn!("loader hook unavailable: {}", dom::js_error_message(&err));
    }

    if let Err(err) = bindings::emailjs_init(&config.email.public_key) {
        log::warn!("EmailJS init failed: {}", dom::js_error_message(&err));
    }

    cosmetics::set_date_floor(document);
    if let Err(err) = cosmetics::wire_nav_toggle(document) {
        log::warn!("menu toggle unavailable: {}", dom::js_error_message(&err));
    }
    if let Err(err) = cosmetics::observe_reveals(document, config.reveal_threshold) {
        log::warn!("reveal animations unavailable: {}", dom::js_error_message(&err));
    }

    let page = BookingPage::mount(document, catalog, config)?;
    MOUNTED.with(|slot| *slot.borrow_mut() = Some(page));
    log::info!("booking page ready");
    Ok(())
}

/// Detach the mounted booking form, if any.
pub fn unmount() {
    MOUNTED.with(|slot| slot.borrow_mut().take());
}
