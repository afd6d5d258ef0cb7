//! Browser implementations of the booking-core collaborator traits.
use booking_core::{
    Dialog, DialogBody, DialogChoice, DialogIcon, EmailConfig, EmailRelay, Prompter, RelayError,
    TemplateParams,
};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::bindings;
use crate::dom;

/// Sends bookings through the EmailJS browser SDK.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailJsRelay;

#[async_trait::async_trait(?Send)]
impl EmailRelay for EmailJsRelay {
    async fn send(&self, email: &EmailConfig, params: &TemplateParams) -> Result<(), RelayError> {
        let payload = serde_wasm_bindgen::to_value(params)
            .map_err(|err| RelayError::Unavailable(format!("payload encoding failed: {err}")))?;
        let promise = bindings::emailjs_send(&email.service_id, &email.template_id, &payload)
            .map_err(|err| RelayError::Unavailable(dom::js_error_message(&err)))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|err| relay_error_from_js(&err))
    }
}

/// EmailJS rejects with `{ status, text }`. Anything else means the relay was unreachable.
fn relay_error_from_js(value: &JsValue) -> RelayError {
    let status = js_sys::Reflect::get(value, &"status".into())
        .ok()
        .and_then(|v| v.as_f64());
    let text = js_sys::Reflect::get(value, &"text".into())
        .ok()
        .and_then(|v| v.as_string());
    relay_error_from_parts(status, text, || dom::js_error_message(value))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn relay_error_from_parts(
    status: Option<f64>,
    text: Option<String>,
    fallback: impl FnOnce() -> String,
) -> RelayError {
    match status {
        Some(code) if code.is_finite() && (0.0..=f64::from(u16::MAX)).contains(&code) => {
            RelayError::Rejected {
                status: code as u16,
                text: text.unwrap_or_default(),
            }
        }
        _ => RelayError::Unavailable(text.unwrap_or_else(fallback)),
    }
}

/// Shows dialogs with SweetAlert2 and opens chat links in a new tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweetAlertPrompter;

#[async_trait::async_trait(?Send)]
impl Prompter for SweetAlertPrompter {
    async fn prompt(&self, dialog: &Dialog) -> DialogChoice {
        let options = match serde_wasm_bindgen::to_value(&SwalOptions::from(dialog)) {
            Ok(options) => options,
            Err(err) => {
                log::warn!("could not encode dialog options: {err}");
                return DialogChoice::Dismissed;
            }
        };
        let promise = match bindings::swal_fire(&options) {
            Ok(promise) => promise,
            Err(err) => {
                log::warn!("dialog unavailable: {}", dom::js_error_message(&err));
                return DialogChoice::Dismissed;
            }
        };
        match JsFuture::from(promise).await {
            Ok(result) => {
                let confirmed = js_sys::Reflect::get(&result, &"isConfirmed".into())
                    .ok()
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                if confirmed {
                    DialogChoice::Confirmed
                } else {
                    DialogChoice::Dismissed
                }
            }
            Err(err) => {
                log::warn!("dialog failed: {}", dom::js_error_message(&err));
                DialogChoice::Dismissed
            }
        }
    }

    fn open_chat(&self, url: &str) {
        let Some(win) = dom::window() else {
            dom::console_error("Failed to open chat: window unavailable");
            return;
        };
        if let Err(err) = win.open_with_url_and_target(url, "_blank") {
            dom::console_error(&format!(
                "Failed to open chat: {}",
                dom::js_error_message(&err)
            ));
        }
    }
}

/// Option object accepted by `Swal.fire`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwalOptions<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    icon: DialogIcon,
    show_cancel_button: bool,
    confirm_button_text: &'a str,
    confirm_button_color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_button_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_button_color: Option<&'a str>,
}

impl<'a> From<&'a Dialog> for SwalOptions<'a> {
    fn from(dialog: &'a Dialog) -> Self {
        let (html, text) = match &dialog.body {
            DialogBody::Html(html) => (Some(html.as_str()), None),
            DialogBody::Text(text) => (None, Some(text.as_str())),
        };
        Self {
            title: &dialog.title,
            html,
            text,
            icon: dialog.icon,
            show_cancel_button: dialog.cancel.is_some(),
            confirm_button_text: &dialog.confirm.label,
            confirm_button_color: &dialog.confirm.color,
            cancel_button_text: dialog.cancel.as_ref().map(|b| b.label.as_str()),
            cancel_button_color: dialog.cancel.as_ref().map(|b| b.color.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sent_dialog_maps_to_swal_options() {
        let dialog = Dialog::booking_sent();
        let value = serde_json::to_value(SwalOptions::from(&dialog)).expect("json");
        assert_eq!(value["title"], "Booking Sent!");
        assert_eq!(value["icon"], "success");
        assert_eq!(value["showCancelButton"], true);
        assert_eq!(value["confirmButtonText"], "Chat on WhatsApp Now");
        assert_eq!(value["confirmButtonColor"], "#28a745");
        assert_eq!(value["cancelButtonText"], "Close");
        assert_eq!(value["cancelButtonColor"], "#6c757d");
        assert!(value["html"].as_str().is_some_and(|h| h.contains("<br><br>")));
        assert!(value.get("text").is_none());
    }

    #[test]
    fn failed_dialog_omits_cancel_fields() {
        let dialog = Dialog::booking_failed();
        let value = serde_json::to_value(SwalOptions::from(&dialog)).expect("json");
        assert_eq!(
            value,
            json!({
                "title": "Oops...",
                "text": "Something went wrong. Try WhatsApp booking instead.",
                "icon": "error",
                "showCancelButton": false,
                "confirmButtonText": "OK",
                "confirmButtonColor": "#dc3545"
            })
        );
    }

    #[test]
    fn relay_errors_keep_status_and_text() {
        let err = relay_error_from_parts(Some(412.0), Some("bad key".into()), String::new);
        assert_eq!(
            err,
            RelayError::Rejected {
                status: 412,
                text: "bad key".into()
            }
        );
    }

    #[test]
    fn relay_errors_without_status_are_unavailable() {
        let err = relay_error_from_parts(None, None, || "NetworkError".to_string());
        assert_eq!(err, RelayError::Unavailable("NetworkError".into()));
        let err = relay_error_from_parts(Some(f64::NAN), Some("weird".into()), String::new);
        assert_eq!(err, RelayError::Unavailable("weird".into()));
    }
}
