//! Notification dialogs shown after a submission attempt.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogIcon {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogBody {
    /// Trusted markup authored here, never user input
    Html(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButton {
    pub label: String,
    /// CSS color of the button
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    pub title: String,
    pub body: DialogBody,
    pub icon: DialogIcon,
    pub confirm: DialogButton,
    pub cancel: Option<DialogButton>,
}

/// What the user did with a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Confirmed,
    Dismissed,
}

impl Dialog {
    /// Success notice offering the WhatsApp follow-up.
    #[must_use]
    pub fn booking_sent() -> Self {
        Self {
            title: "Booking Sent!".to_string(),
            body: DialogBody::Html(
                "We'll confirm soon via WhatsApp or call.<br><br>Want faster confirmation?"
                    .to_string(),
            ),
            icon: DialogIcon::Success,
            confirm: DialogButton {
                label: "Chat on WhatsApp Now".to_string(),
                color: "#28a745".to_string(),
            },
            cancel: Some(DialogButton {
                label: "Close".to_string(),
                color: "#6c757d".to_string(),
            }),
        }
    }

    /// Failure notice pointing at the WhatsApp fallback.
    #[must_use]
    pub fn booking_failed() -> Self {
        Self {
            title: "Oops...".to_string(),
            body: DialogBody::Text(
                "Something went wrong. Try WhatsApp booking instead.".to_string(),
            ),
            icon: DialogIcon::Error,
            confirm: DialogButton {
                label: "OK".to_string(),
                color: "#dc3545".to_string(),
            },
            cancel: None,
        }
    }
}
