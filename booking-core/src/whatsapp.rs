//! Prefilled WhatsApp chat offered after a booking is sent.
use crate::request::BookingRequest;

const WA_ME_BASE: &str = "https://wa.me/";

/// Plain-text chat message summarizing the booking.
#[must_use]
pub fn whatsapp_message(
    request: &BookingRequest,
    business_name: &str,
    currency_symbol: &str,
) -> String {
    let contact = &request.contact;
    let mut items = request.items.to_text();
    if !items.ends_with('\n') {
        items.push('\n');
    }
    format!(
        "Hi {business_name}!\n\nBooking request:\nName: {name}\nHostel: {hostel}\nPickup: {date} at {time}\nItems:\n{items}Total: {currency_symbol}{total}\n\nPlease confirm. Thank you!",
        name = contact.name,
        hostel = contact.hostel,
        date = contact.date,
        time = contact.time,
        total = request.total_display(),
    )
}

/// `wa.me` deep link with the message percent-encoded into `text`.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    format!("{WA_ME_BASE}{number}?text={}", urlencoding::encode(message))
}
