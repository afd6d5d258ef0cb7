pub mod page;
pub mod session;

pub use page::{BookingPageDriver, PageState};
pub use session::{BrowserConfig, BrowserKind, new_session};
