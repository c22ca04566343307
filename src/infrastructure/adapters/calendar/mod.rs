//! Calendar Adapter - Hebcal 客户端与静态日历

mod hebcal_client;
mod static_calendar;

pub use hebcal_client::{HebcalClient, HebcalClientConfig};
pub use static_calendar::StaticCalendar;
