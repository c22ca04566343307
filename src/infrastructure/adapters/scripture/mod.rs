//! Scripture Adapter - Sefaria 客户端与静态经文源

mod sefaria_client;
mod static_scripture;

pub use sefaria_client::{SefariaClient, SefariaClientConfig};
pub use static_scripture::StaticScripture;
