//! Browser session management
//!
//! - BrowserSession: launch or attach to Chrome via the DevTools Protocol
//! - TabPage: a live tab exposed as a [`Page`](crate::dom::Page)

pub mod config;
pub mod page;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::TabPage;
pub use session::BrowserSession;
