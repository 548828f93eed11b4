//! DOM snapshot types
//!
//! The host web application is treated as an opaque, semi-structured data source:
//! - ElementNode: attributes and text of one matched element
//! - Page: the document a scroll-extract loop queries and scrolls

pub mod element;
pub mod page;

pub use element::ElementNode;
pub use page::Page;
