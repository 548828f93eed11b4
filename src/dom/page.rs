use crate::dom::element::ElementNode;
use crate::error::Result;

/// A live, mutating document the scroll-extract loop reads from and scrolls.
///
/// Calls are synchronous: a loop never suspends in the middle of a query or a scroll.
pub trait Page: Send + Sync {
    /// Snapshot every element currently matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Result<Vec<ElementNode>>;

    /// Scroll the window forward by `pixels`
    fn scroll_by(&self, pixels: i64) -> Result<()>;

    /// `scrollHeight` of the first element matching `selector`, or `None` if absent
    fn scroll_height(&self, selector: &str) -> Result<Option<f64>>;

    /// URL of the document
    fn current_url(&self) -> Result<String>;
}
