use crate::dom::ElementNode;
use crate::extract::{ExtractedItem, ExtractionState, ExtractionStrategy, SITE_ORIGIN};
use crate::relay::BackupEvent;
use crate::run::RunKind;

/// Post analytics links, one per rendered bookmarked post
pub const BOOKMARK_SELECTOR: &str = r#"a[href*="/analytics"]"#;

const ANALYTICS_SUFFIX: &str = "/analytics";

/// Canonical post URL for an analytics or status href
pub fn canonical_post_url(href: &str) -> Option<String> {
    if let Some(end) = href.rfind(ANALYTICS_SUFFIX) {
        return Some(format!("{}{}", SITE_ORIGIN, &href[..end]));
    }
    if href.contains("/status/") {
        return Some(format!("{}{}", SITE_ORIGIN, href));
    }
    None
}

/// Bookmarked posts, streamed to the aggregator as they are discovered
#[derive(Default)]
pub struct BookmarksStrategy {
    state: ExtractionState,
}

impl BookmarksStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtractionStrategy for BookmarksStrategy {
    fn kind(&self) -> RunKind {
        RunKind::Bookmarks
    }

    fn selector(&self) -> &str {
        BOOKMARK_SELECTOR
    }

    fn parse(&self, node: &ElementNode) -> Option<ExtractedItem> {
        let href = node.non_empty_attribute("href")?;
        canonical_post_url(href).map(ExtractedItem::keyed_by_value)
    }

    fn state(&self) -> &ExtractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ExtractionState {
        &mut self.state
    }

    fn reports_incrementally(&self) -> bool {
        true
    }

    fn completion_event(&self) -> BackupEvent {
        BackupEvent::BookmarkExtractionComplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analytics_link(href: &str) -> ElementNode {
        ElementNode::new("a").with_attribute("href", href)
    }

    #[test]
    fn test_canonical_post_url() {
        assert_eq!(
            canonical_post_url("/user/status/123/analytics"),
            Some("https://x.com/user/status/123".to_string())
        );
        assert_eq!(canonical_post_url("/user/status/123"), Some("https://x.com/user/status/123".to_string()));
        assert_eq!(canonical_post_url("/user/likes"), None);
    }

    #[test]
    fn test_last_analytics_segment_is_stripped() {
        assert_eq!(
            canonical_post_url("/analytics/status/9/analytics"),
            Some("https://x.com/analytics/status/9".to_string())
        );
    }

    #[test]
    fn test_identical_link_is_noop() {
        let mut strategy = BookmarksStrategy::new();

        let found = strategy.scan(&[analytics_link("/user/status/123/analytics")]);
        assert_eq!(found, vec![ExtractedItem::keyed_by_value("https://x.com/user/status/123")]);

        let found = strategy.scan(&[
            analytics_link("/user/status/123/analytics"),
            analytics_link("/user/status/123/analytics"),
        ]);
        assert!(found.is_empty());
        assert_eq!(strategy.state().len(), 1);
    }

    #[test]
    fn test_skips_links_without_href() {
        let mut strategy = BookmarksStrategy::new();
        let found = strategy.scan(&[ElementNode::new("a"), analytics_link(""), analytics_link("/home")]);

        assert!(found.is_empty());
    }

    #[test]
    fn test_completion_event_is_signal_only() {
        let mut strategy = BookmarksStrategy::new();
        strategy.scan(&[analytics_link("/a/status/1/analytics")]);

        assert_eq!(strategy.completion_event(), BackupEvent::BookmarkExtractionComplete);
    }
}
