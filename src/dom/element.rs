use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of a single DOM element matched by a selector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "button", "a")
    pub tag_name: String,

    /// Element attributes (e.g., data-testid, aria-label, href)
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
        }
    }

    /// Builder method: add a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Get a non-empty attribute value by key
    pub fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.get_attribute(key).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_creation() {
        let element = ElementNode::new("button")
            .with_attribute("data-testid", "1234-follow")
            .with_attribute("aria-label", "Follow @jack");

        assert_eq!(element.tag_name, "button");
        assert_eq!(element.get_attribute("data-testid"), Some("1234-follow"));
        assert_eq!(element.get_attribute("aria-label"), Some("Follow @jack"));
        assert_eq!(element.get_attribute("href"), None);
    }

    #[test]
    fn test_non_empty_attribute() {
        let element = ElementNode::new("a").with_attribute("href", "").with_attribute("title", "x");

        assert_eq!(element.non_empty_attribute("href"), None);
        assert_eq!(element.non_empty_attribute("title"), Some("x"));
        assert_eq!(element.non_empty_attribute("missing"), None);
    }

    #[test]
    fn test_deserialize_from_page_snapshot() {
        let json = r#"{"tag_name":"a","attributes":{"href":"/user/status/1/analytics"}}"#;
        let element: ElementNode = serde_json::from_str(json).unwrap();

        assert_eq!(element.tag_name, "a");
        assert_eq!(element.get_attribute("href"), Some("/user/status/1/analytics"));

        let bare: ElementNode = serde_json::from_str(r#"{"tag_name":"div"}"#).unwrap();
        assert!(bare.attributes.is_empty());
    }

    #[test]
    fn test_serialization() {
        let element = ElementNode::new("div").with_attribute("data-testid", "UserAvatar-Container-jack");

        let json = serde_json::to_string(&element).unwrap();
        let deserialized: ElementNode = serde_json::from_str(&json).unwrap();

        assert_eq!(element, deserialized);
    }
}
