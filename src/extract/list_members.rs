use crate::dom::ElementNode;
use crate::error::{BackupError, Result};
use crate::extract::{ExtractedItem, ExtractionState, ExtractionStrategy, SITE_ORIGIN};
use crate::relay::BackupEvent;
use crate::run::RunKind;
use url::Url;

/// Avatar containers whose `data-testid` ends with the member's username
pub const LIST_MEMBER_SELECTOR: &str = r#"div[data-testid^="UserAvatar-Container-"]"#;

const AVATAR_PREFIX: &str = "UserAvatar-Container-";

/// Whether `url` is an `x.com/i/lists/<id>/members` page
pub fn is_list_members_page(url: &str) -> bool {
    let Ok(url) = Url::parse(url) else {
        return false;
    };
    let path = url.path();
    url.host_str() == Some("x.com") && path.starts_with("/i/lists/") && path.ends_with("/members")
}

/// Members of a list, keyed by profile URL
#[derive(Default)]
pub struct ListMembersStrategy {
    state: ExtractionState,
}

impl ListMembersStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtractionStrategy for ListMembersStrategy {
    fn kind(&self) -> RunKind {
        RunKind::ListMembers
    }

    fn selector(&self) -> &str {
        LIST_MEMBER_SELECTOR
    }

    fn parse(&self, node: &ElementNode) -> Option<ExtractedItem> {
        let raw = node.non_empty_attribute("data-testid")?;
        let username = raw.strip_prefix(AVATAR_PREFIX).unwrap_or(raw).trim();
        if username.is_empty() {
            return None;
        }
        Some(ExtractedItem::keyed_by_value(format!("{}/{}", SITE_ORIGIN, username)))
    }

    fn state(&self) -> &ExtractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ExtractionState {
        &mut self.state
    }

    fn check_page(&self, url: &str) -> Result<()> {
        if is_list_members_page(url) {
            Ok(())
        } else {
            Err(BackupError::WrongPage(
                "run this on a list members page (x.com/i/lists/.../members)".to_string(),
            ))
        }
    }

    fn completion_event(&self) -> BackupEvent {
        BackupEvent::FinishListBackup { urls: self.snapshot() }
    }

    fn on_complete(&mut self) {
        self.state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar(test_id: &str) -> ElementNode {
        ElementNode::new("div").with_attribute("data-testid", test_id)
    }

    #[test]
    fn test_avatar_yields_profile_url() {
        let mut strategy = ListMembersStrategy::new();
        let found = strategy.scan(&[avatar("UserAvatar-Container-jack")]);

        assert_eq!(found, vec![ExtractedItem::keyed_by_value("https://x.com/jack")]);
    }

    #[test]
    fn test_skips_empty_usernames() {
        let mut strategy = ListMembersStrategy::new();
        let found = strategy.scan(&[avatar("UserAvatar-Container-"), avatar("UserAvatar-Container-   "), avatar("")]);

        assert!(found.is_empty());
    }

    #[test]
    fn test_duplicates_are_ignored() {
        let mut strategy = ListMembersStrategy::new();
        strategy.scan(&[avatar("UserAvatar-Container-jack"), avatar("UserAvatar-Container-jack")]);
        strategy.scan(&[avatar("UserAvatar-Container-jack"), avatar("UserAvatar-Container-ev")]);

        assert_eq!(strategy.snapshot(), vec!["https://x.com/jack", "https://x.com/ev"]);
    }

    #[test]
    fn test_list_members_page_guard() {
        assert!(is_list_members_page("https://x.com/i/lists/123456/members"));
        assert!(!is_list_members_page("https://x.com/i/lists/123456"));
        assert!(!is_list_members_page("https://twitter.com/i/lists/123456/members"));
        assert!(!is_list_members_page("https://x.com/jack/members"));
        assert!(!is_list_members_page("not a url"));

        let strategy = ListMembersStrategy::new();
        assert!(strategy.check_page("https://x.com/i/lists/1/members").is_ok());
        assert!(matches!(strategy.check_page("https://x.com/home"), Err(BackupError::WrongPage(_))));
    }

    #[test]
    fn test_state_cleared_after_completion() {
        let mut strategy = ListMembersStrategy::new();
        strategy.scan(&[avatar("UserAvatar-Container-jack")]);

        assert_eq!(strategy.completion_event(), BackupEvent::FinishListBackup { urls: vec!["https://x.com/jack".to_string()] });
        strategy.on_complete();
        assert!(strategy.state().is_empty());
    }
}
