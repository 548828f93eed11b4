//! Extraction strategies
//!
//! An [`ExtractionStrategy`] turns the elements matching its selector into
//! [`ExtractedItem`]s and records them in a per-run [`ExtractionState`]. Scans are idempotent:
//! scanning an unchanged document a second time yields no new items.

pub mod accounts;
pub mod bookmarks;
pub mod list_members;

pub use accounts::AccountsStrategy;
pub use bookmarks::BookmarksStrategy;
pub use list_members::ListMembersStrategy;

use crate::dom::ElementNode;
use crate::error::Result;
use crate::relay::BackupEvent;
use crate::run::RunKind;
use indexmap::IndexMap;

/// Base URL every canonical link is built on
pub const SITE_ORIGIN: &str = "https://x.com";

/// `(unique_key, display_value)` pair found on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    pub key: String,
    pub value: String,
}

impl ExtractedItem {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Item whose key is its own display value (canonical URLs)
    pub fn keyed_by_value(value: impl Into<String>) -> Self {
        let value = value.into();
        Self { key: value.clone(), value }
    }
}

/// Discovery-ordered items of one run. A key is never inserted twice.
#[derive(Debug, Clone, Default)]
pub struct ExtractionState {
    items: IndexMap<String, String>,
}

impl ExtractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `item`. Returns `false` (and leaves the state untouched) if its key is known.
    pub fn insert(&mut self, item: &ExtractedItem) -> bool {
        if self.items.contains_key(&item.key) {
            return false;
        }
        self.items.insert(item.key.clone(), item.value.clone());
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display values in discovery order
    pub fn values(&self) -> Vec<String> {
        self.items.values().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// How one kind of entity is recognised on the page
pub trait ExtractionStrategy: Send {
    fn kind(&self) -> RunKind;

    /// CSS selector of candidate elements
    fn selector(&self) -> &str;

    /// Validate one candidate. Malformed markup yields `None`.
    fn parse(&self, node: &ElementNode) -> Option<ExtractedItem>;

    fn state(&self) -> &ExtractionState;

    fn state_mut(&mut self) -> &mut ExtractionState;

    /// Whether newly found items are streamed after every pass instead of only at the end
    fn reports_incrementally(&self) -> bool {
        false
    }

    /// Page guard checked before the run starts scrolling
    fn check_page(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    /// Event announcing that the run finished
    fn completion_event(&self) -> BackupEvent;

    /// Hook invoked once the completion event has been sent
    fn on_complete(&mut self) {}

    /// One extraction pass: record every valid, unseen candidate and return the new items
    fn scan(&mut self, nodes: &[ElementNode]) -> Vec<ExtractedItem> {
        let mut found = Vec::new();
        for node in nodes {
            let Some(item) = self.parse(node) else {
                log::debug!("{}: skipping <{}> without usable markup", self.kind(), node.tag_name);
                continue;
            };
            if self.state_mut().insert(&item) {
                found.push(item);
            }
        }
        found
    }

    /// Everything recorded so far, in discovery order
    fn snapshot(&self) -> Vec<String> {
        self.state().values()
    }
}

/// Build the strategy for `kind` with a fresh state
pub fn strategy_for(kind: RunKind) -> Box<dyn ExtractionStrategy> {
    match kind {
        RunKind::Accounts => Box::new(AccountsStrategy::new()),
        RunKind::Bookmarks => Box::new(BookmarksStrategy::new()),
        RunKind::ListMembers => Box::new(ListMembersStrategy::new()),
    }
}
