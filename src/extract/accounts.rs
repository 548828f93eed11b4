use crate::dom::ElementNode;
use crate::extract::{ExtractedItem, ExtractionState, ExtractionStrategy};
use crate::relay::BackupEvent;
use crate::run::RunKind;
use regex::Regex;
use std::sync::LazyLock;

/// Follow buttons carrying the account id in `data-testid` and the handle in `aria-label`
pub const ACCOUNT_SELECTOR: &str = "button[data-testid]";

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid id pattern"));
static HANDLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\S+").expect("valid handle pattern"));

/// Followed accounts keyed by the numeric id embedded in `data-testid`
#[derive(Default)]
pub struct AccountsStrategy {
    state: ExtractionState,
}

impl AccountsStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtractionStrategy for AccountsStrategy {
    fn kind(&self) -> RunKind {
        RunKind::Accounts
    }

    fn selector(&self) -> &str {
        ACCOUNT_SELECTOR
    }

    fn parse(&self, node: &ElementNode) -> Option<ExtractedItem> {
        let raw_id = node.non_empty_attribute("data-testid")?;
        let id = ID_PATTERN.find(raw_id)?.as_str();

        let label = node.non_empty_attribute("aria-label")?;
        let handle = HANDLE_PATTERN.find(label)?.as_str();

        Some(ExtractedItem::new(id, handle))
    }

    fn state(&self) -> &ExtractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ExtractionState {
        &mut self.state
    }

    fn completion_event(&self) -> BackupEvent {
        BackupEvent::FinishBackup { users: self.snapshot() }
    }
}
