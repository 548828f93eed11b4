//! Page-context command dispatcher
//!
//! Receives [`BackupCommand`]s from the UI surface and spawns one scroll-extract task per start
//! request. Runs of different kinds are independent; a start for a kind that is already running
//! is ignored.

use crate::dom::Page;
use crate::extract::strategy_for;
use crate::relay::{BackupCommand, EventSender};
use crate::run::{RunKind, RunManager};
use crate::scroll::{RunOutcome, ScrollConfig, scroll_and_extract};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct BackupController<P: Page + 'static> {
    page: Arc<P>,
    runs: Arc<RunManager>,
    relay: EventSender,
    configs: HashMap<RunKind, ScrollConfig>,
}

impl<P: Page + 'static> BackupController<P> {
    pub fn new(page: Arc<P>, relay: EventSender) -> Self {
        let configs = RunKind::ALL.iter().map(|&kind| (kind, ScrollConfig::for_kind(kind))).collect();
        Self { page, runs: Arc::new(RunManager::new()), relay, configs }
    }

    /// Builder method: override the loop configuration of `kind`
    pub fn with_config(mut self, kind: RunKind, config: ScrollConfig) -> Self {
        self.configs.insert(kind, config);
        self
    }

    pub fn runs(&self) -> &Arc<RunManager> {
        &self.runs
    }

    pub fn config(&self, kind: RunKind) -> ScrollConfig {
        self.configs.get(&kind).cloned().unwrap_or_else(|| ScrollConfig::for_kind(kind))
    }

    /// Handle one command. Returns the spawned run for start commands that were accepted.
    pub fn dispatch(&self, command: BackupCommand) -> Option<JoinHandle<RunOutcome>> {
        match command {
            BackupCommand::StopBookmarkBackup => {
                if !self.runs.request_cancel(RunKind::Bookmarks) {
                    log::debug!("No bookmark backup running, ignoring stop");
                }
                None
            }
            start => self.start(start.kind()),
        }
    }

    fn start(&self, kind: RunKind) -> Option<JoinHandle<RunOutcome>> {
        if self.runs.is_running(kind) {
            log::debug!("{} backup already running", kind);
            return None;
        }

        let page = Arc::clone(&self.page);
        let runs = Arc::clone(&self.runs);
        let relay = self.relay.clone();
        let config = self.config(kind);

        Some(tokio::spawn(async move {
            let mut strategy = strategy_for(kind);
            scroll_and_extract(&*page, strategy.as_mut(), &config, &runs, &relay).await
        }))
    }
}
