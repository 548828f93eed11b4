//! One-way message passing between the page context, the background aggregator and the UI
//!
//! Every message is a JSON object tagged by `action`. Sends are fire-and-forget: a closed
//! receiver is logged and otherwise ignored, nothing is retried.

use crate::run::RunKind;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Page context → background
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum BackupEvent {
    /// Accounts loop complete with the full deduplicated handle list
    #[serde(rename = "finishBackup")]
    FinishBackup { users: Vec<String> },

    /// Bookmark URLs discovered by a single extraction pass
    #[serde(rename = "ADD_BOOKMARKS")]
    AddBookmarks { data: Vec<String> },

    /// Bookmarks loop complete; export whatever has been streamed
    #[serde(rename = "BOOKMARK_EXTRACTION_COMPLETE")]
    BookmarkExtractionComplete,

    /// List-members loop complete with the full URL list
    #[serde(rename = "finishListBackup")]
    FinishListBackup { urls: Vec<String> },

    /// Precondition failure, page-guard failure or a page that stopped responding
    #[serde(rename = "backupError")]
    BackupError { message: String },
}

impl BackupEvent {
    pub fn error(message: impl Into<String>) -> Self {
        BackupEvent::BackupError { message: message.into() }
    }
}

/// External trigger → page context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum BackupCommand {
    #[serde(rename = "startBackup")]
    StartBackup,

    #[serde(rename = "startBookmarkBackup")]
    StartBookmarkBackup,

    #[serde(rename = "stopBookmarkBackup")]
    StopBookmarkBackup,

    #[serde(rename = "startListBackup")]
    StartListBackup,
}

impl BackupCommand {
    /// The start command for `kind`
    pub fn start(kind: RunKind) -> Self {
        match kind {
            RunKind::Accounts => BackupCommand::StartBackup,
            RunKind::Bookmarks => BackupCommand::StartBookmarkBackup,
            RunKind::ListMembers => BackupCommand::StartListBackup,
        }
    }

    pub fn kind(self) -> RunKind {
        match self {
            BackupCommand::StartBackup => RunKind::Accounts,
            BackupCommand::StartBookmarkBackup | BackupCommand::StopBookmarkBackup => RunKind::Bookmarks,
            BackupCommand::StartListBackup => RunKind::ListMembers,
        }
    }
}

/// Background → UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum StatusEvent {
    #[serde(rename = "backupComplete")]
    BackupComplete { count: usize },

    #[serde(rename = "bookmarkBackupComplete")]
    BookmarkBackupComplete { count: usize },

    #[serde(rename = "listBackupComplete")]
    ListBackupComplete { count: usize },

    #[serde(rename = "backupError")]
    BackupError { message: String },
}

impl StatusEvent {
    pub fn completed(kind: RunKind, count: usize) -> Self {
        match kind {
            RunKind::Accounts => StatusEvent::BackupComplete { count },
            RunKind::Bookmarks => StatusEvent::BookmarkBackupComplete { count },
            RunKind::ListMembers => StatusEvent::ListBackupComplete { count },
        }
    }

    /// Short status line for the UI surface
    pub fn status_line(&self) -> String {
        match self {
            StatusEvent::BackupComplete { count } => format!("Backup complete: {} accounts. Saving file.", count),
            StatusEvent::BookmarkBackupComplete { count } => format!("Bookmark backup complete: {} bookmarks.", count),
            StatusEvent::ListBackupComplete { count } => format!("List backup complete: {} members.", count),
            StatusEvent::BackupError { message } => format!("Backup error: {}", message),
        }
    }
}

/// Fire-and-forget sending half of a relay channel
#[derive(Debug)]
pub struct Relay<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for Relay<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T: std::fmt::Debug> Relay<T> {
    /// Send without awaiting delivery; a closed receiver drops the message
    pub fn send(&self, message: T) {
        if let Err(e) = self.tx.send(message) {
            log::debug!("Relay receiver closed, dropping {:?}", e.0);
        }
    }
}

pub type EventSender = Relay<BackupEvent>;
pub type StatusSender = Relay<StatusEvent>;

/// Create a relay and its receiving half
pub fn channel<T>() -> (Relay<T>, mpsc::UnboundedReceiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Relay { tx }, rx)
}
