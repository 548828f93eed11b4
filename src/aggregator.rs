//! Background aggregation
//!
//! The [`Aggregator`] owns the bookmark buffer and the export sink. It never touches the page:
//! it only consumes [`BackupEvent`]s and echoes [`StatusEvent`]s to the UI.

use crate::error::Result;
use crate::export::{ExportDocument, ExportSink};
use crate::relay::{BackupEvent, StatusEvent, StatusSender};
use crate::run::RunKind;
use indexmap::IndexSet;
use tokio::sync::mpsc::UnboundedReceiver;

pub struct Aggregator<S: ExportSink> {
    bookmarks: IndexSet<String>,
    sink: S,
    status: StatusSender,
}

impl<S: ExportSink> Aggregator<S> {
    pub fn new(sink: S, status: StatusSender) -> Self {
        Self { bookmarks: IndexSet::new(), sink, status }
    }

    /// Bookmarks buffered so far
    pub fn buffered(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Apply one event; terminal events export and echo a status
    pub fn handle(&mut self, event: BackupEvent) {
        match event {
            BackupEvent::AddBookmarks { data } => {
                self.bookmarks.extend(data);
                log::debug!("{} bookmarks collected so far", self.bookmarks.len());
            }
            BackupEvent::BookmarkExtractionComplete => {
                let links: Vec<String> = self.bookmarks.drain(..).collect();
                self.export(ExportDocument::new(RunKind::Bookmarks, links));
            }
            BackupEvent::FinishBackup { users } => {
                self.export(ExportDocument::for_handles(&users));
            }
            BackupEvent::FinishListBackup { urls } => {
                self.export(ExportDocument::new(RunKind::ListMembers, urls));
            }
            BackupEvent::BackupError { message } => {
                // a failed run exports nothing, including bookmarks streamed before the failure
                if !self.bookmarks.is_empty() {
                    log::warn!("Discarding {} buffered bookmarks after error", self.bookmarks.len());
                    self.bookmarks.clear();
                }
                self.status.send(StatusEvent::BackupError { message });
            }
        }
    }

    fn export(&mut self, doc: ExportDocument) {
        let status = match self.save(&doc) {
            Ok(()) => StatusEvent::completed(doc.kind, doc.count()),
            Err(e) => {
                log::error!("Failed to export {} backup: {}", doc.kind, e);
                StatusEvent::BackupError { message: e.to_string() }
            }
        };
        self.status.send(status);
    }

    fn save(&mut self, doc: &ExportDocument) -> Result<()> {
        self.sink.save(doc).map(|_| ())
    }

    /// Consume events until every sender is dropped
    pub async fn run(mut self, mut events: UnboundedReceiver<BackupEvent>) -> Self {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        log::debug!("Event relay closed, aggregator stopping");
        self
    }
}
