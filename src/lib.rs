//! # x-backup
//!
//! Back up followed accounts, bookmarked posts and list members from x.com by scrolling a live
//! Chrome tab over the DevTools Protocol and reading what the page has rendered.
//!
//! ## How a backup runs
//!
//! 1. A [`BackupCommand`] reaches the [`BackupController`], which spawns a scroll-extract task
//!    for the requested [`RunKind`] unless one is already running.
//! 2. The task ([`scroll::scroll_and_extract`]) scrolls the page, waits for lazily loaded content
//!    and runs an [`ExtractionStrategy`] pass per iteration until its termination policy fires.
//! 3. Results travel as [`BackupEvent`]s over a one-way relay to the [`Aggregator`], which buffers
//!    streamed bookmarks, renders an [`ExportDocument`] and echoes a [`StatusEvent`] to the UI.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use x_backup::{Aggregator, BackupCommand, BackupController, BrowserSession, DirectorySink, LaunchOptions, relay};
//!
//! # #[tokio::main]
//! # async fn main() -> x_backup::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::new().headless(false))?;
//! session.navigate("https://x.com/i/bookmarks")?;
//!
//! let (events, events_rx) = relay::channel();
//! let (status, mut status_rx) = relay::channel();
//! let aggregator = tokio::spawn(Aggregator::new(DirectorySink::new("backups"), status).run(events_rx));
//!
//! let controller = BackupController::new(Arc::new(session.page()?), events);
//! if let Some(run) = controller.dispatch(BackupCommand::StartBookmarkBackup) {
//!     run.await.ok();
//! }
//! drop(controller);
//! aggregator.await.ok();
//!
//! while let Ok(update) = status_rx.try_recv() {
//!     println!("{}", update.status_line());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Chrome session management and the tab-backed [`Page`]
//! - [`dom`]: element snapshots and the [`Page`] trait
//! - [`extract`]: extraction strategies for accounts, bookmarks and list members
//! - [`scroll`]: the scroll-extract loop and its termination policy
//! - [`run`]: per-kind run guards
//! - [`relay`]: wire messages and the fire-and-forget channel
//! - [`aggregator`]: background buffering, export and status echo
//! - [`export`]: HTML export documents and sinks
//! - [`controller`]: command dispatch
//! - [`error`]: Error types and result aliases

pub mod aggregator;
pub mod browser;
pub mod controller;
pub mod dom;
pub mod error;
pub mod export;
pub mod extract;
pub mod relay;
pub mod run;
pub mod scroll;

pub use aggregator::Aggregator;
pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, TabPage};
pub use controller::BackupController;
pub use dom::{ElementNode, Page};
pub use error::{BackupError, Result};
pub use export::{DirectorySink, ExportDocument, ExportSink};
pub use extract::{ExtractedItem, ExtractionState, ExtractionStrategy};
pub use relay::{BackupCommand, BackupEvent, StatusEvent};
pub use run::{RunKind, RunManager};
pub use scroll::{RunOutcome, ScrollConfig, StopReason};
