//! Export documents
//!
//! A backup is rendered as a standalone HTML page (heading, item count, one link per item)
//! and handed to an [`ExportSink`].

use crate::error::{BackupError, Result};
use crate::extract::SITE_ORIGIN;
use crate::run::RunKind;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// A rendered backup ready to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub kind: RunKind,
    pub links: Vec<String>,
    pub timestamp_ms: i64,
}

impl ExportDocument {
    /// Build a document for `kind` stamped with the current time
    pub fn new(kind: RunKind, links: Vec<String>) -> Self {
        Self::at(kind, links, chrono::Utc::now().timestamp_millis())
    }

    pub fn at(kind: RunKind, links: Vec<String>, timestamp_ms: i64) -> Self {
        Self { kind, links, timestamp_ms }
    }

    /// Followed accounts are delivered as handles; export them as profile links
    pub fn for_handles(handles: &[String]) -> Self {
        Self::new(RunKind::Accounts, handles.iter().map(|h| profile_url(h)).collect())
    }

    pub fn count(&self) -> usize {
        self.links.len()
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            RunKind::Accounts => "Twitter Follows Backup",
            RunKind::Bookmarks => "Twitter Bookmarks Backup",
            RunKind::ListMembers => "Twitter List Backup",
        }
    }

    /// `<kind>_backup_<epoch-millis>.html`
    pub fn filename(&self) -> String {
        let stem = match self.kind {
            RunKind::Accounts => "twitter_follows",
            RunKind::Bookmarks => "twitter_bookmarks",
            RunKind::ListMembers => "twitter_lists",
        };
        format!("{}_backup_{}.html", stem, self.timestamp_ms)
    }

    pub fn to_html(&self) -> String {
        let title = self.title();
        let mut items = String::new();
        for link in &self.links {
            let link = escape_html(link);
            let _ = write!(items, r#"<li><a href="{0}">{0}</a></li>"#, link);
        }
        format!(
            r#"<!DOCTYPE html><html><head><meta charset="UTF-8"><title>{title}</title></head><body><h1>{title}</h1><p>Total: {count}</p><ul>{items}</ul></body></html>"#,
            title = title,
            count = self.count(),
            items = items
        )
    }
}

/// `@handle` → `https://x.com/handle`
pub fn profile_url(handle: &str) -> String {
    format!("{}/{}", SITE_ORIGIN, handle.strip_prefix('@').unwrap_or(handle))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Destination for finished export documents
pub trait ExportSink: Send {
    /// Persist `doc`, returning where it went
    fn save(&mut self, doc: &ExportDocument) -> Result<PathBuf>;
}

type Confirm = Box<dyn FnMut(&Path) -> bool + Send>;

/// Writes documents into a directory, optionally asking before each save
pub struct DirectorySink {
    dir: PathBuf,
    confirm: Option<Confirm>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), confirm: None }
    }

    /// Builder method: ask `confirm` with the target path before writing
    pub fn with_confirmation(mut self, confirm: impl FnMut(&Path) -> bool + Send + 'static) -> Self {
        self.confirm = Some(Box::new(confirm));
        self
    }
}

impl ExportSink for DirectorySink {
    fn save(&mut self, doc: &ExportDocument) -> Result<PathBuf> {
        let path = self.dir.join(doc.filename());
        if let Some(confirm) = self.confirm.as_mut() {
            if !confirm(&path) {
                return Err(BackupError::ExportFailed(format!("save of {} declined", path.display())));
            }
        }
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, doc.to_html())?;
        log::info!("Saved {} {} to {}", doc.count(), doc.kind, path.display());
        Ok(path)
    }
}
