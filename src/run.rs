//! Per-kind run state
//!
//! Each [`RunKind`] owns an independent [`RunGuard`]. At most one run of a kind is active at a
//! time; only bookmark runs can be cancelled, and cancellation is polled by the loop.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// The three entities that can be backed up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Accounts,
    Bookmarks,
    ListMembers,
}

impl RunKind {
    pub const ALL: [RunKind; 3] = [RunKind::Accounts, RunKind::Bookmarks, RunKind::ListMembers];

    /// Whether a running loop of this kind honours stop requests
    pub fn supports_cancel(self) -> bool {
        matches!(self, RunKind::Bookmarks)
    }

    fn slot(self) -> usize {
        match self {
            RunKind::Accounts => 0,
            RunKind::Bookmarks => 1,
            RunKind::ListMembers => 2,
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunKind::Accounts => "accounts",
            RunKind::Bookmarks => "bookmarks",
            RunKind::ListMembers => "list members",
        };
        f.write_str(name)
    }
}

/// `{running, cancel_requested}` for one kind
#[derive(Debug, Default)]
pub struct RunGuard {
    running: AtomicBool,
    cancel_requested: AtomicBool,
}

impl RunGuard {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }
}

/// Owner of every kind's [`RunGuard`]
#[derive(Debug, Default)]
pub struct RunManager {
    guards: [RunGuard; 3],
}

impl RunManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(&self, kind: RunKind) -> &RunGuard {
        &self.guards[kind.slot()]
    }

    /// Atomically mark `kind` as running. Returns `false` if a run is already active.
    ///
    /// A new run starts with no pending cancellation, even if a stop raced the previous
    /// run's `finish`.
    pub fn try_start(&self, kind: RunKind) -> bool {
        let guard = self.guard(kind);
        let started = guard
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if started {
            guard.cancel_requested.store(false, Ordering::Release);
        }
        started
    }

    /// Release `kind`, disarming any pending cancellation
    pub fn finish(&self, kind: RunKind) {
        let guard = self.guard(kind);
        guard.cancel_requested.store(false, Ordering::Release);
        guard.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self, kind: RunKind) -> bool {
        self.guard(kind).is_running()
    }

    /// Ask a running loop of `kind` to stop at its next iteration boundary.
    ///
    /// Ignored (returns `false`) for kinds without cancellation support and when no run is active.
    pub fn request_cancel(&self, kind: RunKind) -> bool {
        if !kind.supports_cancel() || !self.is_running(kind) {
            return false;
        }
        self.guard(kind).cancel_requested.store(true, Ordering::Release);
        true
    }

    /// Take the pending cancellation for `kind`, clearing it
    pub fn consume_cancel(&self, kind: RunKind) -> bool {
        kind.supports_cancel() && self.guard(kind).cancel_requested.swap(false, Ordering::AcqRel)
    }

    /// Acquire `kind` for the lifetime of the returned ticket
    pub fn acquire(&self, kind: RunKind) -> Option<RunTicket<'_>> {
        self.try_start(kind).then_some(RunTicket { manager: self, kind })
    }
}

/// Held by an active run; releases the kind's guard when dropped
#[derive(Debug)]
pub struct RunTicket<'a> {
    manager: &'a RunManager,
    kind: RunKind,
}

impl Drop for RunTicket<'_> {
    fn drop(&mut self) {
        self.manager.finish(self.kind);
    }
}
