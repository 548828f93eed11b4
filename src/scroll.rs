//! The scroll-extract loop
//!
//! One loop drives every [`RunKind`]: scroll the page forward, wait for lazily loaded content,
//! run an extraction pass, then decide whether to stop. A run stops when
//! - the container height is unchanged and no new items appeared for `no_progress_threshold`
//!   consecutive passes,
//! - no new items appeared for `no_progress_threshold` consecutive passes, whatever the height,
//! - `iteration_ceiling` iterations have run, or
//! - a stop was requested (bookmarks only, polled at the top of each iteration).
//!
//! The loop never returns an error; failures are reported as `backupError` events and a failed
//! run sends no completion event.

use crate::dom::Page;
use crate::error::Result;
use crate::extract::ExtractionStrategy;
use crate::relay::{BackupEvent, EventSender};
use crate::run::{RunKind, RunManager};
use std::time::Duration;

/// Main timeline column that scrolls on x.com
pub const SCROLL_CONTAINER_SELECTOR: &str = r#"main[role="main"]"#;

pub const DEFAULT_SCROLL_STEP: i64 = 900;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Knobs of a single loop instantiation
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollConfig {
    /// Hard cap on loop iterations
    pub iteration_ceiling: usize,

    /// Pixels scrolled per iteration
    pub scroll_step: i64,

    /// Suspension between the scroll and the extraction pass
    pub delay: Duration,

    /// Consecutive empty passes that end the run
    pub no_progress_threshold: usize,

    /// Element whose `scrollHeight` is tracked
    pub container_selector: String,
}

impl ScrollConfig {
    /// Defaults for `kind`
    pub fn for_kind(kind: RunKind) -> Self {
        let (iteration_ceiling, no_progress_threshold) = match kind {
            RunKind::Accounts => (500, 6),
            RunKind::Bookmarks => (3000, 8),
            RunKind::ListMembers => (3000, 6),
        };
        Self {
            iteration_ceiling,
            scroll_step: DEFAULT_SCROLL_STEP,
            delay: DEFAULT_DELAY,
            no_progress_threshold,
            container_selector: SCROLL_CONTAINER_SELECTOR.to_string(),
        }
    }

    /// Builder method: set the iteration ceiling
    pub fn iteration_ceiling(mut self, ceiling: usize) -> Self {
        self.iteration_ceiling = ceiling;
        self
    }

    /// Builder method: set the scroll step
    pub fn scroll_step(mut self, pixels: i64) -> Self {
        self.scroll_step = pixels;
        self
    }

    /// Builder method: set the inter-iteration delay
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Builder method: set the no-progress threshold
    pub fn no_progress_threshold(mut self, threshold: usize) -> Self {
        self.no_progress_threshold = threshold;
        self
    }

    /// Builder method: set the scroll container selector
    pub fn container_selector(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = selector.into();
        self
    }
}

/// Loop bookkeeping, updated once per iteration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollProgress {
    pub last_height: f64,
    pub no_new_items_streak: usize,
    pub iteration_count: usize,
}

impl ScrollProgress {
    pub fn new(initial_height: f64) -> Self {
        Self { last_height: initial_height, ..Default::default() }
    }

    /// Account for one extraction pass that found `new_items`
    pub fn record_pass(&mut self, new_items: usize) {
        if new_items > 0 {
            self.no_new_items_streak = 0;
        } else {
            self.no_new_items_streak += 1;
        }
    }

    /// Apply the termination policy after a pass, given the container's current height
    pub fn evaluate(&mut self, height: f64, threshold: usize) -> Option<StopReason> {
        let stalled = self.no_new_items_streak >= threshold;
        if height == self.last_height {
            if stalled {
                return Some(StopReason::ReachedBottom);
            }
        } else {
            self.last_height = height;
        }
        stalled.then_some(StopReason::NoNewItems)
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Height stable and nothing new for `threshold` passes
    ReachedBottom,
    /// Nothing new for `threshold` passes while the page kept growing
    NoNewItems,
    IterationCeiling,
    Cancelled,
}

/// Result of one [`scroll_and_extract`] call
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// A run of the same kind was already active; nothing happened
    AlreadyRunning,
    /// A precondition failed before scrolling started
    Aborted { message: String },
    /// The page stopped answering mid-run; nothing was exported
    Failed { message: String, iterations: usize },
    Finished {
        reason: StopReason,
        iterations: usize,
        items: usize,
    },
}

/// Run one extraction pass, streaming the new items if the strategy asks for it
fn extraction_pass<P: Page + ?Sized>(
    page: &P,
    strategy: &mut dyn ExtractionStrategy,
    relay: &EventSender,
) -> Result<usize> {
    let nodes = page.query_all(strategy.selector())?;

    let found = strategy.scan(&nodes);
    if strategy.reports_incrementally() && !found.is_empty() {
        relay.send(BackupEvent::AddBookmarks { data: found.iter().map(|item| item.value.clone()).collect() });
    }
    Ok(found.len())
}

/// Scroll, wait, extract and read the container height for one iteration
async fn iterate<P: Page + ?Sized>(
    page: &P,
    strategy: &mut dyn ExtractionStrategy,
    config: &ScrollConfig,
    relay: &EventSender,
) -> Result<(usize, Option<f64>)> {
    let scrolled = page.scroll_by(config.scroll_step);
    tokio::time::sleep(config.delay).await;
    scrolled?;

    let new_items = extraction_pass(page, strategy, relay)?;
    let height = page.scroll_height(&config.container_selector)?;
    Ok((new_items, height))
}

/// Abort before scrolling: report `message` and release the guard (via the ticket's drop)
fn abort(kind: RunKind, relay: &EventSender, message: String) -> RunOutcome {
    log::warn!("{} backup aborted: {}", kind, message);
    relay.send(BackupEvent::error(message.clone()));
    RunOutcome::Aborted { message }
}

/// Scroll `page` and extract with `strategy` until the termination policy fires.
///
/// A call while a run of the same kind is active returns [`RunOutcome::AlreadyRunning`]
/// without touching the page or sending anything. A page that fails
/// `no_progress_threshold` iterations in a row ends the run with a `backupError` and no
/// completion event.
pub async fn scroll_and_extract<P: Page + ?Sized>(
    page: &P,
    strategy: &mut dyn ExtractionStrategy,
    config: &ScrollConfig,
    runs: &RunManager,
    relay: &EventSender,
) -> RunOutcome {
    let kind = strategy.kind();
    let Some(_ticket) = runs.acquire(kind) else {
        log::debug!("{} backup already running, ignoring start", kind);
        return RunOutcome::AlreadyRunning;
    };
    log::info!("Starting {} backup", kind);

    let url = page.current_url().unwrap_or_default();
    if let Err(e) = strategy.check_page(&url) {
        return abort(kind, relay, e.to_string());
    }

    let initial_height = match page.scroll_height(&config.container_selector) {
        Ok(Some(height)) => height,
        Ok(None) => {
            return abort(kind, relay, format!("{} container '{}' not found", kind, config.container_selector));
        }
        Err(e) => return abort(kind, relay, format!("{} page unavailable: {}", kind, e)),
    };

    let mut progress = ScrollProgress::new(initial_height);

    // content already rendered above the fold
    if let Err(e) = extraction_pass(page, strategy, relay) {
        return abort(kind, relay, format!("{} page unavailable: {}", kind, e));
    }

    let mut page_errors = 0;
    let mut reason = StopReason::IterationCeiling;
    while progress.iteration_count < config.iteration_ceiling {
        if runs.consume_cancel(kind) {
            log::info!("{} backup cancelled after {} iterations", kind, progress.iteration_count);
            reason = StopReason::Cancelled;
            break;
        }

        let observed = iterate(page, strategy, config, relay).await;
        progress.iteration_count += 1;

        let (new_items, height) = match observed {
            Ok(observed) => observed,
            Err(e) => {
                page_errors += 1;
                log::warn!("{}: iteration {} failed: {}", kind, progress.iteration_count, e);
                if page_errors >= config.no_progress_threshold {
                    strategy.on_complete();
                    let message = format!("{} page stopped responding: {}", kind, e);
                    log::error!("{} backup failed after {} iterations: {}", kind, progress.iteration_count, message);
                    relay.send(BackupEvent::error(message.clone()));
                    return RunOutcome::Failed { message, iterations: progress.iteration_count };
                }
                continue;
            }
        };
        page_errors = 0;
        progress.record_pass(new_items);

        // a vanished container keeps the previous baseline
        let height = height.unwrap_or(progress.last_height);
        log::debug!(
            "{}: iteration {} found {} new (streak {}, height {})",
            kind,
            progress.iteration_count,
            new_items,
            progress.no_new_items_streak,
            height
        );

        if let Some(stop) = progress.evaluate(height, config.no_progress_threshold) {
            reason = stop;
            break;
        }
    }

    let items = strategy.state().len();
    relay.send(strategy.completion_event());
    strategy.on_complete();
    log::info!(
        "{} backup finished ({:?}) after {} iterations with {} items",
        kind,
        reason,
        progress.iteration_count,
        items
    );

    RunOutcome::Finished { reason, iterations: progress.iteration_count, items }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_kind() {
        let accounts = ScrollConfig::for_kind(RunKind::Accounts);
        assert_eq!(accounts.iteration_ceiling, 500);
        assert_eq!(accounts.no_progress_threshold, 6);
        assert_eq!(accounts.scroll_step, 900);
        assert_eq!(accounts.delay, Duration::from_millis(1000));
        assert_eq!(accounts.container_selector, SCROLL_CONTAINER_SELECTOR);

        let bookmarks = ScrollConfig::for_kind(RunKind::Bookmarks);
        assert_eq!((bookmarks.iteration_ceiling, bookmarks.no_progress_threshold), (3000, 8));

        let lists = ScrollConfig::for_kind(RunKind::ListMembers);
        assert_eq!((lists.iteration_ceiling, lists.no_progress_threshold), (3000, 6));
    }

    #[test]
    fn test_config_builder() {
        let config = ScrollConfig::for_kind(RunKind::Accounts)
            .iteration_ceiling(10)
            .scroll_step(400)
            .delay(Duration::ZERO)
            .no_progress_threshold(2)
            .container_selector("#feed");

        assert_eq!(config.iteration_ceiling, 10);
        assert_eq!(config.scroll_step, 400);
        assert_eq!(config.delay, Duration::ZERO);
        assert_eq!(config.no_progress_threshold, 2);
        assert_eq!(config.container_selector, "#feed");
    }

    #[test]
    fn test_streak_resets_on_new_items() {
        let mut progress = ScrollProgress::new(100.0);
        progress.record_pass(0);
        progress.record_pass(0);
        assert_eq!(progress.no_new_items_streak, 2);

        progress.record_pass(3);
        assert_eq!(progress.no_new_items_streak, 0);
    }

    #[test]
    fn test_stable_height_and_stall_reaches_bottom() {
        let mut progress = ScrollProgress::new(100.0);
        progress.no_new_items_streak = 6;

        assert_eq!(progress.evaluate(100.0, 6), Some(StopReason::ReachedBottom));
    }

    #[test]
    fn test_stall_stops_even_when_height_grows() {
        let mut progress = ScrollProgress::new(100.0);
        progress.no_new_items_streak = 6;

        assert_eq!(progress.evaluate(250.0, 6), Some(StopReason::NoNewItems));
        assert_eq!(progress.last_height, 250.0);
    }

    #[test]
    fn test_growth_below_threshold_updates_baseline() {
        let mut progress = ScrollProgress::new(100.0);
        progress.no_new_items_streak = 5;

        assert_eq!(progress.evaluate(180.0, 6), None);
        assert_eq!(progress.last_height, 180.0);
        assert_eq!(progress.evaluate(180.0, 6), None);
    }
}
