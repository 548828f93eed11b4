//! x-backup CLI
//!
//! Drives a Chrome tab through a follows, bookmarks or list-members backup and saves the
//! result as an HTML document.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use x_backup::{Aggregator, BackupCommand, BackupController, BrowserSession, ConnectionOptions, DirectorySink,
               LaunchOptions, RunKind, RunOutcome, ScrollConfig, StatusEvent, relay};

#[derive(Parser)]
#[command(name = "x-backup")]
#[command(version)]
#[command(about = "Back up follows, bookmarks and list members from x.com via Chrome")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    browser: BrowserArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up followed accounts (open your /following page or pass --url)
    Follows(RunArgs),
    /// Back up bookmarks; Ctrl-C stops early and saves what was found
    Bookmarks(RunArgs),
    /// Back up the members of a list (x.com/i/lists/<id>/members)
    Lists(RunArgs),
}

#[derive(Args)]
struct BrowserArgs {
    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    /// Attach to a running Chrome instead of launching one
    #[arg(long, global = true, env = "X_BACKUP_WS_URL")]
    ws_url: Option<String>,

    /// Chrome binary to launch
    #[arg(long, global = true, env = "X_BACKUP_CHROME")]
    chrome_path: Option<PathBuf>,

    /// Chrome profile directory (use one that is logged in to x.com)
    #[arg(long, global = true, env = "X_BACKUP_PROFILE")]
    user_data_dir: Option<PathBuf>,

    /// Launch Chrome without its sandbox (needed in some containers)
    #[arg(long, global = true)]
    no_sandbox: bool,
}

#[derive(Args)]
struct RunArgs {
    /// Page to open before scrolling; defaults to the current tab
    #[arg(long)]
    url: Option<String>,

    /// Directory the backup document is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Save without asking for confirmation
    #[arg(long, short = 'y')]
    yes: bool,

    /// Stop after this many scroll iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Milliseconds to wait for new content after each scroll
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Pixels scrolled per iteration
    #[arg(long)]
    scroll_step: Option<i64>,

    /// Empty passes in a row that end the run
    #[arg(long)]
    stall_threshold: Option<usize>,

    /// Element whose height tracks the end of the feed
    #[arg(long)]
    container: Option<String>,
}

impl RunArgs {
    fn scroll_config(&self, kind: RunKind) -> ScrollConfig {
        let mut config = ScrollConfig::for_kind(kind);
        if let Some(ceiling) = self.max_iterations {
            config = config.iteration_ceiling(ceiling);
        }
        if let Some(ms) = self.delay_ms {
            config = config.delay(Duration::from_millis(ms));
        }
        if let Some(step) = self.scroll_step {
            config = config.scroll_step(step);
        }
        if let Some(threshold) = self.stall_threshold {
            config = config.no_progress_threshold(threshold);
        }
        if let Some(selector) = &self.container {
            config = config.container_selector(selector.as_str());
        }
        config
    }
}

impl Commands {
    fn kind(&self) -> RunKind {
        match self {
            Commands::Follows(_) => RunKind::Accounts,
            Commands::Bookmarks(_) => RunKind::Bookmarks,
            Commands::Lists(_) => RunKind::ListMembers,
        }
    }

    fn args(&self) -> &RunArgs {
        match self {
            Commands::Follows(args) | Commands::Bookmarks(args) | Commands::Lists(args) => args,
        }
    }

    fn start_url(&self) -> Option<&str> {
        match self {
            Commands::Bookmarks(args) => Some(args.url.as_deref().unwrap_or("https://x.com/i/bookmarks")),
            other => other.args().url.as_deref(),
        }
    }
}

fn open_session(args: &BrowserArgs) -> Result<BrowserSession> {
    let session = match &args.ws_url {
        Some(ws_url) => BrowserSession::connect(ConnectionOptions::new(ws_url.clone()))?,
        None => {
            let mut options = LaunchOptions::new().headless(!args.headed).sandbox(!args.no_sandbox);
            if let Some(path) = &args.chrome_path {
                options = options.chrome_path(path);
            }
            if let Some(dir) = &args.user_data_dir {
                options = options.user_data_dir(dir);
            }
            BrowserSession::launch(options)?
        }
    };
    Ok(session)
}

fn confirm_save(path: &Path) -> bool {
    eprint!("Save {}? [Y/n] ", path.display());
    std::io::stderr().flush().ok();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    !matches!(answer.trim().to_ascii_lowercase().as_str(), "n" | "no")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let kind = cli.command.kind();
    let run_args = cli.command.args();

    let session = open_session(&cli.browser).context("Failed to open browser session")?;
    if let Some(url) = cli.command.start_url() {
        session.navigate(url).with_context(|| format!("Failed to open {}", url))?;
    }
    let page = Arc::new(session.page()?);

    let mut sink = DirectorySink::new(&run_args.out_dir);
    if !run_args.yes {
        sink = sink.with_confirmation(confirm_save);
    }

    let (events, events_rx) = relay::channel();
    let (status, mut status_rx) = relay::channel();
    let aggregator = tokio::spawn(Aggregator::new(sink, status).run(events_rx));

    let controller = Arc::new(BackupController::new(page, events).with_config(kind, run_args.scroll_config(kind)));
    let run = controller
        .dispatch(BackupCommand::start(kind))
        .context("A backup of this kind is already running")?;

    eprintln!("Backing up {}...", kind);
    let stopper = Arc::clone(&controller);
    let stop = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if kind.supports_cancel() {
                eprintln!("Stop requested, finishing current iteration...");
                stopper.dispatch(BackupCommand::StopBookmarkBackup);
            } else {
                std::process::exit(130);
            }
        }
    });

    let outcome = run.await.context("Backup task panicked")?;
    stop.abort();
    // the stop task holds a controller handle until it is gone
    let _ = stop.await;
    log::info!("Run outcome: {:?}", outcome);

    // closing the relay lets the aggregator drain and stop
    drop(controller);
    aggregator.await.context("Aggregator task panicked")?;

    let mut failed = matches!(outcome, RunOutcome::Aborted { .. } | RunOutcome::Failed { .. });
    while let Ok(update) = status_rx.try_recv() {
        println!("{}", update.status_line());
        failed |= matches!(update, StatusEvent::BackupError { .. });
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
