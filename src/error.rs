use thiserror::Error;

/// Errors raised by the browser plumbing and the export pipeline.
///
/// Scroll-extract loops never surface these to their caller; a failure inside a run is
/// turned into a `backupError` event instead.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Failed to parse DOM snapshot: {0}")]
    DomParseFailed(String),

    #[error("Scroll container '{0}' not found")]
    ContainerNotFound(String),

    #[error("Wrong page: {0}")]
    WrongPage(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackupError>;
