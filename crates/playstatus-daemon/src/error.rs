//! Error types for the daemon binary.
//!
//! [`DaemonError`] wraps every failure mode of startup and shutdown so
//! `main` can propagate with `?`.

/// Top-level error for the daemon binary.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: playstatus_core::ConfigError,
    },

    /// The initial status document could not be rendered.
    #[error("status error: {source}")]
    Status {
        /// The underlying status error.
        #[from]
        source: playstatus_core::StatusError,
    },

    /// The status server failed to start.
    #[error("server error: {source}")]
    Server {
        /// The underlying startup error.
        #[from]
        source: playstatus_server::StartupError,
    },

    /// Reading the event feed failed.
    #[error("feed I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The aggregator stopped while the feed was still submitting.
    #[error("intake error: {source}")]
    Intake {
        /// The underlying intake error.
        #[from]
        source: playstatus_core::IntakeError,
    },

    /// A background task panicked or was cancelled.
    #[error("task error: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
