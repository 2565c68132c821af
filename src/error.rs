// src/error.rs
use thiserror::Error;

/// The outcome of a failed print job, as delivered to the submitter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrintError {
    #[error("Print payload must include either an html or url property.")]
    InvalidPayload,

    #[error("{0}")]
    PrintFailed(String),

    /// Details are logged where the failure happens and kept here for
    /// callers that want them, but are not part of the message.
    #[error("Print preview failed")]
    PreviewFailed { reason: String },

    #[error("Print queue task failed: {0}")]
    Queue(#[from] QueueError),
}

impl PrintError {
    /// Stable, machine-readable classification.
    pub const fn code(&self) -> &'static str {
        match self {
            PrintError::InvalidPayload => "INVALID_PAYLOAD",
            PrintError::PrintFailed(_) => "PRINT_FAILED",
            PrintError::PreviewFailed { .. } => "PREVIEW_FAILED",
            PrintError::Queue(_) => "QUEUE_TASK_FAILED",
        }
    }

    /// True when the request itself was at fault.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, PrintError::InvalidPayload)
    }

    pub(crate) fn preview(reason: impl std::fmt::Display) -> Self {
        PrintError::PreviewFailed {
            reason: reason.to_string(),
        }
    }
}

/// A job whose result never reached its submitter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("job ended without producing a result")]
    Abandoned,

    #[error("queue is closed")]
    Closed,
}

/// Failure to assemble a [`crate::PrintService`].
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("No render surface configured. Use `with_surface`.")]
    MissingSurface,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
