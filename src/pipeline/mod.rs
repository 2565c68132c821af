//! The print-job pipeline.
//!
//! Every job goes through the same three stages, one job at a time:
//!
//! - [`JobQueue`]: serializes jobs so only one touches the render surface.
//! - [`PagePreparer`]: loads content, waits for readiness, injects margins.
//! - [`OutputDispatcher`]: renders and opens a PDF preview, or prints.
//!
//! [`PrintPipeline`] strings the last two together for a single job.

mod artifacts;
mod dispatcher;
mod preparer;
mod queue;
mod readiness;

pub use artifacts::PreviewArtifacts;
pub use dispatcher::{OutputDispatcher, PrintOutcome};
pub use preparer::{MARGIN_STYLE_ID, PagePreparer, html_data_uri, load_request, margin_style};
pub use queue::{JobHandle, JobQueue};
pub use readiness::ReadinessWait;

use crate::error::PrintError;
use crate::job::PrintJob;
use log::warn;

/// Preparation followed by dispatch for one job.
pub struct PrintPipeline {
    preparer: PagePreparer,
    dispatcher: OutputDispatcher,
}

impl PrintPipeline {
    pub fn new(preparer: PagePreparer, dispatcher: OutputDispatcher) -> Self {
        Self { preparer, dispatcher }
    }

    /// Runs `job` against the surface. Callers must not run two jobs at
    /// once; [`JobQueue`] is how the service guarantees that.
    pub async fn run(&self, job: &PrintJob) -> Result<PrintOutcome, PrintError> {
        self.dispatcher.settle().await;

        if let Err(e) = self.preparer.prepare(job).await {
            warn!("[PREPARE] Failed to prepare {}: {}", job.describe(), e);
            return Err(if job.preview {
                PrintError::preview(e)
            } else {
                PrintError::PrintFailed(e.to_string())
            });
        }

        self.dispatcher.dispatch(job).await
    }
}
