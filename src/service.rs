// src/service.rs
use crate::config::Config;
use crate::error::{PrintError, SetupError};
use crate::job::{PrintJob, PrintPayload};
use crate::opener::SystemOpener;
use crate::pipeline::{
    JobHandle, JobQueue, OutputDispatcher, PagePreparer, PreviewArtifacts, PrintOutcome,
    PrintPipeline, ReadinessWait,
};
use log::{info, warn};
use printdesk_traits::{FileOpener, RenderSurface};
use std::path::PathBuf;
use std::sync::Arc;

/// Entry point for submitting print requests.
///
/// Owns the job queue; every accepted request runs through the same
/// [`PrintPipeline`] strictly after all requests accepted before it.
pub struct PrintService {
    queue: JobQueue,
    pipeline: Arc<PrintPipeline>,
}

impl PrintService {
    pub fn builder() -> PrintServiceBuilder {
        PrintServiceBuilder::new()
    }

    /// Validates `payload` and queues it.
    ///
    /// A payload without content is rejected here, before anything is
    /// queued or touches the render surface.
    pub fn submit(
        &self,
        payload: PrintPayload,
    ) -> Result<JobHandle<PrintOutcome, PrintError>, PrintError> {
        let job = PrintJob::try_from(payload).inspect_err(|e| {
            warn!("[QUEUE] Rejected print request: {}", e);
        })?;
        Ok(self.submit_job(job))
    }

    pub fn submit_job(&self, job: PrintJob) -> JobHandle<PrintOutcome, PrintError> {
        let pipeline = Arc::clone(&self.pipeline);
        self.queue.enqueue(move || async move { pipeline.run(&job).await })
    }

    /// Submits `payload` and waits for its outcome.
    pub async fn print(&self, payload: PrintPayload) -> Result<PrintOutcome, PrintError> {
        self.submit(payload)?.await
    }

    pub fn pending_jobs(&self) -> usize {
        self.queue.pending()
    }

    /// Stops accepting requests and waits for queued ones to finish.
    pub async fn shutdown(&self) {
        info!("[QUEUE] Shutting down with {} pending job(s)", self.queue.pending());
        self.queue.shutdown().await;
    }
}

/// A builder for creating a `PrintService`.
pub struct PrintServiceBuilder {
    surface: Option<Arc<dyn RenderSurface>>,
    opener: Arc<dyn FileOpener>,
    user_agent: String,
    preview_dir: PathBuf,
    preview_prefix: String,
    readiness: ReadinessWait,
}

impl Default for PrintServiceBuilder {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PrintServiceBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Takes the printing settings from `config`.
    pub fn from_config(config: &Config) -> Self {
        let printing = &config.printing;
        Self {
            surface: None,
            opener: Arc::new(SystemOpener),
            user_agent: printing.user_agent.clone(),
            preview_dir: printing.preview_dir(),
            preview_prefix: printing.preview_prefix.clone(),
            readiness: ReadinessWait::from_millis(printing.ready_timeout_ms),
        }
    }

    pub fn with_surface(mut self, surface: Arc<dyn RenderSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Replaces the OS default-handler opener used for previews.
    pub fn with_opener(mut self, opener: Arc<dyn FileOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_preview_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preview_dir = dir.into();
        self
    }

    pub fn with_preview_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.preview_prefix = prefix.into();
        self
    }

    pub fn with_readiness(mut self, readiness: ReadinessWait) -> Self {
        self.readiness = readiness;
        self
    }

    /// Creates the preview directory if needed and starts the queue worker,
    /// so this must run inside a tokio runtime.
    pub fn build(self) -> Result<PrintService, SetupError> {
        let surface = self.surface.ok_or(SetupError::MissingSurface)?;
        std::fs::create_dir_all(&self.preview_dir)?;

        let preparer = PagePreparer::new(Arc::clone(&surface), self.user_agent, self.readiness);
        let dispatcher = OutputDispatcher::new(
            surface,
            self.opener,
            PreviewArtifacts::new(self.preview_dir, self.preview_prefix),
        );

        Ok(PrintService {
            queue: JobQueue::new(),
            pipeline: Arc::new(PrintPipeline::new(preparer, dispatcher)),
        })
    }
}
