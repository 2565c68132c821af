// src/pipeline/dispatcher.rs
use super::artifacts::PreviewArtifacts;
use crate::error::PrintError;
use crate::job::PrintJob;
use log::{debug, error, info, warn};
use printdesk_margins::pdf_margin_options;
use printdesk_traits::{DeviceOptions, FileOpener, PdfOptions, RenderSurface, SurfaceError};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const UNKNOWN_PRINT_FAILURE: &str = "Unknown print failure";

/// How a successful job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// The device accepted the job.
    Printed,
    /// A PDF was written to `path` and handed to the OS viewer.
    Previewed { path: PathBuf },
}

/// Sends a prepared page to its destination: a PDF opened in the OS viewer,
/// or a silent print on a device.
pub struct OutputDispatcher {
    surface: Arc<dyn RenderSurface>,
    opener: Arc<dyn FileOpener>,
    artifacts: PreviewArtifacts,
    pending_reset: Mutex<Option<JoinHandle<()>>>,
}

impl OutputDispatcher {
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        opener: Arc<dyn FileOpener>,
        artifacts: PreviewArtifacts,
    ) -> Self {
        Self {
            surface,
            opener,
            artifacts,
            pending_reset: Mutex::new(None),
        }
    }

    pub async fn dispatch(&self, job: &PrintJob) -> Result<PrintOutcome, PrintError> {
        if job.preview {
            self.preview(job).await
        } else {
            self.print(job).await
        }
    }

    /// Waits for the background reset of the previous direct print, if any.
    /// Must be called before the next job touches the surface.
    pub async fn settle(&self) {
        let pending = self.pending_reset.lock().await.take();
        if let Some(handle) = pending {
            if let Err(e) = handle.await {
                warn!("[DISPATCH] Surface reset task did not complete: {}", e);
            }
        }
    }

    /// The surface is left as is afterwards; the user may still be looking
    /// at it.
    async fn preview(&self, job: &PrintJob) -> Result<PrintOutcome, PrintError> {
        let options = PdfOptions {
            print_background: job.print_background,
            landscape: job.landscape,
            margins: pdf_margin_options(job.margin_type, job.margins.as_ref()),
        };

        let bytes = self
            .surface
            .render_to_pdf(&options)
            .await
            .map_err(preview_failed)?;
        debug!("[DISPATCH] Rendered {} PDF bytes", bytes.len());

        let path = self.artifacts.persist(&bytes).await.map_err(|e| {
            preview_failed(format!(
                "could not write {}: {}",
                self.artifacts.dir().display(),
                e
            ))
        })?;

        self.opener
            .open(&path)
            .await
            .map_err(|e| preview_failed(format!("could not open {}: {}", path.display(), e)))?;

        info!("[DISPATCH] Opened preview {}", path.display());
        Ok(PrintOutcome::Previewed { path })
    }

    /// Margins are not passed to the device: the injected `@page` rule
    /// already controls them.
    async fn print(&self, job: &PrintJob) -> Result<PrintOutcome, PrintError> {
        let options = DeviceOptions {
            silent: true,
            device_name: job.printer_name.clone(),
            landscape: job.landscape,
            copies: job.copies.max(1),
            print_background: job.print_background,
        };

        match self.surface.print(&options).await {
            Ok(()) => {
                info!(
                    "[DISPATCH] Printed {} cop{} on {}",
                    options.copies,
                    if options.copies == 1 { "y" } else { "ies" },
                    options.device_name.as_deref().unwrap_or("default printer")
                );
                self.schedule_reset().await;
                Ok(PrintOutcome::Printed)
            }
            Err(e) => Err(PrintError::PrintFailed(failure_reason(e))),
        }
    }

    async fn schedule_reset(&self) {
        let surface = Arc::clone(&self.surface);
        let handle = tokio::spawn(async move {
            if let Err(e) = surface.reset().await {
                warn!("[DISPATCH] Failed to reset render surface after job: {}", e);
            }
        });
        *self.pending_reset.lock().await = Some(handle);
    }
}

fn preview_failed(reason: impl std::fmt::Display) -> PrintError {
    error!("[DISPATCH] Print preview failed: {}", reason);
    PrintError::preview(reason)
}

fn failure_reason(e: SurfaceError) -> String {
    match e {
        SurfaceError::Print(reason) if reason.trim().is_empty() => {
            UNKNOWN_PRINT_FAILURE.to_string()
        }
        SurfaceError::Print(reason) => reason,
        other => other.to_string(),
    }
}
