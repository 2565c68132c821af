#![allow(dead_code)]

use async_trait::async_trait;
use printdesk::{
    DeviceOptions, FileOpener, LoadRequest, PageStyle, PdfOptions, PrintPayload, PrintService,
    ReadinessWait, RenderSurface, SurfaceError,
};
use serde_json::Value;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FAKE_PDF: &[u8] = b"%PDF-1.7 fake";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn payload(value: Value) -> PrintPayload {
    serde_json::from_value(value).expect("payload json")
}

/// One call made against the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Load(LoadRequest),
    AwaitReady,
    InjectStyle(PageStyle),
    RenderToPdf(PdfOptions),
    Print(DeviceOptions),
    Reset,
}

/// A render surface that records every call.
///
/// Each operation sleeps for `op_delay` while marked active, so two jobs
/// driving it at the same time show up in `overlaps()`.
#[derive(Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    loaded: Mutex<Option<String>>,
    print_failures: Mutex<HashMap<String, String>>,
    render_failure: Mutex<Option<String>>,
    ready_delay: Mutex<Option<Duration>>,
    op_delay: Mutex<Duration>,
    active: AtomicUsize,
    overlaps: AtomicUsize,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_op_delay(delay: Duration) -> Arc<Self> {
        let surface = Self::default();
        *surface.op_delay.lock().unwrap() = delay;
        Arc::new(surface)
    }

    /// Printing fails with `reason` while `url` is loaded.
    pub fn fail_print_for(&self, url: &str, reason: &str) {
        self.print_failures
            .lock()
            .unwrap()
            .insert(url.to_string(), reason.to_string());
    }

    pub fn fail_render(&self, reason: &str) {
        *self.render_failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn delay_ready(&self, delay: Duration) {
        *self.ready_delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Load(request) => Some(request.url),
                _ => None,
            })
            .collect()
    }

    pub fn prints(&self) -> Vec<DeviceOptions> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Print(options) => Some(options),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    async fn operate(&self, call: SurfaceCall) {
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.calls.lock().unwrap().push(call);
        let delay = *self.op_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RenderSurface for RecordingSurface {
    async fn load(&self, request: &LoadRequest) -> Result<(), SurfaceError> {
        *self.loaded.lock().unwrap() = Some(request.url.clone());
        self.operate(SurfaceCall::Load(request.clone())).await;
        Ok(())
    }

    async fn await_ready(&self) -> Result<(), SurfaceError> {
        let delay = *self.ready_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.operate(SurfaceCall::AwaitReady).await;
        Ok(())
    }

    async fn inject_style(&self, style: &PageStyle) -> Result<(), SurfaceError> {
        self.operate(SurfaceCall::InjectStyle(style.clone())).await;
        Ok(())
    }

    async fn render_to_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>, SurfaceError> {
        self.operate(SurfaceCall::RenderToPdf(*options)).await;
        let failure = self.render_failure.lock().unwrap().clone();
        match failure {
            Some(reason) => Err(SurfaceError::Render(reason)),
            None => Ok(FAKE_PDF.to_vec()),
        }
    }

    async fn print(&self, options: &DeviceOptions) -> Result<(), SurfaceError> {
        self.operate(SurfaceCall::Print(options.clone())).await;
        let loaded = self.loaded.lock().unwrap().clone().unwrap_or_default();
        let failure = self.print_failures.lock().unwrap().get(&loaded).cloned();
        match failure {
            Some(reason) => Err(SurfaceError::Print(reason)),
            None => Ok(()),
        }
    }

    async fn reset(&self) -> Result<(), SurfaceError> {
        *self.loaded.lock().unwrap() = Some("about:blank".to_string());
        self.operate(SurfaceCall::Reset).await;
        Ok(())
    }
}

/// Records opened paths instead of launching a viewer.
#[derive(Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<PathBuf>>,
    fail: Mutex<bool>,
}

impl RecordingOpener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let opener = Self::default();
        *opener.fail.lock().unwrap() = true;
        Arc::new(opener)
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileOpener for RecordingOpener {
    async fn open(&self, path: &Path) -> io::Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no handler for .pdf"));
        }
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub fn build_service(
    surface: Arc<RecordingSurface>,
    opener: Arc<RecordingOpener>,
    preview_dir: &Path,
) -> PrintService {
    build_service_with(surface, opener, preview_dir, ReadinessWait::Unbounded)
}

pub fn build_service_with(
    surface: Arc<RecordingSurface>,
    opener: Arc<RecordingOpener>,
    preview_dir: &Path,
    readiness: ReadinessWait,
) -> PrintService {
    PrintService::builder()
        .with_surface(surface)
        .with_opener(opener)
        .with_preview_dir(preview_dir)
        .with_user_agent("PrintDesk-Test")
        .with_readiness(readiness)
        .build()
        .expect("service builds")
}
