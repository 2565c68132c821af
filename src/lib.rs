//! A serialized print-job pipeline.
//!
//! Print requests (inline HTML or a URL plus layout options) are validated,
//! queued, and run one at a time against a shared [`RenderSurface`]. Each
//! job either ends as a PDF preview opened in the OS viewer or as a silent
//! print on a device.
//!
//! ```ignore
//! let service = PrintService::builder()
//!     .with_surface(Arc::new(my_surface))
//!     .build()?;
//!
//! let payload = serde_json::from_str(r#"{"url": "https://example.com/receipt"}"#)?;
//! service.print(payload).await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod job;
pub mod opener;
pub mod pipeline;
pub mod service;

pub use config::Config;
pub use error::{PrintError, QueueError, SetupError};
pub use job::{ContentSource, PrintJob, PrintPayload};
pub use opener::SystemOpener;
pub use pipeline::{JobHandle, JobQueue, PrintOutcome, ReadinessWait};
pub use service::{PrintService, PrintServiceBuilder};

pub use printdesk_margins as margins;
pub use printdesk_traits::{
    CatalogError, DeviceOptions, FallbackCatalog, FileOpener, LoadRequest, PageStyle, PdfOptions,
    PrinterCatalog, PrinterInfo, RenderSurface, StaticPrinterCatalog, SurfaceError,
};
