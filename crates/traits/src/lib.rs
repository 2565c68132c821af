pub mod catalog;
pub mod opener;
pub mod surface;

pub use catalog::{CatalogError, FallbackCatalog, PrinterCatalog, PrinterInfo, StaticPrinterCatalog};
pub use opener::FileOpener;
pub use surface::{DeviceOptions, LoadRequest, PageStyle, PdfOptions, RenderSurface, SurfaceError};
