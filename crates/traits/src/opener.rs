//! FileOpener trait for handing finished artifacts to the desktop.

use async_trait::async_trait;
use std::path::Path;

/// Opens a file with whatever application the OS associates with it.
///
/// Implementations resolve once the open request has been issued; they do
/// not wait for the viewer to exit.
#[async_trait]
pub trait FileOpener: Send + Sync {
    async fn open(&self, path: &Path) -> std::io::Result<()>;
}
