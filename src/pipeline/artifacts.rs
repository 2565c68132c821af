use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Writes rendered preview PDFs to uniquely named files.
///
/// Files are never reused and never cleaned up here; the viewer that opens
/// them owns their lifetime.
#[derive(Debug)]
pub struct PreviewArtifacts {
    dir: PathBuf,
    prefix: String,
    sequence: AtomicU64,
}

impl PreviewArtifacts {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<prefix>-<unix millis>-<sequence>.pdf`. The sequence keeps names
    /// distinct when two previews land in the same millisecond.
    pub fn next_path(&self) -> PathBuf {
        let millis = chrono::Utc::now().timestamp_millis();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!("{}-{}-{}.pdf", self.prefix, millis, sequence))
    }

    pub async fn persist(&self, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.next_path();
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}
