use printdesk_traits::{RenderSurface, SurfaceError};
use std::time::Duration;

/// How long the preparer waits for a loaded document to report completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadinessWait {
    /// Wait as long as it takes.
    #[default]
    Unbounded,
    /// Give up with [`SurfaceError::Timeout`] after the given duration.
    Bounded(Duration),
}

impl ReadinessWait {
    /// `None` and `Some(0)` both mean unbounded.
    pub fn from_millis(timeout_ms: Option<u64>) -> Self {
        match timeout_ms {
            Some(ms) if ms > 0 => ReadinessWait::Bounded(Duration::from_millis(ms)),
            _ => ReadinessWait::Unbounded,
        }
    }

    pub async fn wait(&self, surface: &dyn RenderSurface) -> Result<(), SurfaceError> {
        match *self {
            ReadinessWait::Unbounded => surface.await_ready().await,
            ReadinessWait::Bounded(limit) => tokio::time::timeout(limit, surface.await_ready())
                .await
                .map_err(|_| SurfaceError::Timeout(limit))?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis() {
        assert_eq!(ReadinessWait::from_millis(None), ReadinessWait::Unbounded);
        assert_eq!(ReadinessWait::from_millis(Some(0)), ReadinessWait::Unbounded);
        assert_eq!(
            ReadinessWait::from_millis(Some(250)),
            ReadinessWait::Bounded(Duration::from_millis(250))
        );
    }
}
