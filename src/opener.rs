use async_trait::async_trait;
use printdesk_traits::FileOpener;
use std::io;
use std::path::Path;
use tokio::process::Command;

/// Opens files with the desktop's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(path: &Path) -> Command {
        if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(path);
            command
        } else if cfg!(target_os = "windows") {
            // The empty argument is the window title `start` expects first.
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]).arg(path);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        }
    }
}

#[async_trait]
impl FileOpener for SystemOpener {
    async fn open(&self, path: &Path) -> io::Result<()> {
        let status = Self::command(path).status().await?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "opening {} exited with {}",
                path.display(),
                status
            )))
        }
    }
}
