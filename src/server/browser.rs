//! Opens the home page in the desktop browser after startup

use std::io;
use std::time::Duration;

use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Delay before opening the browser, so the listener is accepting
pub const BROWSER_DELAY: Duration = Duration::from_millis(1500);

/// Open `url` after `delay` on a background task. Failures are only logged.
pub fn spawn_open_browser(url: String, delay: Duration) -> JoinHandle<()> {
    let launcher = browser_command(&url);
    spawn_launcher(launcher, url, delay)
}

fn spawn_launcher(mut launcher: Command, url: String, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match run_launcher(&mut launcher).await {
            Ok(()) => info!("Opened browser at {}", url),
            Err(e) => warn!("Could not open browser at {}: {}", url, e),
        }
    })
}

async fn run_launcher(launcher: &mut Command) -> io::Result<()> {
    let status = launcher.status().await?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("browser launcher exited with {}", status),
        ))
    }
}

fn browser_command(url: &str) -> Command {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(url);
    cmd
}
