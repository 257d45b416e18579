use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::error::{CoreError, CoreResult};

/// Opens a path with whatever the host considers its default application.
pub trait Launcher: Send + Sync {
    fn open(&self, path: &Path) -> CoreResult<()>;
}

/// Launcher backed by the OS opener command.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, path: &Path) -> CoreResult<()> {
        log::info!("opening path={}", path.display());
        open_path_native(path)
    }
}

fn ensure_command_success(status: ExitStatus, command_label: &str) -> CoreResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(CoreError::Internal(format!(
            "{command_label} failed with status {status}"
        )))
    }
}

#[cfg(target_os = "macos")]
fn open_path_native(path: &Path) -> CoreResult<()> {
    let status = Command::new("open")
        .arg(path)
        .status()
        .map_err(|error| CoreError::Internal(format!("failed to run open: {error}")))?;
    ensure_command_success(status, "open")
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_path_native(path: &Path) -> CoreResult<()> {
    let status = Command::new("xdg-open")
        .arg(path)
        .status()
        .map_err(|error| CoreError::Internal(format!("failed to run xdg-open: {error}")))?;
    ensure_command_success(status, "xdg-open")
}

#[cfg(target_os = "windows")]
fn open_path_native(path: &Path) -> CoreResult<()> {
    let status = Command::new("cmd")
        .arg("/C")
        .arg("start")
        .arg("")
        .arg(path)
        .status()
        .map_err(|error| CoreError::Internal(format!("failed to run start: {error}")))?;
    ensure_command_success(status, "start")
}

#[cfg(not(any(unix, target_os = "windows")))]
fn open_path_native(_path: &Path) -> CoreResult<()> {
    Err(CoreError::Internal(
        "opening paths is not supported on this platform".to_string(),
    ))
}
