//! Handing files (and URLs) to the host's default application.
//!
//! Every desktop OS has one command that means "open this with whatever the
//! user picked": `start` on Windows, `open` on macOS, `xdg-open` elsewhere.
//! The platform is detected once, at startup, and baked into a
//! [`CommandLauncher`]; the stores only ever see the [`Launcher`] trait.
//!
//! Launching is fire-and-forget. We wait for the *launcher command* to report
//! whether the OS accepted the request, never for the application it starts.

use crate::error::LaunchError;
use std::ffi::OsStr;
use std::io;
use std::process::{Command, Stdio};

/// Opens a target in the default associated application.
pub trait Launcher {
    fn launch(&self, target: &OsStr) -> Result<(), LaunchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }
}

/// A launcher backed by an external dispatch command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLauncher {
    program: String,
    leading_args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(program: impl Into<String>, leading_args: &[&str]) -> Self {
        Self {
            program: program.into(),
            leading_args: leading_args.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            // `start` is a cmd builtin; the empty string fills its window-title slot
            Platform::Windows => Self::new("cmd", &["/C", "start", ""]),
            Platform::MacOs => Self::new("open", &[]),
            Platform::Unix => Self::new("xdg-open", &[]),
        }
    }

    pub fn system() -> Self {
        Self::for_platform(Platform::current())
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Launcher for CommandLauncher {
    fn launch(&self, target: &OsStr) -> Result<(), LaunchError> {
        let status = Command::new(&self.program)
            .args(&self.leading_args)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => LaunchError::HandlerMissing(self.program.clone()),
                io::ErrorKind::PermissionDenied => {
                    LaunchError::PermissionDenied(self.program.clone())
                }
                _ => LaunchError::Spawn(e),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::Failed {
                program: self.program.clone(),
                status,
            })
        }
    }
}
