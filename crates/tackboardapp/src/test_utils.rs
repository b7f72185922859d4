use crate::api::BoardApi;
use crate::error::LaunchError;
use crate::launcher::Launcher;
use crate::model::StoragePaths;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Launcher that records targets instead of spawning anything. Clones share
/// the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    launched: Arc<Mutex<Vec<PathBuf>>>,
    handler_missing: bool,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A launcher that behaves as if no application is registered.
    pub fn without_handler() -> Self {
        Self {
            handler_missing: true,
            ..Self::default()
        }
    }

    pub fn launched(&self) -> Vec<PathBuf> {
        self.launched
            .lock()
            .map(|targets| targets.clone())
            .unwrap_or_default()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, target: &OsStr) -> Result<(), LaunchError> {
        if self.handler_missing {
            return Err(LaunchError::HandlerMissing("recording".to_string()));
        }
        if let Ok(mut targets) = self.launched.lock() {
            targets.push(PathBuf::from(target));
        }
        Ok(())
    }
}

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub api: BoardApi<RecordingLauncher>,
    pub launcher: RecordingLauncher,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_launcher(RecordingLauncher::new())
    }

    pub fn with_launcher(launcher: RecordingLauncher) -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let paths = StoragePaths::new(root.join("data.json"), root.join("uploads"));
        let api = BoardApi::new(paths, launcher.clone());
        api.initialize().expect("failed to initialize board");
        Self {
            _temp_dir: temp_dir,
            api,
            launcher,
            root,
        }
    }
}
