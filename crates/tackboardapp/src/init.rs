//! # Data Root and Startup
//!
//! Everything tackboard persists lives under one **data root**: the board
//! document, the attachment directory, and the optional `tackboard.toml`.
//!
//! ## Data Root Resolution
//!
//! [`resolve_data_root`] picks the first of:
//!
//! 1. The explicit `data_override` (the `--data` flag).
//! 2. The `TACKBOARD_DATA` environment variable.
//! 3. The OS-appropriate data directory (via the `directories` crate).
//!
//! ## Startup Sequence
//!
//! [`initialize`] runs before the server binds:
//!
//! 1. Resolve the data root and create it if needed.
//! 2. Load [`BoardConfig`] from `<data root>/tackboard.toml` (clapfig).
//! 3. Build [`StoragePaths`] and the [`BoardApi`] with the platform launcher.
//! 4. Create the attachment directory and the default document if absent.

use crate::api::BoardApi;
use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::launcher::CommandLauncher;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding the data root.
pub const DATA_ENV: &str = "TACKBOARD_DATA";

pub struct BoardContext {
    pub api: BoardApi<CommandLauncher>,
    pub config: BoardConfig,
    pub data_root: PathBuf,
}

/// Picks the data root, without touching the filesystem.
pub fn resolve_data_root(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }

    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    ProjectDirs::from("com", "tackboard", "tackboard")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            BoardError::InvalidInput(
                "Could not determine a data directory; pass --data".to_string(),
            )
        })
}

/// Loads `tackboard.toml` from the data root, merged with `TACKBOARD__*`
/// environment variables. Falls back to defaults when loading fails.
pub fn load_config(data_root: &Path) -> BoardConfig {
    Clapfig::builder()
        .app_name("tackboard")
        .file_name("tackboard.toml")
        .search_paths(vec![SearchPath::Path(data_root.to_path_buf())])
        .search_mode(SearchMode::Merge)
        .strict(false)
        .load()
        .unwrap_or_default()
}

/// Resolves paths, loads configuration, and prepares on-disk state.
pub fn initialize(data_override: Option<PathBuf>) -> Result<BoardContext> {
    let data_root = resolve_data_root(data_override)?;
    if !data_root.exists() {
        fs::create_dir_all(&data_root).map_err(BoardError::Io)?;
    }

    let config = load_config(&data_root);
    let paths = config.storage_paths(&data_root);
    let api = BoardApi::new(paths, CommandLauncher::system());
    api.initialize()?;

    info!(
        document = %api.paths().document.display(),
        attachments = %api.paths().attachments.display(),
        "storage ready"
    );

    Ok(BoardContext {
        api,
        config,
        data_root,
    })
}
