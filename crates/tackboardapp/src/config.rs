//! # Configuration
//!
//! Tackboard configuration is managed by [`clapfig`], which handles layered
//! loading from TOML files, environment variables, and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Command line flags**: `--host`, `--port`, `--no-browser`.
//! 2. **Environment variables**: `TACKBOARD__PORT`, `TACKBOARD__HOST`, etc.
//! 3. **Data root config**: `<data root>/tackboard.toml`.
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `host` | `127.0.0.1` | Address the server binds to |
//! | `port` | `5006` | Port the server binds to |
//! | `document_file` | `data.json` | Board document, relative to the data root |
//! | `attachment_dir` | `uploads` | Attachment directory, relative to the data root |
//! | `open_browser` | `true` | Open the board in the default browser on startup |
//! | `static_dir` | none | Directory whose `index.html` is served at `/` |

use crate::model::StoragePaths;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for tackboard, stored in `tackboard.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BoardConfig {
    /// Address the HTTP server binds to. Keep this on loopback.
    #[config(default = "127.0.0.1")]
    pub host: String,

    /// Port the HTTP server binds to.
    #[config(default = 5006)]
    pub port: u16,

    /// Board document file. Relative paths are resolved against the data root.
    #[config(default = "data.json")]
    pub document_file: PathBuf,

    /// Attachment directory. Relative paths are resolved against the data root.
    #[config(default = "uploads")]
    pub attachment_dir: PathBuf,

    /// Launch the default browser once the server is listening.
    #[config(default = true)]
    pub open_browser: bool,

    /// Directory holding the front end's `index.html`. Relative paths are
    /// resolved against the data root.
    pub static_dir: Option<PathBuf>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5006,
            document_file: PathBuf::from("data.json"),
            attachment_dir: PathBuf::from("uploads"),
            open_browser: true,
            static_dir: None,
        }
    }
}

impl BoardConfig {
    /// Resolves the document and attachment locations against `data_root`.
    pub fn storage_paths(&self, data_root: &Path) -> StoragePaths {
        StoragePaths::new(
            data_root.join(&self.document_file),
            data_root.join(&self.attachment_dir),
        )
    }

    pub fn index_dir(&self, data_root: &Path) -> Option<PathBuf> {
        self.static_dir.as_ref().map(|dir| data_root.join(dir))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.bind_addr())
    }
}
