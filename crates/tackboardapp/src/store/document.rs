use crate::error::{BoardError, Result};
use crate::model::Document;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Why [`DocumentStore::try_load`] could not produce the stored document.
#[derive(Error, Debug)]
pub enum LoadFallback {
    #[error("document file does not exist")]
    Missing,

    #[error("document file could not be read: {0}")]
    Unreadable(io::Error),

    #[error("document file is not valid JSON: {0}")]
    Malformed(serde_json::Error),
}

/// The single JSON document file. Reads are always whole, writes always
/// replace everything.
pub struct DocumentStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the default document if no file exists yet. Returns whether a
    /// file was created.
    pub fn ensure_initialized(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Document::default())?;
        info!(path = %self.path.display(), "created default document");
        Ok(true)
    }

    /// Reads the stored document, reporting exactly why it could not.
    pub fn try_load(&self) -> std::result::Result<Document, LoadFallback> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(LoadFallback::Missing),
            Err(e) => return Err(LoadFallback::Unreadable(e)),
        };
        serde_json::from_str(&content).map_err(LoadFallback::Malformed)
    }

    /// Reads the stored document, degrading to `{"columns": []}` on any
    /// failure. A broken state file must not keep the board from starting.
    pub fn load(&self) -> Document {
        match self.try_load() {
            Ok(doc) => doc,
            Err(reason) => {
                warn!(path = %self.path.display(), %reason, "falling back to empty document");
                Document::default()
            }
        }
    }

    /// Replaces the stored document in full.
    ///
    /// Written to a temp file next to the target and renamed over it, so
    /// readers see either the old document or the new one.
    pub fn save(&self, doc: &Document) -> Result<()> {
        let content = serde_json::to_string_pretty(doc).map_err(BoardError::Serialization)?;

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(BoardError::Io)?;
        }

        let tmp_file = dir.join(format!(".document-{}.tmp", Uuid::new_v4()));
        let written = fs::write(&tmp_file, content).and_then(|_| fs::rename(&tmp_file, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_file);
            return Err(BoardError::Io(e));
        }

        debug!(path = %self.path.display(), columns = doc.column_count(), "document saved");
        Ok(())
    }
}
