use super::naming;
use crate::error::{BoardError, Result};
use crate::launcher::Launcher;
use crate::model::{AttachmentFile, AttachmentInfo, UploadReceipt};
use chrono::{DateTime, Utc};
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Highest `stem(N).ext` counter tried before falling back to a random suffix.
const MAX_COUNTER: u32 = 10_000;

/// Flat directory of uploaded files, addressed by assigned name.
pub struct AttachmentStore<L: Launcher> {
    root: PathBuf,
    launcher: L,
}

impl<L: Launcher> AttachmentStore<L> {
    pub fn new(root: impl Into<PathBuf>, launcher: L) -> Self {
        Self {
            root: root.into(),
            launcher,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BoardError::Io)?;
        }
        Ok(())
    }

    /// Stores `content` under a fresh name derived from `original_name`.
    ///
    /// Never overwrites: when the sanitized name is taken, `stem(1).ext`,
    /// `stem(2).ext`, ... are tried with exclusive create until one sticks.
    pub fn upload<R: Read>(&self, original_name: &str, content: Option<R>) -> Result<UploadReceipt> {
        let mut content =
            content.ok_or_else(|| BoardError::InvalidInput("no file was sent".to_string()))?;
        if original_name.trim().is_empty() {
            return Err(BoardError::InvalidInput("filename is empty".to_string()));
        }

        let sanitized = naming::sanitize_filename(original_name)?;
        self.ensure_dir()?;

        let (name, mut file) = self.create_unique(&sanitized)?;
        let written = io::copy(&mut content, &mut file).and_then(|bytes| {
            file.flush()?;
            file.sync_all()?;
            Ok(bytes)
        });

        match written {
            Ok(bytes) => {
                info!(original = %original_name, name = %name, bytes, "attachment stored");
                Ok(UploadReceipt::for_name(name))
            }
            Err(e) => {
                drop(file);
                if let Err(cleanup) = fs::remove_file(self.root.join(&name)) {
                    warn!(name = %name, error = %cleanup, "failed to remove partial upload");
                }
                Err(BoardError::Io(e))
            }
        }
    }

    /// Opens a stored attachment for reading.
    pub fn download(&self, name: &str) -> Result<AttachmentFile> {
        let (path, meta) = self.locate(name)?;
        let file = File::open(&path).map_err(|e| BoardError::from_io(e, name))?;
        Ok(AttachmentFile {
            name: name.to_string(),
            size: meta.len(),
            file,
        })
    }

    /// Removes a stored attachment. Deleting twice reports `NotFound` the
    /// second time.
    pub fn delete(&self, name: &str) -> Result<()> {
        let (path, _) = self.locate(name)?;
        fs::remove_file(&path).map_err(|e| BoardError::from_io(e, name))?;
        info!(name = %name, "attachment deleted");
        Ok(())
    }

    /// Hands a stored attachment to the default application for its type.
    pub fn open(&self, name: &str) -> Result<()> {
        let (path, _) = self.locate(name)?;
        // Not canonicalize: Windows handlers reject its `\\?\` verbatim form
        let absolute = std::path::absolute(&path).map_err(|e| BoardError::from_io(e, name))?;

        if let Err(e) = self.launcher.launch(absolute.as_os_str()) {
            warn!(name = %name, error = %e, "failed to open attachment");
            return Err(BoardError::Launch(e));
        }
        info!(name = %name, "attachment opened with default application");
        Ok(())
    }

    /// Regular files in the store, sorted by name.
    pub fn list(&self) -> Result<Vec<AttachmentInfo>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(BoardError::Io)? {
            let entry = entry.map_err(BoardError::Io)?;
            let meta = match self.contained_metadata(&entry.path()) {
                Ok(Some(meta)) => meta,
                Ok(None) => continue,
                // Removed between read_dir and stat, or a dangling link
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(BoardError::Io(e)),
            };
            if !meta.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                debug!(path = %entry.path().display(), "skipping non UTF-8 filename");
                continue;
            };
            let modified: DateTime<Utc> = meta.modified().unwrap_or(SystemTime::now()).into();
            files.push(AttachmentInfo {
                name,
                size: meta.len(),
                modified,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    fn create_unique(&self, sanitized: &str) -> Result<(String, File)> {
        let (stem, ext) = naming::split_extension(sanitized);

        for attempt in 0..=MAX_COUNTER {
            let candidate = if attempt == 0 {
                sanitized.to_string()
            } else {
                naming::numbered(stem, ext, attempt)
            };
            match self.create_new(&candidate) {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(BoardError::from_io(e, &candidate)),
            }
        }

        let candidate = naming::random_suffixed(stem, ext);
        warn!(name = %sanitized, fallback = %candidate, "name counter exhausted");
        let file = self
            .create_new(&candidate)
            .map_err(|e| BoardError::from_io(e, &candidate))?;
        Ok((candidate, file))
    }

    fn create_new(&self, name: &str) -> io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(name))
    }

    /// Resolves a caller-supplied name to an existing regular file inside the
    /// store directory.
    fn locate(&self, name: &str) -> Result<(PathBuf, Metadata)> {
        naming::validate_stored_name(name)?;
        let path = self.root.join(name);

        let Some(meta) = self
            .contained_metadata(&path)
            .map_err(|e| BoardError::from_io(e, name))?
        else {
            return Err(BoardError::NotFound(name.to_string()));
        };

        if !meta.is_file() {
            return Err(BoardError::NotFound(name.to_string()));
        }
        Ok((path, meta))
    }

    /// Metadata for an entry of the store directory. Symlinks are followed
    /// only when their target stays inside the store; `None` otherwise.
    fn contained_metadata(&self, path: &Path) -> io::Result<Option<Metadata>> {
        let meta = fs::symlink_metadata(path)?;
        if !meta.file_type().is_symlink() {
            return Ok(Some(meta));
        }

        let target = fs::canonicalize(path)?;
        let root = fs::canonicalize(&self.root)?;
        if !target.starts_with(&root) {
            warn!(path = %path.display(), target = %target.display(), "symlink leaves attachment dir");
            return Ok(None);
        }
        fs::metadata(&target).map(Some)
    }
}
