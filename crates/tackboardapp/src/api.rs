//! # API Facade
//!
//! The API layer is a **thin facade** over the two stores. It is the single
//! entry point for every board operation, whichever UI drives it (today the
//! HTTP server in the `tackboard` binary).
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** one [`DocumentStore`] and one [`AttachmentStore`], built from an
//!   explicit [`StoragePaths`]
//! - **Normalizes inputs** (raw request bytes → [`Document`])
//! - **Returns structured types**, never HTTP status codes or strings
//!
//! ## Generic Over Launcher
//!
//! `BoardApi<L: Launcher>` is generic over how files get opened:
//! - Production: `BoardApi<CommandLauncher>`
//! - Testing: `BoardApi<RecordingLauncher>`, which never spawns anything

use crate::error::Result;
use crate::launcher::Launcher;
use crate::model::{AttachmentFile, AttachmentInfo, Document, StoragePaths, UploadReceipt};
use crate::store::attachments::AttachmentStore;
use crate::store::document::DocumentStore;
use std::io::Read;

pub struct BoardApi<L: Launcher> {
    documents: DocumentStore,
    attachments: AttachmentStore<L>,
    paths: StoragePaths,
}

impl<L: Launcher> BoardApi<L> {
    pub fn new(paths: StoragePaths, launcher: L) -> Self {
        Self {
            documents: DocumentStore::new(&paths.document),
            attachments: AttachmentStore::new(&paths.attachments, launcher),
            paths,
        }
    }

    /// Creates the attachment directory and the default document if missing.
    /// Run once before serving.
    pub fn initialize(&self) -> Result<()> {
        self.attachments.ensure_dir()?;
        self.documents.ensure_initialized()?;
        Ok(())
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn load_document(&self) -> Document {
        self.documents.load()
    }

    pub fn save_document(&self, doc: &Document) -> Result<()> {
        self.documents.save(doc)
    }

    /// Parses a request body as JSON and saves it. Any JSON value is
    /// accepted. Bytes that are not JSON fail with `Serialization` and leave
    /// the stored document untouched.
    pub fn save_document_bytes(&self, body: &[u8]) -> Result<()> {
        let doc: Document = serde_json::from_slice(body)?;
        self.save_document(&doc)
    }

    pub fn upload_attachment<R: Read>(
        &self,
        original_name: &str,
        content: Option<R>,
    ) -> Result<UploadReceipt> {
        self.attachments.upload(original_name, content)
    }

    pub fn download_attachment(&self, name: &str) -> Result<AttachmentFile> {
        self.attachments.download(name)
    }

    pub fn delete_attachment(&self, name: &str) -> Result<()> {
        self.attachments.delete(name)
    }

    pub fn open_attachment(&self, name: &str) -> Result<()> {
        self.attachments.open(name)
    }

    pub fn list_attachments(&self) -> Result<Vec<AttachmentInfo>> {
        self.attachments.list()
    }
}
