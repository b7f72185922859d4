//! # Data Model
//!
//! Tackboard persists two kinds of things, and deliberately knows very little
//! about either.
//!
//! ## Document
//!
//! A single JSON value shaped like `{"columns": [...]}`. The shape of each
//! column and card belongs to the browser client; the store keeps the value
//! verbatim and only ever replaces it as a whole.
//!
//! ## Attachments
//!
//! Flat files in one directory, addressed by their *assigned name*: the
//! sanitized, de-duplicated name chosen at upload time. Nothing here tracks
//! which card points at which file. A card that stores `"/download/report(1).pdf"`
//! owns that link, and dropping the card leaves the file in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs::File;
use std::path::PathBuf;

/// Route prefix under which attachments are served.
pub const DOWNLOAD_PREFIX: &str = "/download/";

/// The whole board state as one JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Document {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Number of entries under `columns`, or zero when the client stored
    /// something else.
    pub fn column_count(&self) -> usize {
        self.0
            .get("columns")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self(json!({ "columns": [] }))
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One stored attachment as reported by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentInfo {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// What an upload hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub url: String,
}

impl UploadReceipt {
    pub fn for_name(name: String) -> Self {
        let url = format!("{}{}", DOWNLOAD_PREFIX, name);
        Self {
            filename: name,
            url,
        }
    }
}

/// An attachment opened for reading.
#[derive(Debug)]
pub struct AttachmentFile {
    pub name: String,
    pub size: u64,
    pub file: File,
}

/// Where the two stores keep their state.
///
/// Built once at startup and handed to both stores; neither reaches for a
/// process-wide location on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub document: PathBuf,
    pub attachments: PathBuf,
}

impl StoragePaths {
    pub fn new(document: impl Into<PathBuf>, attachments: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            attachments: attachments.into(),
        }
    }
}
