//! # Storage Layer
//!
//! Two leaf stores that never call each other:
//!
//! 1. [`document::DocumentStore`]: one JSON file holding the whole board.
//! 2. [`attachments::AttachmentStore`]: one flat directory of uploaded files.
//!
//! The only thing linking them is the caller-supplied JSON, which may mention
//! an attachment's download URL. Neither store looks inside the other, so
//! deleting a card never deletes its file and deleting a file never edits the
//! document.
//!
//! ## Philosophy
//!
//! - **Disk is the only state**: no cache of the document or of the file
//!   listing is kept between calls. Every operation re-reads or re-writes.
//! - **Whole-document writes**: the document is replaced, never patched.
//!   Last full write wins.
//! - **Names are decided once**: an attachment's name is fixed at upload and
//!   never reused while the file exists.
//!
//! ## Storage Layout
//!
//! ```text
//! <data root>/
//! ├── data.json          # The board document
//! ├── tackboard.toml     # Optional configuration
//! └── uploads/
//!     ├── report.pdf
//!     └── report(1).pdf  # Second upload of the same name
//! ```

pub mod attachments;
pub mod document;
pub mod naming;
