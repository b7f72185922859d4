//! # Tackboard
//!
//! Tackboard is a local, single-user board: a browser tab shows columns of
//! cards, and cards can carry uploaded files. This crate is the persistence
//! half of it, kept free of any HTTP or terminal concerns.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UI Client (crates/tackboard/)                              │
//! │  - axum routes, status codes, JSON envelopes                │
//! │  - process bootstrap, logging setup                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - One facade over both stores                              │
//! │  - Returns structured types and BoardError                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                 ┌────────────┴────────────┐
//!                 ▼                         ▼
//! ┌───────────────────────────┐ ┌───────────────────────────────┐
//! │  DocumentStore            │ │  AttachmentStore              │
//! │  whole-document JSON file │ │  flat dir, unique names,      │
//! │  fail-soft load           │ │  open via Launcher            │
//! └───────────────────────────┘ └───────────────────────────────┘
//! ```
//!
//! The two stores share nothing but the data root. A card referencing a file
//! does so through a URL in caller-owned JSON; removing the card leaves the
//! file behind and that is intended.
//!
//! ## Errors
//!
//! Every fallible operation returns [`error::Result`]. The one exception is
//! [`api::BoardApi::load_document`], which never fails: a missing or corrupt
//! document file degrades to `{"columns": []}` with a logged warning.

pub mod api;
pub mod config;
pub mod error;
pub mod init;
pub mod launcher;
pub mod model;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
