//! Filename rules for the attachment directory.
//!
//! Two directions, two policies:
//!
//! - **Incoming uploads** carry whatever name the browser sent. They are
//!   *sanitized* into something safe to create, then de-duplicated with a
//!   `stem(N).ext` counter.
//! - **Names arriving on read/delete/open routes** are caller-supplied at
//!   request time. They are never rewritten, only *validated*: anything that
//!   is not a single plain path component is rejected.

use crate::error::{BoardError, Result};
use std::path::{Component, Path};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Turns a browser-supplied filename into one that is safe to create.
///
/// The name is NFKD-decomposed and reduced to ASCII first, so accented
/// letters keep their base letter (`bảng kế hoạch` becomes `bang_ke_hoach`).
/// Path separators become word breaks, whitespace runs collapse to `_`, and
/// only ASCII letters, digits, `_`, `.` and `-` survive. Leading and trailing
/// dots/underscores are stripped, so `../../etc/passwd` ends up as
/// `etc_passwd`. Windows device names get a `_` prefix.
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let spaced: String = raw
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        return Err(BoardError::InvalidInput(format!(
            "filename '{}' has no usable characters",
            raw
        )));
    }

    let head = trimmed.split('.').next().unwrap_or_default();
    if WINDOWS_DEVICE_NAMES.contains(&head.to_ascii_uppercase().as_str()) {
        return Ok(format!("_{}", trimmed));
    }

    Ok(trimmed.to_string())
}

/// Splits `name` into stem and extension, keeping the dot on the extension.
///
/// Only the last dot counts, and a dot in first position is part of the stem.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// The `attempt`-th alternative for a taken name: `stem(attempt).ext`.
pub fn numbered(stem: &str, ext: &str, attempt: u32) -> String {
    format!("{}({}){}", stem, attempt, ext)
}

/// Last-resort name once the counter range is used up.
pub fn random_suffixed(stem: &str, ext: &str) -> String {
    format!("{}-{}{}", stem, Uuid::new_v4().simple(), ext)
}

/// Checks that a caller-supplied attachment name addresses a file directly
/// inside the store directory.
pub fn validate_stored_name(name: &str) -> Result<()> {
    let reject = || BoardError::InvalidInput(format!("'{}' is not a valid attachment name", name));

    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return Err(reject());
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(reject()),
    }
}
