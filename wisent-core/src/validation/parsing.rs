//! Parsing utilities for head paths and stored strings
//!
//! Pure functions with no I/O dependencies.

use crate::error::{Result, WisentError};
use crate::format::constants::STRING_TERMINATOR;

/// Separator between heads in a textual path
pub const HEAD_PATH_SEPARATOR: char = '/';

/// Parse a head path in the format "resources/List/Object"
///
/// Returns the heads in order. A single leading or trailing separator is
/// tolerated; empty paths and empty inner segments are rejected.
pub fn parse_head_path(path: &str) -> Result<impl Iterator<Item = &str> + Clone + '_> {
    let trimmed = path
        .strip_prefix(HEAD_PATH_SEPARATOR)
        .unwrap_or(path);
    let trimmed = trimmed
        .strip_suffix(HEAD_PATH_SEPARATOR)
        .unwrap_or(trimmed);

    if trimmed.is_empty() {
        return Err(WisentError::InvalidHeadPath);
    }
    if trimmed.split(HEAD_PATH_SEPARATOR).any(str::is_empty) {
        return Err(WisentError::InvalidHeadPath);
    }

    Ok(trimmed.split(HEAD_PATH_SEPARATOR))
}

/// Validate a string before it is stored null-terminated in the blob
pub fn validate_string(value: &str) -> Result<()> {
    if value.bytes().any(|b| b == STRING_TERMINATOR) {
        return Err(WisentError::InvalidString);
    }
    Ok(())
}
