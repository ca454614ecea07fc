//! Modification-time helpers.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Own (non-recursive) modification time of a file, following symlinks
pub fn file_modtime(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

/// Render a modification time with full nanosecond precision.
///
/// Two files written within the same second still compare by nanoseconds,
/// so logs show the full value.
pub fn format_modtime(modtime: SystemTime) -> String {
    DateTime::<Utc>::from(modtime).to_rfc3339_opts(SecondsFormat::Nanos, true)
}
