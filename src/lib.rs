//! cclean - Stale Object Finder
//!
//! cclean looks at the C and C++ sources in a directory and reports (or removes) the object
//! files that are older than the code they were built from. A source counts as modified when it
//! or any header it transitively `#include`s with quotes is newer than its object.
//!
//! ## Pipeline
//!
//! - `scanner` lists the directory once and splits entries into sources and objects
//! - `matcher` pairs each object with the source of the same base name in one linear merge
//! - `modtime` computes recursive modification times over the include graph, cycles included

pub mod error;
pub mod includes;
pub mod matcher;
pub mod modtime;
pub mod patterns;
pub mod scanner;
pub mod time;

// Re-export commonly used items
pub use error::{CleanError, Result};
pub use includes::find_includes;
pub use matcher::{compare_base_names, extension, find_stale_with, stem};
pub use modtime::ModtimeResolver;
pub use patterns::{FileKind, Patterns};
pub use scanner::{find_stale_objects, scan_directory, Candidates, StaleObject};
