//! Directory listing and stale-object discovery.

use crate::error::{CleanError, Result};
use crate::matcher::find_stale_with;
use crate::modtime::ModtimeResolver;
use crate::patterns::{FileKind, Patterns};
use crate::time::format_modtime;

use ignore::WalkBuilder;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

/// Classified entries of one directory, each list sorted by full name
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Candidates {
    pub sources: Vec<String>,
    pub objects: Vec<String>,
}

/// An object file older than its source or one of the headers the source includes
#[derive(Debug, Clone)]
pub struct StaleObject {
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
    /// Recursive modtime of the matching source
    pub source_modified: SystemTime,
}

/// List the immediate entries of `dir` and classify them by suffix.
///
/// Hidden entries are included and ignore files are not honored; every name
/// in the directory is a candidate. Names that are not valid UTF-8 are skipped.
pub fn scan_directory(dir: &Path, patterns: &Patterns) -> Result<Candidates> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .max_depth(Some(1))
        .build();

    let mut candidates = Candidates::default();
    for result in walker {
        let entry = result?;
        if entry.depth() == 0 {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            debug!(path = %entry.path().display(), "skipping non-UTF-8 name");
            continue;
        };

        match patterns.classify(name) {
            Some(FileKind::Source) => candidates.sources.push(name.to_string()),
            Some(FileKind::Object) => candidates.objects.push(name.to_string()),
            None => {}
        }
    }

    candidates.sources.sort();
    candidates.objects.sort();
    debug!(
        sources = candidates.sources.len(),
        objects = candidates.objects.len(),
        "scanned {}",
        dir.display()
    );
    Ok(candidates)
}

/// Hand every object in `dir` whose matching source is newer, once includes
/// are taken into account, to `on_stale` as soon as its pair is checked.
///
/// Include names are resolved relative to `dir`. The first error, from the
/// filesystem or from `on_stale`, stops the merge; objects already handed out
/// stay handled. Returns the number of stale objects found.
pub fn find_stale_objects<F>(dir: &Path, mut on_stale: F) -> Result<usize>
where
    F: FnMut(&StaleObject) -> Result<()>,
{
    let patterns = Patterns::load()?;
    let candidates = scan_directory(dir, &patterns)?;
    let mut resolver = ModtimeResolver::new(dir);

    let stale = find_stale_with(&candidates.sources, &candidates.objects, |source, object| {
        let metadata =
            fs::metadata(dir.join(object)).map_err(|err| CleanError::io(object, err))?;
        let modified = metadata
            .modified()
            .map_err(|err| CleanError::io(object, err))?;
        let source_modified = resolver.resolve(source)?;

        let is_stale = source_modified > modified;
        debug!(
            source,
            object,
            is_stale,
            source_modified = %format_modtime(source_modified),
            object_modified = %format_modtime(modified),
            "matched"
        );
        if !is_stale {
            return Ok(None);
        }

        on_stale(&StaleObject {
            name: object.to_string(),
            size: metadata.len(),
            modified,
            source_modified,
        })?;
        Ok(Some(()))
    })?;

    Ok(stale.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};

    fn write_at(dir: &Path, name: &str, contents: &str, secs: i64) {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    fn collect_stale(dir: &Path) -> Result<Vec<StaleObject>> {
        let mut stale = Vec::new();
        find_stale_objects(dir, |object| {
            stale.push(object.clone());
            Ok(())
        })?;
        Ok(stale)
    }

    #[test]
    fn test_scan_classifies_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["z.c", "a.cpp", "m.cc", "b.o", "a.o", "notes.txt", "a.h", ".hidden.c"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let patterns = Patterns::load().unwrap();
        let candidates = scan_directory(dir.path(), &patterns).unwrap();
        assert_eq!(candidates.sources, vec![".hidden.c", "a.cpp", "m.cc", "z.c"]);
        assert_eq!(candidates.objects, vec!["a.o", "b.o"]);
    }

    #[test]
    fn test_scan_does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/deep.c"), "").unwrap();
        fs::write(dir.path().join("sub/deep.o"), "").unwrap();
        fs::write(dir.path().join("top.c"), "").unwrap();

        let patterns = Patterns::load().unwrap();
        let candidates = scan_directory(dir.path(), &patterns).unwrap();
        assert_eq!(candidates.sources, vec!["top.c"]);
        assert!(candidates.objects.is_empty());
    }

    #[test]
    fn test_scan_ignores_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.o\n").unwrap();
        fs::write(dir.path().join("a.o"), "").unwrap();

        let patterns = Patterns::load().unwrap();
        let candidates = scan_directory(dir.path(), &patterns).unwrap();
        assert_eq!(candidates.objects, vec!["a.o"]);
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let patterns = Patterns::load().unwrap();
        assert!(scan_directory(&dir.path().join("absent"), &patterns).is_err());
    }

    #[test]
    fn test_find_stale_objects_through_header() {
        let dir = tempfile::tempdir().unwrap();
        write_at(dir.path(), "a.c", "#include \"b.h\"\n", 1_000);
        write_at(dir.path(), "b.h", "", 3_000);
        write_at(dir.path(), "a.o", "object", 2_000);

        let stale = collect_stale(dir.path()).unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].name, "a.o");
        assert_eq!(stale[0].size, 6);
        assert!(stale[0].source_modified > stale[0].modified);
    }

    #[test]
    fn test_orphan_objects_are_never_stale() {
        let dir = tempfile::tempdir().unwrap();
        write_at(dir.path(), "orphan.o", "", 1_000);
        write_at(dir.path(), "other.c", "", 9_000);

        assert!(collect_stale(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_unmatched_sources_are_not_read() {
        let dir = tempfile::tempdir().unwrap();
        // Would fail to resolve if it were ever visited
        write_at(dir.path(), "lonely.c", "#include \"missing.h\"\n", 1_000);
        write_at(dir.path(), "a.c", "", 1_000);
        write_at(dir.path(), "a.o", "", 2_000);

        assert!(collect_stale(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_header_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write_at(dir.path(), "a.c", "#include \"missing.h\"\n", 1_000);
        write_at(dir.path(), "a.o", "", 2_000);

        let err = collect_stale(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("missing.h: "), "{err}");
    }

    #[test]
    fn test_equal_modtimes_are_not_stale() {
        let dir = tempfile::tempdir().unwrap();
        write_at(dir.path(), "a.c", "", 1_000);
        write_at(dir.path(), "a.o", "obj", 1_000);

        assert!(collect_stale(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_only_objects_of_newer_sources_are_stale() {
        let dir = tempfile::tempdir().unwrap();
        write_at(dir.path(), "a.c", "#include \"b.h\"\n", 1_000);
        write_at(dir.path(), "b.h", "", 3_000);
        write_at(dir.path(), "a.o", "obj", 2_000);
        write_at(dir.path(), "c.c", "", 1_000);
        write_at(dir.path(), "c.o", "obj", 2_000);

        let names: Vec<String> = collect_stale(dir.path())
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["a.o"]);
    }

    #[test]
    fn test_stale_objects_are_handed_out_before_a_later_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_at(dir.path(), "a.c", "", 2_000);
        write_at(dir.path(), "a.o", "obj", 1_000);
        write_at(dir.path(), "b.c", "#include \"gone.h\"\n", 2_000);
        write_at(dir.path(), "b.o", "obj", 1_000);

        let mut seen = Vec::new();
        let err = find_stale_objects(dir.path(), |object| {
            seen.push(object.name.clone());
            Ok(())
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("gone.h: "), "{err}");
        assert_eq!(seen, vec!["a.o"]);
    }

    #[test]
    fn test_callback_error_stops_the_merge() {
        let dir = tempfile::tempdir().unwrap();
        write_at(dir.path(), "a.c", "", 2_000);
        write_at(dir.path(), "a.o", "obj", 1_000);
        write_at(dir.path(), "b.c", "", 2_000);
        write_at(dir.path(), "b.o", "obj", 1_000);

        let mut calls = 0;
        let result = find_stale_objects(dir.path(), |object| {
            calls += 1;
            Err(CleanError::io(
                &object.name,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            ))
        });
        assert_eq!(result.unwrap_err().to_string(), "a.o: denied");
        assert_eq!(calls, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let odd = OsStr::from_bytes(b"caf\xe9.o");
        // Some filesystems refuse non-UTF-8 names outright
        if fs::write(dir.path().join(odd), "").is_err() {
            return;
        }
        fs::write(dir.path().join("plain.o"), "").unwrap();

        let patterns = Patterns::load().unwrap();
        let candidates = scan_directory(dir.path(), &patterns).unwrap();
        assert_eq!(candidates.objects, vec!["plain.o"]);
    }
}
