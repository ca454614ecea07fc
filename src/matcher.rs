//! Pairing of object files with the sources that produce them.

use crate::error::Result;

use std::cmp::Ordering;

/// Suffix starting at the last `.` of `name`, or `""` if there is none
pub fn extension(name: &str) -> &str {
    name.rfind('.').map_or("", |i| &name[i..])
}

/// `name` without its final extension
pub fn stem(name: &str) -> &str {
    &name[..name.len() - extension(name).len()]
}

pub fn has_extension(name: &str, ext: &str) -> bool {
    extension(name) == ext
}

/// Order two file names by their stems.
///
/// Stems are compared bytewise over the shorter stem's length. When that
/// common prefix is equal, the shorter stem sorts first and nothing past the
/// prefix is looked at.
pub fn compare_base_names(a: &str, b: &str) -> Ordering {
    let a = stem(a).as_bytes();
    let b = stem(b).as_bytes();
    let n = a.len().min(b.len());
    a[..n].cmp(&b[..n]).then(a.len().cmp(&b.len()))
}

/// Merge sorted `sources` and `objects`, calling `check` on each matched pair.
///
/// Both slices must be sorted ascending by full file name. For each object the
/// source cursor skips sources whose base name sorts before the object's; if
/// the next source has the same base name the pair is handed to `check`. The
/// cursor is never rewound, and at most one source is tried per object, so
/// objects without a source are silently passed over.
///
/// `check` returns `Some` for stale objects; those values are collected in
/// object order. The first error from `check` aborts the merge.
pub fn find_stale_with<T, F>(
    sources: &[String],
    objects: &[String],
    mut check: F,
) -> Result<Vec<T>>
where
    F: FnMut(&str, &str) -> Result<Option<T>>,
{
    let mut stale = Vec::new();
    let mut cursor = 0;

    for object in objects {
        while let Some(source) = sources.get(cursor) {
            match compare_base_names(source, object) {
                Ordering::Less => cursor += 1,
                Ordering::Greater => break,
                Ordering::Equal => {
                    if let Some(found) = check(source, object)? {
                        stale.push(found);
                    }
                    break;
                }
            }
        }
    }

    Ok(stale)
}
