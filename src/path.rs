use std::path::{Path, PathBuf};

/// Iterates the non-empty `/`-separated segments of a subdirectory.
pub(crate) fn segments(subdir: &str) -> impl Iterator<Item = &str> {
    subdir.split('/').filter(|segment| !segment.is_empty())
}

pub(crate) fn is_empty_subdir(subdir: &str) -> bool {
    segments(subdir).next().is_none()
}

/// Appends every segment of `subdir` to `base`.
///
/// Segments are pushed one at a time so a leading `/` in `subdir` never
/// replaces `base`.
pub(crate) fn join(base: &Path, subdir: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for segment in segments(subdir) {
        path.push(segment);
    }
    path
}

/// Rewrites `separator` to `/`. Paths that are not valid UTF-8 are returned
/// unchanged.
pub(crate) fn to_slash(path: &Path, separator: char) -> PathBuf {
    if separator == '/' {
        return path.to_path_buf();
    }
    match path.to_str() {
        Some(s) => PathBuf::from(s.replace(separator, "/")),
        None => path.to_path_buf(),
    }
}
