//! Path helpers shared by resolution and the drive operations.

/// Split a path into its non-empty segments.
///
/// A missing leading slash is accepted, repeated and trailing slashes are
/// ignored. "/" and "" both yield no segments.
pub(crate) fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Normalize a path (leading slash, no empty segments, no trailing slash).
pub(crate) fn normalize_path(path: &str) -> String {
    format!("/{}", segments(path).join("/"))
}

/// Whether the path names the drive root.
pub(crate) fn is_root(path: &str) -> bool {
    segments(path).is_empty()
}

/// Path of the parent folder ("/" for top-level entries and for the root).
pub(crate) fn parent_path(path: &str) -> String {
    let parts = segments(path);
    match parts.split_last() {
        Some((_, parents)) => format!("/{}", parents.join("/")),
        None => "/".to_string(),
    }
}

/// Join a parent path and a child name.
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    let parent = normalize_path(parent);
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}
