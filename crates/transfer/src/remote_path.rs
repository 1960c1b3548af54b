//! Helpers for `/`-separated remote paths.
//!
//! Remote paths are plain strings. An empty string names the session's
//! current working directory.

/// Reports whether `path` names the top of the remote tree or the current
/// directory (`""`, `"."`, `"/"`).
pub(crate) fn is_root(path: &str) -> bool {
    matches!(path.trim_end_matches('/'), "" | ".")
}

/// Removes trailing separators while keeping a lone `/`.
pub(crate) fn trim(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Returns the final component of `path`, or `""` for a root.
pub(crate) fn basename(path: &str) -> &str {
    let trimmed = trim(path);
    if trimmed == "/" {
        return "";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Returns the directory containing `path`.
///
/// A relative single-component path has the current directory (`""`) as
/// its parent; a top-level absolute path has `/`.
pub(crate) fn parent(path: &str) -> &str {
    let trimmed = trim(path);
    match trimmed.rfind('/') {
        Some(0) => "/",
        Some(index) => &trimmed[..index],
        None => "",
    }
}

/// Appends `name` to `base`.
pub(crate) fn join(base: &str, name: &str) -> String {
    let base = trim(base);
    match base {
        "" | "." => name.to_owned(),
        "/" => format!("/{name}"),
        _ => format!("{base}/{name}"),
    }
}

/// Reports whether a listing name denotes the listed directory or its parent.
pub(crate) fn is_dot_entry(name: &str) -> bool {
    matches!(basename(name), "" | "." | "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_are_recognised() {
        for root in ["", ".", "/", "//", "./"] {
            assert!(is_root(root), "{root:?}");
        }
        for other in ["a", "/a", "./a", ".."] {
            assert!(!is_root(other), "{other:?}");
        }
    }

    #[test]
    fn basename_ignores_trailing_separators() {
        assert_eq!(basename("/pub/data/"), "data");
        assert_eq!(basename("file.txt"), "file.txt");
        assert_eq!(basename("/"), "");
        assert_eq!(basename(""), "");
    }

    #[test]
    fn parent_of_relative_and_absolute_paths() {
        assert_eq!(parent("a.txt"), "");
        assert_eq!(parent("/a.txt"), "/");
        assert_eq!(parent("pub/sub/"), "pub");
        assert_eq!(parent("/pub/sub/x"), "/pub/sub");
    }

    #[test]
    fn join_handles_empty_dot_and_root_bases() {
        assert_eq!(join("", "a"), "a");
        assert_eq!(join(".", "a"), "a");
        assert_eq!(join("/", "a"), "/a");
        assert_eq!(join("/pub/", "a"), "/pub/a");
        assert_eq!(join("pub", "a"), "pub/a");
    }

    #[test]
    fn dot_entries_are_detected() {
        assert!(is_dot_entry("."));
        assert!(is_dot_entry(".."));
        assert!(is_dot_entry("/pub/.."));
        assert!(!is_dot_entry("..hidden"));
    }
}
