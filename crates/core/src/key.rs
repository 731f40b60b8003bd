//! Remote object key handling
//!
//! User-supplied remote paths may be written with a leading `/` for
//! readability. Keys are normalized right before every list, put and delete
//! so the slash never ends up in the bucket.

use std::path::{Component, Path};

/// Strip exactly one leading `/`
///
/// Nothing else is validated or rewritten.
pub fn normalize(key: &str) -> &str {
    key.strip_prefix('/').unwrap_or(key)
}

/// Append one path segment to a key prefix
///
/// Trailing slashes on `base` are dropped so the result never contains `//`
/// at the join point. An empty base produces `/segment`, which [`normalize`]
/// turns into `segment`.
pub fn join(base: &str, segment: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), segment)
}

/// Key suffix of `path` relative to `root`: its components joined with `/`
///
/// Returns `None` when `path` is not below `root` or a component is not
/// valid UTF-8.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str()?),
            Component::CurDir => continue,
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_strips_one_slash() {
        assert_eq!(normalize("/a/b"), "a/b");
        assert_eq!(normalize("a/b"), "a/b");
        assert_eq!(normalize("//a"), "/a");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_idempotent_on_single_slash() {
        for key in ["/dist/app.js", "dist/app.js", "/", "x"] {
            assert_eq!(normalize(normalize(key)), normalize(key));
        }
    }

    #[test]
    fn test_join_slash_styles() {
        assert_eq!(join("p", "x.txt"), "p/x.txt");
        assert_eq!(join("p/", "x.txt"), "p/x.txt");
        assert_eq!(join("/p", "sub/y.txt"), "/p/sub/y.txt");
        assert_eq!(normalize(&join("", "x.txt")), "x.txt");
        assert_eq!(normalize(&join("/", "x.txt")), "x.txt");
    }

    #[test]
    fn test_relative_key() {
        let root = PathBuf::from("/work/build");
        assert_eq!(
            relative_key(&root, &root.join("sub").join("y.txt")).as_deref(),
            Some("sub/y.txt")
        );
        assert_eq!(relative_key(&root, &root.join("x.txt")).as_deref(), Some("x.txt"));
        assert_eq!(relative_key(&root, &root), None);
        assert_eq!(relative_key(&root, Path::new("/elsewhere/x.txt")), None);
    }
}
