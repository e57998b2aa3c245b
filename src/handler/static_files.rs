//! Static file resolution and loading.
//!
//! Resolution confines every request to its mounted directory:
//! canonicalized results outside the canonicalized root are rejected, so
//! `..` segments and symlinks cannot escape it.

use std::path::{Path, PathBuf};
use tokio::fs;

/// Document tried when a request resolves to a directory.
const INDEX_FILE: &str = "index.html";

/// A file read from disk plus its inferred content type.
#[derive(Debug)]
pub struct LoadedFile {
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Outcome of resolving a request path under one mount.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The canonical path of an existing regular file.
    Found(PathBuf),
    /// Nothing under this mount; later mounts may still match.
    Missing,
    /// The path escaped the mounted directory.
    Outside,
}

/// Resolve `relative` under `root`.
///
/// A missing or unreadable root counts as `Missing`: mounted directories
/// are allowed to appear after the server starts.
pub fn resolve(root: &Path, relative: &str) -> Resolution {
    let Ok(canonical_root) = root.canonicalize() else {
        return Resolution::Missing;
    };

    let mut path = canonical_root.join(relative.trim_start_matches('/'));
    if relative.is_empty() || relative.ends_with('/') || path.is_dir() {
        path = path.join(INDEX_FILE);
    }

    let Ok(canonical) = path.canonicalize() else {
        return Resolution::Missing;
    };
    if !canonical.starts_with(&canonical_root) {
        return Resolution::Outside;
    }

    if canonical.is_file() {
        Resolution::Found(canonical)
    } else {
        Resolution::Missing
    }
}

/// Read a resolved file into memory.
pub async fn load(path: &Path) -> Option<LoadedFile> {
    let content = fs::read(path).await.ok()?;
    let content_type = content_type_for(path);
    Some(LoadedFile {
        content,
        content_type,
    })
}

/// Infer a Content-Type from the file extension.
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir, write};

    #[test]
    fn resolves_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("app.js"), "js").unwrap();

        match resolve(dir.path(), "app.js") {
            Resolution::Found(path) => assert!(path.ends_with("app.js")),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn directories_resolve_their_index() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("docs");
        create_dir(&sub).unwrap();
        write(sub.join("index.html"), "<h1>docs</h1>").unwrap();

        match resolve(dir.path(), "docs/") {
            Resolution::Found(path) => assert!(path.ends_with("docs/index.html")),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn the_mount_root_resolves_its_index() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("index.html"), "<h1>root</h1>").unwrap();

        assert!(matches!(resolve(dir.path(), ""), Resolution::Found(_)));
    }

    #[test]
    fn missing_files_and_missing_roots_are_misses() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve(dir.path(), "nope.txt"), Resolution::Missing);
        assert_eq!(
            resolve(Path::new("/no/such/root"), "file"),
            Resolution::Missing
        );
    }

    #[test]
    fn directory_without_index_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        create_dir(dir.path().join("empty")).unwrap();
        assert_eq!(resolve(dir.path(), "empty/"), Resolution::Missing);
    }

    #[test]
    fn traversal_cannot_escape_the_root() {
        let outer = tempfile::tempdir().unwrap();
        write(outer.path().join("secret.txt"), "secret").unwrap();
        let inner = outer.path().join("public");
        create_dir(&inner).unwrap();

        assert_eq!(resolve(&inner, "../secret.txt"), Resolution::Outside);
    }

    #[test]
    fn content_types_follow_the_extension() {
        assert_eq!(content_type_for(Path::new("a.html")), "text/html");
        assert_eq!(content_type_for(Path::new("a.css")), "text/css");
        assert_eq!(
            content_type_for(Path::new("a.bin-unknown")),
            "application/octet-stream"
        );
    }
}
