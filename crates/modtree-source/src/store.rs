//! On-disk manifest store mirroring repository layout.

use std::path::{Path, PathBuf};

use modtree_core::coordinate::strip_scheme;
use modtree_core::MANIFEST_FILE;
use modtree_util::errors::ModtreeResult;

/// Fetched manifests at `<root>/<host>/<owner>/<repo>/<version>/go.mod`.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    root: PathBuf,
}

impl ManifestStore {
    /// Open a store rooted at `root`, creating the directory.
    ///
    /// Failure here means the run cannot record anything and is fatal.
    pub fn open(root: &Path) -> ModtreeResult<Self> {
        modtree_util::fs::ensure_dir(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Directory holding the manifest for a coordinate.
    pub fn manifest_dir(&self, coordinate: &str, version: &str) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in strip_scheme(coordinate).split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                continue;
            }
            dir.push(sanitize(segment));
        }
        if version.is_empty() {
            dir.push("_");
        } else {
            dir.push(sanitize(version));
        }
        dir
    }

    /// Path of the manifest file for a coordinate.
    pub fn manifest_path(&self, coordinate: &str, version: &str) -> PathBuf {
        self.manifest_dir(coordinate, version).join(MANIFEST_FILE)
    }

    /// Store manifest bytes at `path`, creating directories as needed.
    pub fn put(&self, path: &Path, data: &[u8]) -> ModtreeResult<()> {
        modtree_util::fs::write_with_parents(path, data)?;
        tracing::debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(())
    }
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            ':' | '?' | '*' | '<' | '>' | '|' | '"' | '\\' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_mirrors_repository() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ManifestStore::open(tmp.path()).unwrap();
        let path = store.manifest_path("github.com/etcd-io/etcd", "v3.6.0-rc.0");
        assert_eq!(
            path,
            tmp.path()
                .join("github.com/etcd-io/etcd/v3.6.0-rc.0/go.mod")
        );
    }

    #[test]
    fn scheme_and_dot_segments_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ManifestStore::open(tmp.path()).unwrap();
        let path = store.manifest_path("https://example.com/../a/./b/", "");
        assert_eq!(path, tmp.path().join("example.com/a/b/_/go.mod"));
    }

    #[test]
    fn put_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ManifestStore::open(&tmp.path().join("nested/root")).unwrap();
        let path = store.manifest_path("github.com/a/b", "v1.0.0");
        store.put(&path, b"module b\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"module b\n");
    }

    #[test]
    fn open_fails_under_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("blocker");
        std::fs::write(&file, b"").unwrap();
        assert!(ManifestStore::open(&file.join("root")).is_err());
    }
}
