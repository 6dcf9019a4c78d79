//! Module coordinates and the URL helpers that derive identifiers from them.

use std::fmt;

/// A `(path, version)` pair identifying a module at a point in time.
///
/// Equality is exact on both fields; no semantic version normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleCoordinate {
    pub path: String,
    pub version: String,
}

impl ModuleCoordinate {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }

    /// `path@version`, the resolution cache key.
    pub fn cache_key(&self) -> String {
        cache_key(&self.path, &self.version)
    }
}

impl fmt::Display for ModuleCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}

/// `path@version` for a path and version held separately.
pub fn cache_key(path: &str, version: &str) -> String {
    format!("{path}@{version}")
}

/// Remove a leading `https://` or `http://`.
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Last path segment of a repository URL, ignoring one trailing `/`.
///
/// `github.com/etcd-io/etcd/` becomes `etcd`.
pub fn repo_name(url: &str) -> &str {
    let url = url.strip_suffix('/').unwrap_or(url);
    url.rsplit('/').next().unwrap_or("")
}

/// `(owner, repo)`: the two path segments following the host.
///
/// `https://github.com/etcd-io/etcd/tree/main` gives `("etcd-io", "etcd")`.
pub fn owner_and_repo(url: &str) -> Option<(&str, &str)> {
    let mut parts = strip_scheme(url)
        .split('/')
        .skip(1)
        .filter(|s| !s.is_empty());
    Some((parts.next()?, parts.next()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_format() {
        let coord = ModuleCoordinate::new("golang.org/x/net", "v0.20.0");
        assert_eq!(coord.cache_key(), "golang.org/x/net@v0.20.0");
        assert_eq!(coord.to_string(), "golang.org/x/net@v0.20.0");
    }

    #[test]
    fn equality_is_exact() {
        assert_ne!(
            ModuleCoordinate::new("a", "v1.0.0"),
            ModuleCoordinate::new("a", "1.0.0")
        );
    }

    #[test]
    fn strip_scheme_variants() {
        assert_eq!(strip_scheme("https://go.googlesource.com/net"), "go.googlesource.com/net");
        assert_eq!(strip_scheme("http://example.com/x"), "example.com/x");
        assert_eq!(strip_scheme("github.com/a/b"), "github.com/a/b");
    }

    #[test]
    fn repo_name_trims_trailing_slash() {
        assert_eq!(repo_name("github.com/etcd-io/etcd/"), "etcd");
        assert_eq!(repo_name("github.com/etcd-io/etcd"), "etcd");
        assert_eq!(repo_name("etcd"), "etcd");
        assert_eq!(repo_name(""), "");
    }

    #[test]
    fn owner_and_repo_from_url() {
        assert_eq!(
            owner_and_repo("github.com/etcd-io/etcd"),
            Some(("etcd-io", "etcd"))
        );
        assert_eq!(
            owner_and_repo("https://github.com/etcd-io/etcd/tree/main"),
            Some(("etcd-io", "etcd"))
        );
        assert_eq!(owner_and_repo("github.com/etcd-io"), None);
        assert_eq!(owner_and_repo("etcd"), None);
    }
}
