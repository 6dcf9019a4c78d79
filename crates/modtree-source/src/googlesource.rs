//! Gitiles provider: `?format=TEXT` serves file content base64-encoded.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use modtree_core::coordinate::strip_scheme;
use modtree_core::MANIFEST_FILE;
use modtree_util::errors::{ModtreeError, ModtreeResult};

use crate::source::{probe_with_fallback, ModuleSource, SourceContext, SourceKind};

/// Tag-based gitiles manifest URL.
pub fn manifest_url(repo_url: &str, version: &str) -> String {
    let repo = strip_scheme(repo_url).trim_end_matches('/');
    format!("https://{repo}/+/refs/tags/{version}/{MANIFEST_FILE}?format=TEXT")
}

/// Branch-based gitiles manifest URL.
pub fn branch_url(repo_url: &str, branch: &str) -> String {
    let repo = strip_scheme(repo_url).trim_end_matches('/');
    format!("https://{repo}/+/refs/heads/{branch}/{MANIFEST_FILE}?format=TEXT")
}

/// Decode a `?format=TEXT` body. Line breaks in the payload are ignored.
pub fn decode_text(body: &[u8]) -> ModtreeResult<Vec<u8>> {
    let compact: Vec<u8> = body
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD.decode(&compact).map_err(|e| ModtreeError::Decode {
        message: format!("invalid base64 manifest: {e}"),
    })
}

pub struct GoogleSource<'a> {
    ctx: SourceContext<'a>,
    repo_url: String,
    version: String,
    url: String,
    manifest_path: PathBuf,
}

impl<'a> GoogleSource<'a> {
    pub fn new(ctx: SourceContext<'a>, repo_url: &str, version: &str) -> Self {
        Self {
            manifest_path: ctx.store.manifest_path(repo_url, version),
            ctx,
            repo_url: repo_url.to_string(),
            version: version.to_string(),
            url: repo_url.to_string(),
        }
    }
}

impl ModuleSource for GoogleSource<'_> {
    fn kind(&self) -> SourceKind {
        SourceKind::GoogleSource
    }

    fn resolve_manifest_url(&mut self) -> &str {
        self.url = manifest_url(&self.repo_url, &self.version);
        &self.url
    }

    fn branch_url(&self) -> String {
        branch_url(&self.repo_url, &self.ctx.settings.default_branch)
    }

    fn validate(&mut self) -> ModtreeResult<bool> {
        let fallback = self.branch_url();
        probe_with_fallback(self.ctx.fetcher, &mut self.url, fallback)
    }

    fn fetch(&mut self) -> ModtreeResult<Vec<u8>> {
        self.resolve_manifest_url();
        if !self.validate()? {
            tracing::debug!("No reachable manifest for {}@{}", self.repo_url, self.version);
            return Ok(Vec::new());
        }
        let encoded = self.ctx.fetcher.get(&self.url)?;
        let decoded = decode_text(&encoded)?;
        self.ctx.store.put(&self.manifest_path, &decoded)?;
        Ok(decoded)
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFetcher;
    use crate::store::ManifestStore;
    use modtree_core::config::SourcesConfig;

    const TAG_URL: &str =
        "https://go.googlesource.com/net/+/refs/tags/v0.33.0/go.mod?format=TEXT";
    const BRANCH_URL: &str =
        "https://go.googlesource.com/net/+/refs/heads/master/go.mod?format=TEXT";

    #[test]
    fn url_forms() {
        assert_eq!(manifest_url("go.googlesource.com/net", "v0.33.0"), TAG_URL);
        assert_eq!(branch_url("https://go.googlesource.com/net/", "master"), BRANCH_URL);
    }

    #[test]
    fn decode_ignores_line_breaks() {
        let encoded = STANDARD.encode(b"module golang.org/x/net\n");
        let wrapped = format!("{}\n{}\n", &encoded[..10], &encoded[10..]);
        assert_eq!(
            decode_text(wrapped.as_bytes()).unwrap(),
            b"module golang.org/x/net\n"
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_text(b"not*base64!"),
            Err(ModtreeError::Decode { .. })
        ));
    }

    #[test]
    fn fetch_decodes_and_stores() {
        let body = STANDARD.encode(b"module golang.org/x/net\n");
        let fetcher = MemoryFetcher::new().with(TAG_URL, body);
        let tmp = tempfile::tempdir().unwrap();
        let store = ManifestStore::open(tmp.path()).unwrap();
        let settings = SourcesConfig::default();
        let ctx = SourceContext {
            fetcher: &fetcher,
            store: &store,
            settings: &settings,
        };
        let mut src = GoogleSource::new(ctx, "go.googlesource.com/net", "v0.33.0");
        let bytes = src.fetch().unwrap();
        assert_eq!(bytes, b"module golang.org/x/net\n");
        assert_eq!(std::fs::read(src.manifest_path()).unwrap(), bytes);
        assert_eq!(src.kind(), SourceKind::GoogleSource);
    }

    #[test]
    fn fetch_falls_back_to_branch_on_missing_tag() {
        let body = STANDARD.encode(b"module golang.org/x/net\n");
        let fetcher = MemoryFetcher::new()
            .with_status(TAG_URL, 404, "")
            .with(BRANCH_URL, body);
        let tmp = tempfile::tempdir().unwrap();
        let store = ManifestStore::open(tmp.path()).unwrap();
        let settings = SourcesConfig::default();
        let ctx = SourceContext {
            fetcher: &fetcher,
            store: &store,
            settings: &settings,
        };
        let mut src = GoogleSource::new(ctx, "go.googlesource.com/net", "v0.33.0");
        assert!(!src.fetch().unwrap().is_empty());
        assert_eq!(src.url(), BRANCH_URL);
    }

    #[test]
    fn fetch_bad_payload_is_decode_error() {
        let fetcher = MemoryFetcher::new().with(TAG_URL, "<html>oops</html>");
        let tmp = tempfile::tempdir().unwrap();
        let store = ManifestStore::open(tmp.path()).unwrap();
        let settings = SourcesConfig::default();
        let ctx = SourceContext {
            fetcher: &fetcher,
            store: &store,
            settings: &settings,
        };
        let mut src = GoogleSource::new(ctx, "go.googlesource.com/net", "v0.33.0");
        assert!(matches!(src.fetch(), Err(ModtreeError::Decode { .. })));
    }
}
