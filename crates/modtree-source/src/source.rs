//! The provider capability shared by every hosting kind.

use std::fmt;
use std::path::Path;

use modtree_core::config::SourcesConfig;
use modtree_util::errors::{ModtreeError, ModtreeResult};

use crate::fetch::Fetcher;
use crate::store::ManifestStore;

/// Supported hosting kinds, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Forge-style host serving raw files from a content host.
    GitHub,
    /// Gitiles source browser serving base64 file content.
    GoogleSource,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::GitHub, SourceKind::GoogleSource];

    /// Host marker searched for in a coordinate.
    pub fn marker(self) -> &'static str {
        match self {
            SourceKind::GitHub => "github.com",
            SourceKind::GoogleSource => "googlesource.com",
        }
    }

    /// First kind whose marker occurs in `coordinate`.
    pub fn detect(coordinate: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| coordinate.contains(k.marker()))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::GitHub => write!(f, "github"),
            SourceKind::GoogleSource => write!(f, "googlesource"),
        }
    }
}

/// Borrowed collaborators every provider needs.
#[derive(Clone, Copy)]
pub struct SourceContext<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub store: &'a ManifestStore,
    pub settings: &'a SourcesConfig,
}

/// Turns one repository coordinate and version into manifest bytes.
pub trait ModuleSource {
    fn kind(&self) -> SourceKind;

    /// Rewrite the repository URL into the tag-based manifest URL and make it
    /// the current URL.
    fn resolve_manifest_url(&mut self) -> &str;

    /// Branch-based URL probed when the tag-based one is unreachable.
    fn branch_url(&self) -> String;

    /// Probe the current URL, falling back to [`ModuleSource::branch_url`].
    ///
    /// Returns whether the final URL answered `200`. A transport failure on the
    /// fallback probe is a [`ModtreeError::Validation`].
    fn validate(&mut self) -> ModtreeResult<bool>;

    /// Resolve, validate and download the manifest.
    ///
    /// An unreachable manifest yields empty bytes.
    fn fetch(&mut self) -> ModtreeResult<Vec<u8>>;

    /// Current, possibly rewritten, URL.
    fn url(&self) -> &str;

    /// Version being fetched.
    fn version(&self) -> &str;

    /// Where fetched manifest bytes are stored.
    fn manifest_path(&self) -> &Path;
}

/// Probe `url` with HEAD; on a non-200 answer or transport error switch `url`
/// to `fallback` and probe again.
pub(crate) fn probe_with_fallback(
    fetcher: &dyn Fetcher,
    url: &mut String,
    fallback: String,
) -> ModtreeResult<bool> {
    match fetcher.head(url.as_str()) {
        Ok(200) => return Ok(true),
        Ok(status) => tracing::debug!("HEAD {url} returned {status}, trying {fallback}"),
        Err(e) => tracing::debug!("HEAD {url} failed ({e}), trying {fallback}"),
    }
    *url = fallback;
    match fetcher.head(url.as_str()) {
        Ok(status) => Ok(status == 200),
        Err(e) => Err(ModtreeError::Validation {
            message: format!("failed to check branch URL {url}: {e}"),
        }),
    }
}
