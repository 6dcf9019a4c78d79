//! Module index lookup: vanity module paths to concrete repositories.

use serde::{Deserialize, Serialize};

use modtree_core::coordinate::{strip_scheme, ModuleCoordinate};
use modtree_util::errors::{ModtreeError, ModtreeResult};

use crate::fetch::Fetcher;

/// Source control origin reported by the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(rename = "VCS", default)]
    pub vcs: String,
    #[serde(rename = "URL", default)]
    pub url: String,
    #[serde(rename = "Hash", default)]
    pub hash: String,
    #[serde(rename = "Ref", default)]
    pub reference: String,
}

/// Response of `<index>/<module>/@latest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "Time", default)]
    pub time: String,
    #[serde(rename = "Origin", default)]
    pub origin: Option<Origin>,
}

/// Canonical module index.
pub trait ModuleIndex {
    /// Latest known version and origin for `path`. Fails with
    /// [`ModtreeError::Lookup`] when the answer lacks a version or origin URL.
    fn latest(&self, path: &str) -> ModtreeResult<ModuleInfo>;
}

/// Go module proxy protocol client.
pub struct GoProxy<'a> {
    fetcher: &'a dyn Fetcher,
    base_url: String,
}

impl<'a> GoProxy<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `<base>/<escaped path>/@latest`.
    pub fn latest_url(&self, path: &str) -> String {
        format!("{}/{}/@latest", self.base_url, escape_path(path))
    }
}

impl ModuleIndex for GoProxy<'_> {
    fn latest(&self, path: &str) -> ModtreeResult<ModuleInfo> {
        let url = self.latest_url(path);
        let body = self.fetcher.get(&url).map_err(|e| ModtreeError::Lookup {
            message: format!("{path}: {e}"),
        })?;
        let info: ModuleInfo = serde_json::from_slice(&body).map_err(|e| ModtreeError::Lookup {
            message: format!("{path}: malformed index response: {e}"),
        })?;
        if info.version.is_empty() {
            return Err(ModtreeError::Lookup {
                message: format!("{path}: index response has no Version"),
            });
        }
        if info.origin.as_ref().map_or(true, |o| o.url.is_empty()) {
            return Err(ModtreeError::Lookup {
                message: format!("{path}: index response has no Origin.URL"),
            });
        }
        Ok(info)
    }
}

/// Case-encode a module path for the proxy: each uppercase letter becomes
/// `!` followed by its lowercase form.
pub fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            out.push('!');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolve a module path to its source repository and latest version.
///
/// Any lookup failure yields an empty coordinate.
pub fn normalize_module_path(index: &dyn ModuleIndex, path: &str) -> ModuleCoordinate {
    match index.latest(path) {
        Ok(info) => {
            let url = info.origin.map(|o| o.url).unwrap_or_default();
            ModuleCoordinate::new(strip_scheme(&url), info.version)
        }
        Err(e) => {
            tracing::warn!(module = path, "module index lookup failed: {e}");
            ModuleCoordinate::new("", "")
        }
    }
}
