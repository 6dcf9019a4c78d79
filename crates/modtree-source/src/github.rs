//! GitHub provider: manifests come from the raw content host.

use std::path::{Path, PathBuf};

use modtree_core::coordinate::{owner_and_repo, strip_scheme};
use modtree_core::MANIFEST_FILE;
use modtree_util::errors::ModtreeResult;

use crate::source::{probe_with_fallback, ModuleSource, SourceContext, SourceKind};

/// Tag-based raw manifest URL.
///
/// `github.com/etcd-io/etcd` at `v3.6.0` becomes
/// `https://raw.githubusercontent.com/etcd-io/etcd/refs/tags/v3.6.0/go.mod`.
pub fn manifest_url(repo_url: &str, version: &str, raw_host: &str) -> String {
    let raw = strip_scheme(repo_url).replacen("github.com/", &format!("{raw_host}/"), 1);
    let raw = raw.trim_end_matches('/');
    format!("https://{raw}/refs/tags/{version}/{MANIFEST_FILE}")
}

/// Branch-based raw manifest URL for the repository owning `repo_url`.
///
/// Probed after a failed tag probe. It must differ from the tag URL, otherwise
/// a missing tag is re-checked instead of falling back to the default branch.
pub fn branch_url(repo_url: &str, branch: &str, raw_host: &str) -> String {
    match owner_and_repo(repo_url) {
        Some((owner, repo)) => {
            format!("https://{raw_host}/{owner}/{repo}/refs/heads/{branch}/{MANIFEST_FILE}")
        }
        None => {
            let raw = strip_scheme(repo_url).replacen("github.com/", &format!("{raw_host}/"), 1);
            format!(
                "https://{}/refs/heads/{branch}/{MANIFEST_FILE}",
                raw.trim_end_matches('/')
            )
        }
    }
}

pub struct GitHubSource<'a> {
    ctx: SourceContext<'a>,
    repo_url: String,
    version: String,
    url: String,
    manifest_path: PathBuf,
}

impl<'a> GitHubSource<'a> {
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

impl ModuleSource for GitHubSource<'_> {
    fn kind(&self) -> SourceKind {
        SourceKind::GitHub
    }

    fn resolve_manifest_url(&mut self) -> &str {
        self.url = manifest_url(
            &self.repo_url,
            &self.version,
            &self.ctx.settings.github_raw_host,
        );
        &self.url
    }

    fn branch_url(&self) -> String {
        branch_url(
            &self.repo_url,
            &self.ctx.settings.default_branch,
            &self.ctx.settings.github_raw_host,
        )
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
        let bytes = self.ctx.fetcher.get(&self.url)?;
        self.ctx.store.put(&self.manifest_path, &bytes)?;
        Ok(bytes)
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
