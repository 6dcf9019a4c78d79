//! Operation: resolve a repository's dependency tree and write it as JSON.

use std::path::{Path, PathBuf};

use modtree_core::artifact::Artifact;
use modtree_core::config::ModtreeConfig;
use modtree_core::coordinate::repo_name;
use modtree_resolver::cache::ResolutionStats;
use modtree_resolver::resolver::Resolver;
use modtree_resolver::tree::render_tree;
use modtree_source::detector::SourceDetector;
use modtree_source::fetch::{Fetcher, HttpFetcher};
use modtree_source::index::GoProxy;
use modtree_source::source::SourceContext;
use modtree_source::store::ManifestStore;
use modtree_util::errors::{ModtreeError, ModtreeResult};
use modtree_util::progress::{spinner, status, status_warn};

/// Options for a resolution run.
#[derive(Debug, Default)]
pub struct ResolveOptions {
    /// Root repository coordinate, e.g. `github.com/etcd-io/etcd`.
    pub repo_url: String,
    /// Root version tag.
    pub version: String,
    /// JSON output path; falls back to `[output] path`.
    pub output: Option<PathBuf>,
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// Also print the tree to stdout.
    pub print: bool,
    /// Depth limit for the printed tree.
    pub depth: Option<usize>,
}

/// Outcome of a resolution run.
#[derive(Debug)]
pub struct ResolveReport {
    pub root: Artifact,
    pub stats: ResolutionStats,
    pub output: PathBuf,
}

/// Resolve over HTTP using the configuration named by `opts`.
pub fn resolve(opts: &ResolveOptions) -> miette::Result<ResolveReport> {
    let config = ModtreeConfig::load(opts.config.as_deref())?;
    let fetcher = HttpFetcher::new(&config.network)?;
    let report = resolve_with(opts, &config, &fetcher)?;

    println!("Dependency tree generated as {}", report.output.display());
    if opts.print {
        print!("{}", render_tree(&report.root, opts.depth));
    }
    Ok(report)
}

/// Resolve with a caller-supplied fetcher and write the JSON tree.
///
/// Individual module failures are folded into the tree; only an unusable
/// manifest store or an unwritable output file fail the run.
pub fn resolve_with(
    opts: &ResolveOptions,
    config: &ModtreeConfig,
    fetcher: &dyn Fetcher,
) -> miette::Result<ResolveReport> {
    let store = ManifestStore::open(&config.work_dir())?;
    let ctx = SourceContext {
        fetcher,
        store: &store,
        settings: &config.sources,
    };
    let index = GoProxy::new(fetcher, &config.index.url);
    let resolver = Resolver::new(SourceDetector::new(ctx), &index);

    status("Resolving", &format!("{} {}", opts.repo_url, opts.version));
    let sp = spinner(&format!("Resolving {}...", repo_name(&opts.repo_url)));
    let (root, stats) = resolver.resolve_root(&opts.repo_url, &opts.version);
    sp.finish_and_clear();

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.path));
    write_tree(&output, &root)?;

    status(
        "Resolved",
        &format!(
            "{} modules ({} fetched, {} cached)",
            root.distinct_count(),
            stats.fetches,
            stats.cache_hits
        ),
    );
    if stats.degraded > 0 {
        status_warn(
            "Degraded",
            &format!("{} modules kept as leaves, see log for details", stats.degraded),
        );
    }

    Ok(ResolveReport {
        root,
        stats,
        output,
    })
}

/// Write `root` as indented JSON to `path`, creating parent directories.
pub fn write_tree(path: &Path, root: &Artifact) -> ModtreeResult<()> {
    let json = serde_json::to_string_pretty(root).map_err(|e| ModtreeError::Generic {
        message: format!("Failed to serialize dependency tree: {e}"),
    })?;
    modtree_util::fs::write_with_parents(path, json.as_bytes())?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
