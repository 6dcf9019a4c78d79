//! Core resolution algorithm: depth-first manifest traversal, cycle guard,
//! shared cache, replacement directives, and degrade-to-leaf on failure.

use std::sync::Arc;

use modtree_core::artifact::Artifact;
use modtree_core::coordinate::ModuleCoordinate;
use modtree_core::modfile::{ModFile, Require};
use modtree_source::detector::SourceDetector;
use modtree_source::index::{normalize_module_path, ModuleIndex};
use modtree_source::source::ModuleSource;

use crate::cache::{ResolutionContext, ResolutionStats};

/// How a node was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Resolved,
    /// No provider for the host.
    Opaque,
    /// Fetch, decode or parse failed.
    Degraded,
    /// Coordinate already in progress higher up the stack.
    Cycle,
}

/// Builds artifact trees from a root coordinate.
pub struct Resolver<'a> {
    detector: SourceDetector<'a>,
    index: &'a dyn ModuleIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(detector: SourceDetector<'a>, index: &'a dyn ModuleIndex) -> Self {
        Self { detector, index }
    }

    /// Resolve `coordinate` at `version` with a fresh context.
    pub fn resolve_root(&self, coordinate: &str, version: &str) -> (Artifact, ResolutionStats) {
        let mut ctx = ResolutionContext::new();
        let root = self.resolve(coordinate, version, &mut ctx);
        tracing::info!(
            fetches = ctx.stats.fetches,
            cache_hits = ctx.stats.cache_hits,
            cycle_breaks = ctx.stats.cycle_breaks,
            degraded = ctx.stats.degraded,
            "resolved {coordinate}@{version}"
        );
        (root, ctx.stats)
    }

    /// Resolve one coordinate, recursing into its requirements.
    ///
    /// Never fails: unreachable, undecodable or malformed manifests become
    /// childless nodes and the traversal continues.
    pub fn resolve(&self, coordinate: &str, version: &str, ctx: &mut ResolutionContext) -> Artifact {
        self.resolve_node(coordinate, version, ctx).0
    }

    fn resolve_node(
        &self,
        coordinate: &str,
        version: &str,
        ctx: &mut ResolutionContext,
    ) -> (Artifact, Outcome) {
        if !ctx.visited.enter(coordinate) {
            tracing::debug!("cycle at {coordinate}@{version}, emitting leaf");
            ctx.stats.cycle_breaks += 1;
            return (Artifact::leaf(coordinate, version), Outcome::Cycle);
        }
        let result = self.resolve_manifest(coordinate, version, ctx);
        ctx.visited.leave(coordinate);
        result
    }

    fn resolve_manifest(
        &self,
        coordinate: &str,
        version: &str,
        ctx: &mut ResolutionContext,
    ) -> (Artifact, Outcome) {
        let Some(mut source) = self.detector.detect(coordinate, version) else {
            tracing::debug!("no source provider for {coordinate:?}, treating as opaque");
            return (Artifact::leaf(coordinate, version), Outcome::Opaque);
        };

        ctx.stats.fetches += 1;
        let bytes = match source.fetch() {
            Ok(bytes) => bytes,
            Err(e) => {
                let reason = format!("{} failure: {e}", e.kind());
                return degrade(&*source, coordinate, &reason, ctx);
            }
        };
        if bytes.is_empty() {
            return degrade(&*source, coordinate, "empty manifest", ctx);
        }

        let manifest = match ModFile::parse(&bytes) {
            Ok(m) => m,
            Err(e) => return degrade(&*source, coordinate, &e.to_string(), ctx),
        };
        if manifest.module.is_empty() {
            return degrade(&*source, coordinate, "manifest has no module directive", ctx);
        }

        let current_version = source.version().to_string();
        tracing::debug!(
            go = manifest.go.as_deref().unwrap_or("unspecified"),
            indirect = manifest.requires.iter().filter(|r| r.indirect).count(),
            "{} {current_version}: {} requirements from {}",
            manifest.module,
            manifest.requires.len(),
            source.url()
        );

        let mut node = Artifact::leaf(&manifest.module, &current_version);
        for req in &manifest.requires {
            let child = self.resolve_requirement(&manifest, req, &current_version, ctx);
            node.dependencies.push(child);
        }
        (node, Outcome::Resolved)
    }

    fn resolve_requirement(
        &self,
        manifest: &ModFile,
        req: &Require,
        current_version: &str,
        ctx: &mut ResolutionContext,
    ) -> Arc<Artifact> {
        let (path, version) = effective_requirement(manifest, req, current_version);

        if path == manifest.module {
            tracing::debug!("{} requires itself, emitting leaf", manifest.module);
            return Arc::new(Artifact::leaf(path, version));
        }

        let requirement = ModuleCoordinate::new(path, version);
        let key = requirement.cache_key();
        if let Some(hit) = ctx.cache.get(&key) {
            tracing::debug!("cache hit for {key}");
            ctx.stats.cache_hits += 1;
            return hit;
        }

        let (mut artifact, outcome) = if requirement.path.is_empty() {
            (Artifact::leaf("", requirement.version.as_str()), Outcome::Opaque)
        } else if self.detector.is_direct(&requirement.path) {
            self.resolve_node(&requirement.path, &requirement.version, ctx)
        } else {
            let target = normalize_module_path(self.index, &requirement.path);
            tracing::debug!("{requirement} resolved to {target}");
            self.resolve_node(&target.path, &target.version, ctx)
        };
        if artifact.name.is_empty() {
            artifact.name = requirement.path;
        }

        let artifact = Arc::new(artifact);
        // A cycle leaf only stands in while the real node is in progress.
        if outcome != Outcome::Cycle {
            ctx.cache.insert(key, artifact.clone());
        }
        artifact
    }
}

/// Effective `(path, version)` of a requirement after replacement directives.
///
/// The first replacement whose old path matches wins. A replacement without a
/// version inherits `current_version`, the version of the module whose
/// manifest is being read.
pub fn effective_requirement(
    manifest: &ModFile,
    req: &Require,
    current_version: &str,
) -> (String, String) {
    match manifest.replacement_for(&req.path) {
        Some(rep) => {
            let version = match rep.new_version.as_deref() {
                Some(v) if !v.is_empty() => v,
                _ => current_version,
            };
            (rep.new_path.clone(), version.to_string())
        }
        None => (req.path.clone(), req.version.clone()),
    }
}

fn degrade(
    source: &dyn ModuleSource,
    coordinate: &str,
    reason: &str,
    ctx: &mut ResolutionContext,
) -> (Artifact, Outcome) {
    ctx.stats.degraded += 1;
    let name = if source.url().is_empty() {
        coordinate
    } else {
        source.url()
    };
    tracing::warn!(
        source = %source.kind(),
        "{coordinate}@{}: {reason}; keeping it as a leaf",
        source.version()
    );
    (Artifact::leaf(name, source.version()), Outcome::Degraded)
}
