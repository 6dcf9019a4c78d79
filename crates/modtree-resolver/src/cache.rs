//! Per-run resolution state: the in-progress set and the shared artifact cache.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use modtree_core::artifact::Artifact;

/// Coordinates currently being resolved on the call stack.
///
/// A path is entered before its manifest is fetched and left when its
/// resolution returns, so membership means "in progress", not "seen".
#[derive(Debug, Default)]
pub struct VisitedSet {
    in_progress: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` in progress. Returns `false` if it already was.
    pub fn enter(&mut self, path: &str) -> bool {
        self.in_progress.insert(path.to_string())
    }

    pub fn leave(&mut self, path: &str) {
        self.in_progress.remove(path);
    }

    pub fn is_empty(&self) -> bool {
        self.in_progress.is_empty()
    }
}

/// Artifacts keyed by `path@version`, shared across the whole run.
///
/// Hits hand out the same `Arc`, so a coordinate referenced from several
/// parents is one node in the output.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<String, Arc<Artifact>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Artifact>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: String, artifact: Arc<Artifact>) {
        self.entries.insert(key, artifact);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counters collected during one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Manifest fetch attempts.
    pub fetches: usize,
    pub cache_hits: usize,
    pub cycle_breaks: usize,
    /// Nodes turned into leaves because of a fetch, decode or parse failure.
    pub degraded: usize,
}

/// Mutable state threaded through every recursive call.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    pub cache: ResolutionCache,
    pub visited: VisitedSet,
    pub stats: ResolutionStats,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl VisitedSet {
        fn contains(&self, path: &str) -> bool {
            self.in_progress.contains(path)
        }
    }

    #[test]
    fn visited_is_stack_scoped() {
        let mut set = VisitedSet::new();
        assert!(set.enter("github.com/a/b"));
        assert!(!set.enter("github.com/a/b"));
        assert!(set.contains("github.com/a/b"));
        set.leave("github.com/a/b");
        assert!(!set.contains("github.com/a/b"));
        assert!(set.is_empty());
    }

    #[test]
    fn cache_shares_instances() {
        let mut cache = ResolutionCache::new();
        let leaf = Arc::new(Artifact::leaf("d", "v1"));
        cache.insert("d@v1".to_string(), leaf.clone());
        let hit = cache.get("d@v1").unwrap();
        assert!(Arc::ptr_eq(&leaf, &hit));
        assert!(cache.get("d@v2").is_none());
        assert_eq!(cache.len(), 1);
    }
}
