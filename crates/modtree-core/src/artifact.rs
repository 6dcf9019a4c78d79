use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A node in the resolved dependency tree.
///
/// Children are reference-counted: a coordinate resolved once is attached
/// under every parent that requires it, so the same node can be reachable
/// through several edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<Arc<Artifact>>,
}

impl Artifact {
    /// A childless node.
    pub fn leaf(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Direct child with the given name, if any.
    pub fn dependency(&self, name: &str) -> Option<&Arc<Artifact>> {
        self.dependencies.iter().find(|d| d.name == name)
    }

    /// Number of distinct `name@version` pairs reachable from this node,
    /// including the node itself.
    pub fn distinct_count(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        self.collect_keys(&mut seen);
        seen.len()
    }

    fn collect_keys(&self, seen: &mut std::collections::HashSet<String>) {
        if !seen.insert(format!("{}@{}", self.name, self.version)) {
            return;
        }
        for dep in &self.dependencies {
            dep.collect_keys(seen);
        }
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.version)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_serializes_empty_dependencies() {
        let leaf = Artifact::leaf("example.com/leaf", "v0.9.0");
        let json = serde_json::to_value(&leaf).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "example.com/leaf",
                "version": "v0.9.0",
                "dependencies": []
            })
        );
    }

    #[test]
    fn distinct_count_ignores_shared_nodes() {
        let d = Arc::new(Artifact::leaf("d", "v1"));
        let b = Arc::new(Artifact {
            name: "b".into(),
            version: "v1".into(),
            dependencies: vec![d.clone()],
        });
        let c = Arc::new(Artifact {
            name: "c".into(),
            version: "v1".into(),
            dependencies: vec![d],
        });
        let a = Artifact {
            name: "a".into(),
            version: "v1".into(),
            dependencies: vec![b, c],
        };
        assert_eq!(a.distinct_count(), 4);
    }

    #[test]
    fn display_omits_empty_version() {
        assert_eq!(Artifact::leaf("x", "").to_string(), "x");
        assert_eq!(Artifact::leaf("x", "v1").to_string(), "x v1");
    }
}
