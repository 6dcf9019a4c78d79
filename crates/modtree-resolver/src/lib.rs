//! Dependency resolution engine: depth-first traversal of go.mod manifests
//! with cycle detection, a run-wide resolution cache, and replacement
//! directive handling.

pub mod cache;
pub mod resolver;
pub mod tree;
