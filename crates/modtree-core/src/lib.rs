//! Core data types for modtree.
//!
//! This crate defines the types shared by every other modtree crate: the
//! resolved [`artifact::Artifact`] tree, module coordinates and the URL
//! normalization helpers around them, the `go.mod` manifest parser, and the
//! user configuration.
//!
//! This crate is intentionally free of network I/O.

/// Module used when no `--repo-url` is given.
pub const DEFAULT_REPO_URL: &str = "github.com/etcd-io/etcd";

/// Version used when no `--version` is given.
pub const DEFAULT_VERSION: &str = "v3.6.0-rc.0";

/// File name of the manifest fetched for every module.
pub const MANIFEST_FILE: &str = "go.mod";

pub mod artifact;
pub mod config;
pub mod coordinate;
pub mod modfile;
