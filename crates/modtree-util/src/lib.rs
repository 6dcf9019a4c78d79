//! Shared utilities for modtree.
//!
//! This crate provides cross-cutting concerns used by all other modtree crates:
//! the unified error type, filesystem helpers, and terminal status output.

pub mod errors;
pub mod fs;
pub mod progress;
