//! Module source providers.
//!
//! A [`source::ModuleSource`] turns a repository coordinate and version into
//! manifest bytes for one hosting kind. The [`detector::SourceDetector`] picks
//! the provider for a coordinate, [`index`] resolves vanity module paths to a
//! concrete repository through the module proxy, and every HTTP call goes
//! through the [`fetch::Fetcher`] seam so the whole layer can run offline
//! against [`memory::MemoryFetcher`].

pub mod detector;
pub mod fetch;
pub mod github;
pub mod googlesource;
pub mod index;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod source;
pub mod store;
