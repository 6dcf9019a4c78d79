//! Maps a coordinate to the provider for its host.

use crate::github::GitHubSource;
use crate::googlesource::GoogleSource;
use crate::source::{ModuleSource, SourceContext, SourceKind};

pub struct SourceDetector<'a> {
    ctx: SourceContext<'a>,
}

impl<'a> SourceDetector<'a> {
    pub fn new(ctx: SourceContext<'a>) -> Self {
        Self { ctx }
    }

    /// Provider for `coordinate`, or `None` when no supported host matches.
    pub fn detect(&self, coordinate: &str, version: &str) -> Option<Box<dyn ModuleSource + 'a>> {
        let source: Box<dyn ModuleSource + 'a> = match SourceKind::detect(coordinate)? {
            SourceKind::GitHub => Box::new(GitHubSource::new(self.ctx, coordinate, version)),
            SourceKind::GoogleSource => Box::new(GoogleSource::new(self.ctx, coordinate, version)),
        };
        Some(source)
    }

    /// Whether `path` names a repository a provider can fetch directly,
    /// without a module index lookup.
    pub fn is_direct(&self, path: &str) -> bool {
        SourceKind::detect(path).is_some()
    }
}
