//! In-memory [`Fetcher`] serving canned responses. Test support only, built
//! under `cfg(test)` or the `test-util` feature.

use std::collections::HashMap;
use std::sync::Mutex;

use modtree_util::errors::{ModtreeError, ModtreeResult};

use crate::fetch::Fetcher;

#[derive(Debug, Clone)]
enum Response {
    Body { status: u16, body: Vec<u8> },
    Unreachable,
}

/// Serves registered URLs from memory and counts requests per URL.
///
/// Unregistered URLs answer `404`.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Response>,
    gets: Mutex<HashMap<String, usize>>,
    heads: Mutex<HashMap<String, usize>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200.
    pub fn with(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.with_status(url, 200, body)
    }

    /// Serve `body` with an explicit status.
    pub fn with_status(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(
            url.to_string(),
            Response::Body {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Fail every request to `url` with a transport error.
    pub fn unreachable(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Response::Unreachable);
        self
    }

    /// Number of GET requests issued for `url`.
    pub fn get_count(&self, url: &str) -> usize {
        self.gets
            .lock()
            .map(|g| g.get(url).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of HEAD requests issued for `url`.
    pub fn head_count(&self, url: &str) -> usize {
        self.heads
            .lock()
            .map(|h| h.get(url).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total GET requests across all URLs.
    pub fn total_gets(&self) -> usize {
        self.gets.lock().map(|g| g.values().sum()).unwrap_or(0)
    }

    fn record(counter: &Mutex<HashMap<String, usize>>, url: &str) {
        if let Ok(mut map) = counter.lock() {
            *map.entry(url.to_string()).or_insert(0) += 1;
        }
    }
}

impl Fetcher for MemoryFetcher {
    fn head(&self, url: &str) -> ModtreeResult<u16> {
        Self::record(&self.heads, url);
        match self.responses.get(url) {
            Some(Response::Body { status, .. }) => Ok(*status),
            Some(Response::Unreachable) => Err(ModtreeError::Transport {
                message: format!("HEAD {url} failed: connection refused"),
            }),
            None => Ok(404),
        }
    }

    fn get(&self, url: &str) -> ModtreeResult<Vec<u8>> {
        Self::record(&self.gets, url);
        match self.responses.get(url) {
            Some(Response::Body { status, body }) if (200..300).contains(status) => Ok(body.clone()),
            Some(Response::Body { status, .. }) => Err(ModtreeError::Transport {
                message: format!("HTTP {status} fetching {url}"),
            }),
            Some(Response::Unreachable) => Err(ModtreeError::Transport {
                message: format!("Request to {url} failed: connection refused"),
            }),
            None => Err(ModtreeError::Transport {
                message: format!("HTTP 404 fetching {url}"),
            }),
        }
    }
}
