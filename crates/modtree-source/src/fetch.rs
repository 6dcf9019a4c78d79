//! HTTP access behind the [`Fetcher`] seam.

use std::time::Duration;

use reqwest::blocking::Client;

use modtree_core::config::NetworkConfig;
use modtree_util::errors::{ModtreeError, ModtreeResult};

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Raw retrieval of URLs.
pub trait Fetcher {
    /// Metadata-only request. Returns the HTTP status code; transport
    /// failures are errors.
    fn head(&self, url: &str) -> ModtreeResult<u16>;

    /// Retrieve the body of `url`. Non-success statuses are errors.
    fn get(&self, url: &str) -> ModtreeResult<Vec<u8>>;
}

/// Blocking HTTP fetcher with a per-request timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client from the `[network]` config section.
    pub fn new(config: &NetworkConfig) -> ModtreeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ModtreeError::Transport {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn head(&self, url: &str) -> ModtreeResult<u16> {
        tracing::debug!("HEAD {url}");
        let resp = self
            .client
            .head(url)
            .send()
            .map_err(|e| ModtreeError::Transport {
                message: format!("HEAD {url} failed: {e}"),
            })?;
        Ok(resp.status().as_u16())
    }

    fn get(&self, url: &str) -> ModtreeResult<Vec<u8>> {
        let mut last_err = String::new();

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                std::thread::sleep(RETRY_DELAY * attempt);
            }
            tracing::debug!("GET {url} (attempt {})", attempt + 1);

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_server_error() {
                        last_err = format!("HTTP {status} from {url}");
                        continue;
                    }
                    if !status.is_success() {
                        return Err(ModtreeError::Transport {
                            message: format!("HTTP {status} fetching {url}"),
                        });
                    }
                    let bytes = resp.bytes().map_err(|e| ModtreeError::Transport {
                        message: format!("Failed to read response from {url}: {e}"),
                    })?;
                    return Ok(bytes.to_vec());
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_err = format!("{e}");
                    continue;
                }
                Err(e) => {
                    return Err(ModtreeError::Transport {
                        message: format!("Request to {url} failed: {e}"),
                    });
                }
            }
        }

        Err(ModtreeError::Transport {
            message: format!("Failed after {MAX_RETRIES} retries for {url}: {last_err}"),
        })
    }
}
