use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use modtree_util::errors::ModtreeError;

/// User configuration loaded from `~/.modtree/config.toml` or `--config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModtreeConfig {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP settings from `[network]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-request timeout applied to every HEAD and GET.
    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent", rename = "user-agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("modtree/{}", env!("CARGO_PKG_VERSION"))
}

/// Source provider settings from `[sources]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Branch probed when the tag-based manifest URL is unreachable.
    #[serde(default = "default_branch", rename = "default-branch")]
    pub default_branch: String,
    #[serde(default = "default_github_raw_host", rename = "github-raw-host")]
    pub github_raw_host: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            default_branch: default_branch(),
            github_raw_host: default_github_raw_host(),
        }
    }
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_github_raw_host() -> String {
    "raw.githubusercontent.com".to_string()
}

/// Module index settings from `[index]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub url: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
        }
    }
}

fn default_index_url() -> String {
    "https://proxy.golang.org".to_string()
}

/// Output locations from `[output]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the JSON tree is written.
    #[serde(default = "default_output_path")]
    pub path: String,
    /// Root of the on-disk manifest store.
    #[serde(default = "default_work_dir", rename = "work-dir")]
    pub work_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            work_dir: default_work_dir(),
        }
    }
}

fn default_output_path() -> String {
    "dependencies.json".to_string()
}

fn default_work_dir() -> String {
    "~/.modtree/manifests".to_string()
}

impl ModtreeConfig {
    /// Load configuration from `path`, or from the default location when `path`
    /// is `None`. A missing default file yields defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> miette::Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };
        if !path.is_file() {
            if explicit {
                return Err(ModtreeError::Config {
                    message: format!("Config file not found: {}", path.display()),
                }
                .into());
            }
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ModtreeError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::parse_toml(&content).map_err(Into::into)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self, ModtreeError> {
        toml::from_str(content).map_err(|e| ModtreeError::Config {
            message: format!("Failed to parse config: {e}"),
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// The manifest store root with `~` expanded.
    pub fn work_dir(&self) -> PathBuf {
        modtree_util::fs::expand_home(&self.output.work_dir)
    }
}

/// Returns the path to the modtree data directory (`~/.modtree/`).
pub fn dirs_path() -> PathBuf {
    modtree_util::fs::home_dir().join(".modtree")
}
