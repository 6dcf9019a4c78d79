//! CLI argument definitions for modtree.

use std::path::PathBuf;

use clap::Parser;
use modtree_core::{DEFAULT_REPO_URL, DEFAULT_VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "modtree",
    about = "Resolve the full dependency tree of a Go module repository",
    long_about = "modtree fetches go.mod manifests from GitHub and Gitiles hosts, follows \
                  requirements and replacements recursively, and writes the resulting tree \
                  as JSON.",
    disable_version_flag = true
)]
pub struct Cli {
    /// Repository to resolve, e.g. github.com/etcd-io/etcd
    #[arg(long, default_value = DEFAULT_REPO_URL)]
    pub repo_url: String,

    /// Version tag of the root repository
    #[arg(long, default_value = DEFAULT_VERSION)]
    pub version: String,

    /// Where to write the JSON tree [default: dependencies.json]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file [default: ~/.modtree/config.toml]
    #[arg(long, env = "MODTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also print the tree to stdout
    #[arg(long)]
    pub print: bool,

    /// Depth limit for --print
    #[arg(long, requires = "print")]
    pub depth: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
