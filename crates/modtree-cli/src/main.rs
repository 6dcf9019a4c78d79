//! modtree CLI binary.
//!
//! Initializes logging via `tracing`, parses arguments with `clap`, and runs
//! the resolve operation.

mod cli;

use miette::Result;
use tracing_subscriber::EnvFilter;

use modtree_ops::ops_resolve::{self, ResolveOptions};

fn main() -> Result<()> {
    let args = cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if args.repo_url.is_empty() {
        println!("Please provide a repository URL");
        return Ok(());
    }
    if args.version.is_empty() {
        println!("Please provide a version");
        return Ok(());
    }

    let opts = ResolveOptions {
        repo_url: args.repo_url,
        version: args.version,
        output: args.output,
        config: args.config,
        print: args.print,
        depth: args.depth,
    };
    ops_resolve::resolve(&opts)?;
    Ok(())
}
