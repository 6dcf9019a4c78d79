use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all modtree operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ModtreeError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A network request or process failed before a response was read.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The reachability probe itself failed (as opposed to reporting "unreachable").
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Manifest bytes are not a well-formed go.mod file.
    #[error("Parse error: {message}")]
    #[diagnostic(help("Check the go.mod file for syntax errors"))]
    Parse { message: String },

    /// Content-transfer decoding failed.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The module index query failed or returned incomplete data.
    #[error("Lookup error: {message}")]
    Lookup { message: String },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.modtree/config.toml or the file passed to --config"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl ModtreeError {
    /// Short lowercase label for the error category, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ModtreeError::Io(_) => "io",
            ModtreeError::Transport { .. } => "transport",
            ModtreeError::Validation { .. } => "validation",
            ModtreeError::Parse { .. } => "parse",
            ModtreeError::Decode { .. } => "decode",
            ModtreeError::Lookup { .. } => "lookup",
            ModtreeError::Config { .. } => "config",
            ModtreeError::Generic { .. } => "generic",
        }
    }
}

/// Result alias for the typed layers (sources, parser, engine).
pub type ModtreeResult<T> = Result<T, ModtreeError>;
