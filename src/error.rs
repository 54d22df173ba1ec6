//! Error types for Flotilla
//!
//! Defines a comprehensive error enum covering all failure modes of manifest
//! resolution. Uses thiserror for ergonomic error handling.

use crate::manifest::MAX_INCLUDE_DEPTH;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Flotilla operations
pub type Result<T> = std::result::Result<T, FlotillaError>;

/// Comprehensive error type for Flotilla operations
#[derive(Error, Debug)]
pub enum FlotillaError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A manifest file that must exist is missing or unreadable
    #[error("cannot read manifest file '{path}': {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parsing errors (malformed manifest XML)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Include expansion went deeper than the allowed bound
    #[error(
        "exceeded maximum include depth ({}) while including '{}' from '{}'; \
         this might be due to circular includes",
        MAX_INCLUDE_DEPTH,
        .included.display(),
        .including.display()
    )]
    RecursionLimit {
        including: PathBuf,
        included: PathBuf,
    },

    /// A second, different notice was supplied
    #[error("duplicate notice in {src}")]
    DuplicateNotice { src: String },

    /// Two remotes share a name but not an attribute set
    #[error("duplicate remote '{name}' in {src}")]
    DuplicateRemote { name: String, src: String },

    /// A second, different default block was supplied
    #[error("duplicate default in {src}")]
    DuplicateDefault { src: String },

    /// A second, different manifest-server was supplied
    #[error("duplicate manifest-server in {src}")]
    DuplicateServer { src: String },

    /// Two projects resolved to the same checkout path
    #[error("duplicate path for project '{path}' in '{src}'")]
    DuplicatePath { path: String, src: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Anyhow errors (for more context)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}
