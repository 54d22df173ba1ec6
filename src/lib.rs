//! Flotilla - Multi-Repository Workspace Tool
//!
//! Flotilla manages a workspace of many source repositories described by a
//! single hierarchical XML manifest, in the style of Google's git-repo tool.
//! This crate is the manifest-resolution engine: it turns a root manifest
//! document, its recursive includes, and any local override documents into
//! one merged, consistent configuration for the rest of the tool to consume.
//!
//! # Architecture
//!
//! - **manifest**: document model, XML parsing, include expansion, project
//!   tree flattening, and the multi-document merge
//! - **config**: key/value configuration lookup (default manifest name)
//! - **error**: crate-wide error enum and `Result` alias
//! - **logging**: tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;

// Re-exports
pub use error::{FlotillaError, Result};
