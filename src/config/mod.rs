//! Workspace configuration lookup
//!
//! The resolver only needs one thing from configuration: the name of the
//! default manifest file under the manifests checkout. That lookup goes
//! through the [`ConfigProvider`] trait so the backing store is swappable —
//! git config on disk in production, an in-memory map in tests.

mod provider;

pub use provider::{ConfigProvider, GitConfigProvider, MemoryConfigProvider};
