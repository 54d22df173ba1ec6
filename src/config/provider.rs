//! Key/value configuration providers

use std::collections::HashMap;
use std::path::PathBuf;

/// Read-only key/value configuration lookup
pub trait ConfigProvider {
    /// Get a configured value, `None` when the key is unset
    fn get(&self, key: &str) -> Option<String>;
}

/// Configuration read from a git checkout's `.git/config`
///
/// The manifests directory of a workspace is itself a git checkout; settings
/// such as the default manifest name live in its repository config. A
/// missing or unreadable config yields `None` for every key — the store is
/// only ever consulted for optional values.
pub struct GitConfigProvider {
    dir: PathBuf,
}

impl GitConfigProvider {
    /// Provider reading `<dir>/.git/config`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ConfigProvider for GitConfigProvider {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.dir.join(".git").join("config");
        if !path.is_file() {
            return None;
        }
        let config = match git2::Config::open(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("cannot open git config {}: {}", path.display(), e);
                return None;
            }
        };
        config.get_string(key).ok()
    }
}

/// In-memory configuration, for tests and embedders
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
