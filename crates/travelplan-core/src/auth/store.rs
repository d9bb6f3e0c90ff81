use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use keyring::Entry;
use serde_json::Value;
use tracing::warn;

/// Key the session token is stored under
pub const TOKEN_KEY: &str = "token";

/// Keychain service name
const SERVICE_NAME: &str = "travelplan";

/// Storage file name in cache directory
const STORAGE_FILE: &str = "storage.json";

/// Persisted session token.
///
/// `get` and `remove` never fail from the caller's point of view: they run
/// inside request/response hooks, so backend errors are logged and a token
/// that cannot be read is treated as absent.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<()>;

    fn remove(&self);
}

/// Token held in process memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) {
        *self.slot() = None;
    }
}

/// JSON key-value file, one entry per key. Keys other than `token` are left
/// untouched.
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    /// Store in `storage.json` under the given directory
    pub fn new(dir: &Path) -> Self {
        Self::at(dir.join(STORAGE_FILE))
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read storage file")?;
        serde_json::from_str(&contents).context("Failed to parse storage file")
    }

    fn write_map(&self, map: &BTreeMap<String, Value>) -> Result<()> {
        if map.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).context("Failed to remove storage file")?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, contents).context("Failed to write storage file")?;
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let _guard = self.guard();
        match self.read_map() {
            Ok(map) => map.get(TOKEN_KEY).and_then(|v| v.as_str()).map(str::to_string),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read session token");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        let _guard = self.guard();
        let mut map = self.read_map().unwrap_or_default();
        map.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_map(&map)
    }

    fn remove(&self) {
        let _guard = self.guard();
        let result = self.read_map().and_then(|mut map| {
            if map.remove(TOKEN_KEY).is_some() {
                self.write_map(&map)
            } else {
                Ok(())
            }
        });
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Could not remove session token");
        }
    }
}

/// Token kept in the OS keychain.
pub struct KeyringTokenStore {
    service: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, TOKEN_KEY).context("Failed to create keyring entry")
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Option<String> {
        let entry = match self.entry() {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Could not open keychain entry");
                return None;
            }
        };
        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "Could not read session token from keychain");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .context("Failed to store session token in keychain")
    }

    fn remove(&self) {
        let result = self.entry().and_then(|entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to delete session token from keychain")),
        });
        if let Err(e) = result {
            warn!(error = %e, "Could not remove session token");
        }
    }
}
