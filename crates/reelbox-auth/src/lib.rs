use reelbox_core::error::ReelboxError;

/// Keychain entry holding the OMDb API key.
pub const OMDB_CREDENTIAL_KEY: &str = "reelbox:omdb";

/// Trait for credential storage backends.
pub trait CredentialStore: Send + Sync {
    /// Store a secret under the given key.
    fn store(&self, key: &str, secret: &str) -> Result<(), ReelboxError>;

    /// Retrieve a secret by key.
    fn get(&self, key: &str) -> Result<Option<String>, ReelboxError>;

    /// Delete a stored secret.
    fn delete(&self, key: &str) -> Result<(), ReelboxError>;
}

/// Pick the API key to use: an explicit value wins, otherwise the stored one.
pub fn resolve_api_key(
    store: &dyn CredentialStore,
    explicit: Option<&str>,
) -> Result<String, ReelboxError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    match store.get(OMDB_CREDENTIAL_KEY)? {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ReelboxError::CredentialError {
            message: "no OMDb API key stored; run `reelbox config set-key`".into(),
        }),
    }
}

/// OS keychain-backed credential store using the `keyring` crate.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: "reelbox".to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, ReelboxError> {
        keyring::Entry::new(&self.service, key).map_err(|e| ReelboxError::CredentialError {
            message: e.to_string(),
        })
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn store(&self, key: &str, secret: &str) -> Result<(), ReelboxError> {
        self.entry(key)?
            .set_password(secret)
            .map_err(|e| ReelboxError::CredentialError {
                message: e.to_string(),
            })?;
        tracing::debug!(key, "stored credential");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, ReelboxError> {
        match self.entry(key)?.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ReelboxError::CredentialError {
                message: e.to_string(),
            }),
        }
    }

    fn delete(&self, key: &str) -> Result<(), ReelboxError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ReelboxError::CredentialError {
                message: e.to_string(),
            }),
        }
    }
}

/// In-memory credential store for testing.
pub struct MemoryStore {
    store: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            store: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, std::collections::HashMap<String, String>>, ReelboxError>
    {
        self.store.lock().map_err(|_| ReelboxError::CredentialError {
            message: "credential store lock poisoned".into(),
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryStore {
    fn store(&self, key: &str, secret: &str) -> Result<(), ReelboxError> {
        self.lock()?.insert(key.to_string(), secret.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, ReelboxError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), ReelboxError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
