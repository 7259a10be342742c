//! Admin authentication gate.
//!
//! A successful login issues a random per-session token. Only the token's
//! SHA-256 digest is persisted, so the token store never holds a value that
//! can be replayed on its own. A new login replaces the previous session.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable overriding the configured admin username.
pub const USERNAME_ENV: &str = "VILLA_ADMIN_USERNAME";
/// Environment variable overriding the configured admin password.
pub const PASSWORD_ENV: &str = "VILLA_ADMIN_PASSWORD";

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No admin credentials are configured
    #[error("admin credentials are not configured")]
    NotConfigured,
    /// Username or password mismatch
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The token store failed
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// The shared admin username/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminCredentials {
    /// Creates a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Resolves credentials from the process environment, falling back to
    /// the configured values. Blank values count as unset.
    #[must_use]
    pub fn resolve(config_username: Option<&str>, config_password: Option<&str>) -> Option<Self> {
        Self::resolve_with(config_username, config_password, |key| std::env::var(key).ok())
    }

    /// Like [`resolve`](Self::resolve) with an injectable environment lookup.
    pub fn resolve_with(
        config_username: Option<&str>,
        config_password: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<Self> {
        let pick = |key: &str, fallback: Option<&str>| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| fallback.filter(|v| !v.trim().is_empty()).map(str::to_string))
        };

        Some(Self::new(
            pick(USERNAME_ENV, config_username)?,
            pick(PASSWORD_ENV, config_password)?,
        ))
    }

    /// Compares both fields without short-circuiting on the first mismatch.
    fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = digest(&self.username) == digest(username);
        let pass_ok = digest(&self.password) == digest(password);
        user_ok & pass_ok
    }
}

/// Persistent storage for the active session digest.
pub trait TokenStore: Send + Sync {
    /// Returns the stored digest, if any.
    fn load(&self) -> anyhow::Result<Option<String>>;

    /// Replaces the stored digest.
    fn store(&self, digest: &str) -> anyhow::Result<()>;

    /// Forgets the stored digest.
    fn clear(&self) -> anyhow::Result<()>;
}

/// Token store backed by a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Uses `path` as the session file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let digest = content.trim();
        Ok((!digest.is_empty()).then(|| digest.to_string()))
    }

    fn store(&self, digest: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&self.path, digest)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }

    fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            }),
        }
    }
}

/// Token store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    digest: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        let digest = self
            .digest
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        Ok(digest.clone())
    }

    fn store(&self, digest: &str) -> anyhow::Result<()> {
        *self
            .digest
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))? = Some(digest.to_string());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self
            .digest
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))? = None;
        Ok(())
    }
}

/// Checks admin credentials and tracks the active session.
#[derive(Clone)]
pub struct AuthGate {
    credentials: Option<AdminCredentials>,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("configured", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    /// Creates a gate. With `credentials == None` every login fails.
    pub fn new(credentials: Option<AdminCredentials>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            credentials,
            tokens,
        }
    }

    /// True when admin credentials are available.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Verifies credentials and starts a new session, returning its token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let credentials = self.credentials.as_ref().ok_or(AuthError::NotConfigured)?;

        if !credentials.matches(username, password) {
            warn!(username, "rejected admin login");
            return Err(AuthError::InvalidCredentials);
        }

        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens.store(&digest(&token))?;
        info!(username, "admin logged in");
        Ok(token)
    }

    /// True if `token` belongs to the active session.
    #[must_use]
    pub fn is_authenticated(&self, token: &str) -> bool {
        if token.is_empty() || self.credentials.is_none() {
            return false;
        }

        match self.tokens.load() {
            Ok(Some(stored)) => stored == digest(token),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "could not read session store");
                false
            }
        }
    }

    /// Ends the active session.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.tokens.clear()?;
        info!("admin logged out");
        Ok(())
    }
}

fn digest(value: &str) -> String {
    format!("{:x}", Sha256::digest(value.as_bytes()))
}
