//! Client configuration: shared secret, encryption passphrase, and
//! connection/retry options.
//!
//! The secrets file is JSON (`~/.cmdtrack.conf` by default) and must be
//! readable by its owner only.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Server used when no `--url` is given.
pub const DEFAULT_SERVER_URL: &str = "https://cmdtrack-1127.appspot.com/";

/// File name of the secrets file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".cmdtrack.conf";

/// File name of the last-command fingerprint inside the home directory.
pub const LAST_COMMAND_FILE_NAME: &str = ".cmdtrack.last";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_ATTEMPTS: u32 = 10;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("{} must exist: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mode of {} must be 600, found {mode:o}", path.display())]
    Permissions { path: PathBuf, mode: u32 },

    #[error("Parsing {} failed: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Secrets shared by every machine writing to the same history.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Sent in the `Secret` header on every request.
    #[serde(rename = "shared-secret")]
    pub shared_secret: String,
    /// Passphrase the command encryption key is derived from.
    #[serde(rename = "encryption-key")]
    pub encryption_key: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("shared_secret", &"<redacted>")
            .field("encryption_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn new(shared_secret: impl Into<String>, encryption_key: impl Into<String>) -> Self {
        Self {
            shared_secret: shared_secret.into(),
            encryption_key: encryption_key.into(),
        }
    }

    /// `~/.cmdtrack.conf`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        home_file(CONFIG_FILE_NAME)
    }

    /// Load and validate the secrets file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        check_owner_only(path)?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `~/<name>`
pub fn home_file(name: &str) -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(name))
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(unix)]
fn check_owner_only(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode() & 0o777;
    if mode != 0o600 {
        return Err(ConfigError::Permissions {
            path: path.to_path_buf(),
            mode,
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_owner_only(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

/// Fixed-delay retry schedule for command delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause between consecutive attempts. No backoff, no jitter.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Where and how to reach the history server.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Per-request deadline enforced by the HTTP client.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientOptions {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
