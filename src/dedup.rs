//! Single-slot, file-backed guard against sending the same command twice in a row.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::command::Fingerprint;
use crate::config::{home_file, LAST_COMMAND_FILE_NAME};
use crate::error::{Error, Result};

/// Remembers the fingerprint of the last accepted command.
///
/// The file holds the raw 16 digest bytes. Writers are not locked against
/// each other; concurrent shells race and the last writer wins.
#[derive(Debug, Clone)]
pub struct DedupGuard {
    path: PathBuf,
}

impl DedupGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Guard backed by `~/.cmdtrack.last`.
    pub fn in_home_dir() -> Result<Self> {
        Ok(Self::new(home_file(LAST_COMMAND_FILE_NAME)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored fingerprint. A missing, unreadable or malformed file
    /// counts as no prior command.
    pub fn last(&self) -> Option<Fingerprint> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Fingerprint::from_bytes(&bytes),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no previous fingerprint");
                None
            }
        }
    }

    /// Returns `true` if `fingerprint` matches the stored one (skip the
    /// command). Otherwise stores it and returns `false`.
    pub fn check_and_update(&self, fingerprint: &Fingerprint) -> Result<bool> {
        if self.last().as_ref() == Some(fingerprint) {
            return Ok(true);
        }
        self.store(fingerprint)?;
        Ok(false)
    }

    fn store(&self, fingerprint: &Fingerprint) -> Result<()> {
        let storage_err = |source: std::io::Error| Error::LocalStorage {
            path: self.path.clone(),
            source,
        };

        let mut file = open_owner_only(&self.path).map_err(storage_err)?;
        file.write_all(fingerprint.as_bytes()).map_err(storage_err)?;
        file.sync_all().map_err(storage_err)
    }
}

#[cfg(unix)]
fn open_owner_only(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation; tighten a pre-existing file too.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_owner_only(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
