//! A captured shell command and its dedup fingerprint.

use md5::{Digest, Md5};

use crate::error::{Error, Result};

/// Length of a [`Fingerprint`] in bytes.
pub const FINGERPRINT_LENGTH: usize = 16;

/// One executed command. `command` is plaintext while in memory; it is only
/// encrypted when converted to its wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRecord {
    pub command: String,
    pub hostname: String,
    pub working_dir: String,
    /// Seconds since the Unix epoch. Zero means "now" until normalized.
    pub timestamp: i64,
}

impl CommandRecord {
    pub fn new(command: impl Into<String>, working_dir: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_dir: working_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Trim all text fields, then fill an empty hostname from the local
    /// machine and a zero timestamp with the current time. Idempotent.
    pub fn normalize(&mut self) {
        self.normalize_with(local_hostname, || chrono::Utc::now().timestamp());
    }

    fn normalize_with(
        &mut self,
        hostname: impl FnOnce() -> Option<String>,
        now: impl FnOnce() -> i64,
    ) {
        trim_in_place(&mut self.command);
        trim_in_place(&mut self.hostname);
        trim_in_place(&mut self.working_dir);

        if self.hostname.is_empty() {
            if let Some(host) = hostname() {
                self.hostname = host.trim().to_string();
            }
        }
        if self.timestamp == 0 {
            self.timestamp = now();
        }
    }

    /// Normalize, then report whether command, hostname and working
    /// directory are all non-empty.
    pub fn is_valid(&mut self) -> bool {
        self.normalize();
        self.missing_fields().is_empty()
    }

    /// Like [`is_valid`](Self::is_valid) but names the empty fields.
    pub fn validate(&mut self) -> Result<()> {
        self.normalize();
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(missing.join(", ")))
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.command.is_empty() {
            missing.push("Command");
        }
        if self.hostname.is_empty() {
            missing.push("Hostname");
        }
        if self.working_dir.is_empty() {
            missing.push("WorkingDir");
        }
        missing
    }

    /// MD5 over (command, hostname, working_dir). Each field is
    /// length-prefixed so that moving text between fields changes the digest.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Md5::new();
        for field in [&self.command, &self.hostname, &self.working_dir] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        Fingerprint(hasher.finalize().into())
    }
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

fn local_hostname() -> Option<String> {
    hostname::get().ok()?.into_string().ok()
}

/// Digest used to spot a command repeated back to back. Not a security primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LENGTH]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LENGTH] {
        &self.0
    }

    /// Returns `None` unless `bytes` is exactly [`FINGERPRINT_LENGTH`] long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Fingerprint)
    }
}

impl From<[u8; FINGERPRINT_LENGTH]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_LENGTH]) -> Self {
        Fingerprint(bytes)
    }
}
