//! Transport trait and wire types for talking to the history server.

use async_trait::async_trait;
use cmdtrack_crypto::{CommandCipher, CryptoError};
use serde::{Deserialize, Serialize};

use crate::command::CommandRecord;

// ============================================================================
// HistoryTransport — network layer
// ============================================================================

/// Network access to the remote history store.
///
/// `HttpTransport` is the production implementation; tests substitute
/// in-process fakes.
#[async_trait]
pub trait HistoryTransport: Send + Sync {
    /// Store one command. Any error is eligible for retry by the caller.
    async fn post_command(&self, command: &WireCommand) -> Result<(), TransportError>;

    /// List stored commands in server order (newest first).
    async fn list_history(&self) -> Result<Vec<WireCommand>, TransportError>;
}

/// Classification of transport failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection, TLS or timeout failure.
    Network,
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The response body could not be decoded.
    Decode,
}

/// Transport-level error.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
    pub kind: TransportErrorKind,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: TransportErrorKind::Network,
        }
    }

    pub fn with_kind(message: impl Into<String>, kind: TransportErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn status(code: u16) -> Self {
        Self::with_kind(
            format!("server returned status {}", code),
            TransportErrorKind::Status(code),
        )
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

// ============================================================================
// WireCommand — what crosses the network
// ============================================================================

/// A command as sent to and returned by the server.
///
/// Only `command` is encrypted (base64 envelope). Hostname, working
/// directory and timestamp travel in clear text, protected only by the
/// shared-secret header.
///
/// Serialized as a form body on POST and as a JSON object in history
/// listings; both use the same PascalCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireCommand {
    pub command: String,
    pub hostname: String,
    pub working_dir: String,
    pub timestamp: i64,
}

impl WireCommand {
    /// Encrypt the command text of `record` for transport.
    pub fn seal(record: &CommandRecord, cipher: &CommandCipher) -> Result<Self, CryptoError> {
        Ok(Self {
            command: cipher.encrypt_base64(&record.command)?,
            hostname: record.hostname.clone(),
            working_dir: record.working_dir.clone(),
            timestamp: record.timestamp,
        })
    }

    /// Decrypt the command text back into a plaintext record.
    pub fn open(self, cipher: &CommandCipher) -> Result<CommandRecord, CryptoError> {
        Ok(CommandRecord {
            command: cipher.decrypt_base64(&self.command)?,
            hostname: self.hostname,
            working_dir: self.working_dir,
            timestamp: self.timestamp,
        })
    }
}
