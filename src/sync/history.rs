//! Fetch and decrypt the shared history.

use std::sync::Arc;

use cmdtrack_crypto::CommandCipher;
use tracing::debug;

use super::http::HttpTransport;
use super::types::HistoryTransport;
use crate::command::CommandRecord;
use crate::config::{ClientOptions, Config};
use crate::error::Result;

pub struct HistoryFetcher {
    transport: Arc<dyn HistoryTransport>,
    cipher: CommandCipher,
}

impl HistoryFetcher {
    pub fn new(transport: Arc<dyn HistoryTransport>, cipher: CommandCipher) -> Self {
        Self { transport, cipher }
    }

    pub fn from_config(config: &Config, options: &ClientOptions) -> Result<Self> {
        let transport = HttpTransport::new(options, config.shared_secret.as_str())?;
        Ok(Self::new(
            Arc::new(transport),
            CommandCipher::new(&config.encryption_key),
        ))
    }

    /// Fetch every stored command and decrypt it, keeping server order.
    ///
    /// No retries. The first record that fails to decode or decrypt aborts
    /// the fetch and nothing is returned.
    pub async fn fetch(&self) -> Result<Vec<CommandRecord>> {
        let wire = self.transport.list_history().await?;
        debug!(count = wire.len(), "decrypting history");

        let records = wire
            .into_iter()
            .map(|command| command.open(&self.cipher))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

/// Render history the way the shell's `history` builtin does: oldest first,
/// numbered from 1, `"%8d  %s"`.
///
/// `records` is in server order (newest first).
pub fn format_history(records: &[CommandRecord]) -> impl Iterator<Item = String> + '_ {
    records
        .iter()
        .rev()
        .enumerate()
        .map(|(index, record)| format!("{:8}  {}", index + 1, record.command))
}
