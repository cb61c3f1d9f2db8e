//! Encrypt-and-send with a fixed retry budget.

use std::sync::Arc;

use cmdtrack_crypto::CommandCipher;
use tracing::{debug, warn};

use super::http::HttpTransport;
use super::types::{HistoryTransport, WireCommand};
use crate::command::CommandRecord;
use crate::config::{ClientOptions, Config, RetryPolicy};
use crate::error::{Error, Result};

/// Delivers commands to the history server.
pub struct DeliveryClient {
    transport: Arc<dyn HistoryTransport>,
    cipher: CommandCipher,
    retry: RetryPolicy,
}

impl DeliveryClient {
    pub fn new(
        transport: Arc<dyn HistoryTransport>,
        cipher: CommandCipher,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            cipher,
            retry,
        }
    }

    /// HTTP client for the server in `options`, authenticated and keyed by `config`.
    pub fn from_config(config: &Config, options: &ClientOptions) -> Result<Self> {
        let transport = HttpTransport::new(options, config.shared_secret.as_str())?;
        Ok(Self::new(
            Arc::new(transport),
            CommandCipher::new(&config.encryption_key),
            options.retry,
        ))
    }

    /// Encrypt the command text and POST the record.
    ///
    /// Every transport error or non-2xx response is retried after a fixed
    /// delay until `max_attempts` is spent. The delay is an async sleep, so
    /// dropping the returned future cancels the remaining attempts.
    ///
    /// The record is sent as-is; callers validate it first.
    pub async fn send(&self, record: &CommandRecord) -> Result<()> {
        let wire = WireCommand::seal(record, &self.cipher)?;
        let max_attempts = self.retry.max_attempts.max(1);

        let mut last_error = String::new();
        for attempt in 1..=max_attempts {
            match self.transport.post_command(&wire).await {
                Ok(()) => {
                    debug!(attempt, "command delivered");
                    return Ok(());
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "command delivery failed");
                    last_error = e.to_string();
                }
            }
            if attempt < max_attempts {
                tokio::time::sleep(self.retry.delay).await;
            }
        }

        Err(Error::Delivery {
            attempts: max_attempts,
            last_error,
        })
    }
}
