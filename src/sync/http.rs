//! reqwest-backed [`HistoryTransport`].

use async_trait::async_trait;
use tracing::debug;

use super::types::{HistoryTransport, TransportError, TransportErrorKind, WireCommand};
use crate::config::ClientOptions;

/// Header carrying the shared secret on every request.
pub const SECRET_HEADER: &str = "Secret";

const COMMAND_PATH: &str = "command";
const HISTORY_PATH: &str = "history";

/// HTTP transport for the `POST /command` and `GET /history` endpoints.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    secret: String,
}

impl HttpTransport {
    pub fn new(
        options: &ClientOptions,
        shared_secret: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| TransportError::new(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: normalize_base_url(&options.base_url),
            secret: shared_secret.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Ensure the base URL ends in exactly one `/` so paths can be appended.
fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

fn network_error(err: reqwest::Error) -> TransportError {
    TransportError::new(err.to_string())
}

#[async_trait]
impl HistoryTransport for HttpTransport {
    async fn post_command(&self, command: &WireCommand) -> Result<(), TransportError> {
        let url = self.endpoint(COMMAND_PATH);
        debug!(%url, "posting command");

        let response = self
            .client
            .post(&url)
            .header(SECRET_HEADER, &self.secret)
            .form(command)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::status(status.as_u16()));
        }
        Ok(())
    }

    async fn list_history(&self) -> Result<Vec<WireCommand>, TransportError> {
        let url = self.endpoint(HISTORY_PATH);
        debug!(%url, "requesting history");

        let response = self
            .client
            .get(&url)
            .header(SECRET_HEADER, &self.secret)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::status(status.as_u16()));
        }

        let commands = response
            .json::<Option<Vec<WireCommand>>>()
            .await
            .map_err(|e| TransportError::with_kind(e.to_string(), TransportErrorKind::Decode))?
            .unwrap_or_default();
        debug!(count = commands.len(), "history received");
        Ok(commands)
    }
}
