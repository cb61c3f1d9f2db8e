//! cmdtrack: shared, encrypted shell history.
//!
//! A captured command is normalized, checked against the previous command,
//! and sent to a history server with its text encrypted under a passphrase
//! every machine shares. Fetching reverses the process.

pub mod backfill;
pub mod command;
pub mod config;
pub mod dedup;
pub mod error;
pub mod sync;
pub mod track;

pub use cmdtrack_crypto as crypto;

pub use backfill::{backfill, parse_history_line, HistoryLine};
pub use command::{CommandRecord, Fingerprint};
pub use config::{ClientOptions, Config, ConfigError, RetryPolicy};
pub use dedup::DedupGuard;
pub use error::{Error, Result};
pub use sync::{
    format_history, DeliveryClient, HistoryFetcher, HistoryTransport, HttpTransport, WireCommand,
};
pub use track::{TrackOutcome, Tracker};
