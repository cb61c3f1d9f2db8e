//! Client side of the history server protocol.
//!
//! - `POST <base>/command`: form body, `Secret` header, 2xx means stored.
//! - `GET <base>/history`: `Secret` header, JSON array of commands, newest first.

pub mod delivery;
pub mod history;
pub mod http;
pub mod types;

pub use delivery::DeliveryClient;
pub use history::{format_history, HistoryFetcher};
pub use http::{HttpTransport, SECRET_HEADER};
pub use types::{HistoryTransport, TransportError, TransportErrorKind, WireCommand};
