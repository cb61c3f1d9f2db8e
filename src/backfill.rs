//! Import existing shell history.
//!
//! Reads the output of `fc -t %s -l <first> <last>`: one entry per line,
//! `<number>[*] <epoch seconds> <command>`.

use std::io::BufRead;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::command::CommandRecord;
use crate::error::{Error, Result};
use crate::sync::DeliveryClient;

/// Working directory recorded for imported commands; `fc` does not keep one.
pub const DEFAULT_BACKFILL_WORKDIR: &str = "~";

/// One parsed `fc` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    /// History number as printed, including a trailing `*` for modified entries.
    pub number: String,
    pub timestamp: i64,
    pub command: String,
}

fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+\*?)\s+(\d+)\s+(.*)$").expect("valid regex"))
}

/// Parse one line of `fc -t %s -l` output. Returns `None` for anything else.
pub fn parse_history_line(line: &str) -> Option<HistoryLine> {
    let caps = line_regex().captures(line)?;
    let timestamp = caps[2].parse().ok()?;
    Some(HistoryLine {
        number: caps[1].to_string(),
        timestamp,
        command: caps[3].to_string(),
    })
}

/// Send every parseable line from `input`, oldest first, without dedup.
///
/// Stops at the first failure. `on_sent` is called after each delivered line.
/// Returns the number of commands delivered.
pub async fn backfill<R, F>(
    input: R,
    working_dir: &str,
    client: &DeliveryClient,
    mut on_sent: F,
) -> Result<usize>
where
    R: BufRead,
    F: FnMut(&HistoryLine),
{
    let mut sent = 0;
    for line in input.lines() {
        let line = line.map_err(Error::Input)?;
        let Some(entry) = parse_history_line(&line) else {
            debug!(line = %line, "skipping unparseable history line");
            continue;
        };

        let mut record =
            CommandRecord::new(entry.command.as_str(), working_dir).with_timestamp(entry.timestamp);
        record.validate()?;
        client.send(&record).await?;
        on_sent(&entry);
        sent += 1;
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use cmdtrack_crypto::CommandCipher;

    use crate::config::RetryPolicy;
    use crate::sync::{HistoryTransport, TransportError, WireCommand};

    #[test]
    fn parses_plain_entry() {
        let entry = parse_history_line("  101  1500000000  git status").unwrap();
        assert_eq!(entry.number, "101");
        assert_eq!(entry.timestamp, 1_500_000_000);
        assert_eq!(entry.command, "git status");
    }

    #[test]
    fn parses_modified_entry_marker() {
        let entry = parse_history_line("  7* 1500000001  echo 'a  b'").unwrap();
        assert_eq!(entry.number, "7*");
        assert_eq!(entry.command, "echo 'a  b'");
    }

    #[test]
    fn rejects_non_history_lines() {
        assert_eq!(parse_history_line(""), None);
        assert_eq!(parse_history_line("fc: no such event"), None);
        assert_eq!(parse_history_line("  12 ls"), None);
    }

    #[derive(Default)]
    struct Recorder {
        posted: Mutex<Vec<WireCommand>>,
        fail: bool,
    }

    #[async_trait]
    impl HistoryTransport for Recorder {
        async fn post_command(
            &self,
            command: &WireCommand,
        ) -> std::result::Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::new("connection refused"));
            }
            self.posted.lock().unwrap().push(command.clone());
            Ok(())
        }

        async fn list_history(&self) -> std::result::Result<Vec<WireCommand>, TransportError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn sends_each_entry_with_its_timestamp() {
        let transport = Arc::new(Recorder::default());
        let cipher = CommandCipher::new("k");
        let client = DeliveryClient::new(transport.clone(), cipher.clone(), RetryPolicy::default());
        let input = "    1  1500000000  cd /src\nnoise\n    2  1500000060  make\n";

        let mut seen = Vec::new();
        let sent = backfill(input.as_bytes(), DEFAULT_BACKFILL_WORKDIR, &client, |e| {
            seen.push(e.number.clone())
        })
        .await
        .unwrap();

        assert_eq!(sent, 2);
        assert_eq!(seen, ["1", "2"]);
        let posted = transport.posted.lock().unwrap();
        assert_eq!(posted[0].timestamp, 1_500_000_000);
        assert_eq!(posted[0].working_dir, "~");
        assert_eq!(cipher.decrypt_base64(&posted[1].command).unwrap(), "make");
        assert!(!posted[1].hostname.is_empty());
    }

    struct BrokenPipe;

    impl std::io::Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[tokio::test]
    async fn unreadable_input_is_input_error() {
        let transport = Arc::new(Recorder::default());
        let client = DeliveryClient::new(
            transport.clone(),
            CommandCipher::new("k"),
            RetryPolicy::default(),
        );
        let input = std::io::BufReader::new(BrokenPipe);
        let err = backfill(input, "~", &client, |_| {}).await.unwrap_err();
        assert!(matches!(err, Error::Input(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe));
        assert!(transport.posted.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_first_failure() {
        let transport = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let client =
            DeliveryClient::new(transport, CommandCipher::new("k"), RetryPolicy::default());
        let mut calls = 0;
        let err = backfill("1 1500000000 ls\n2 1500000001 pwd\n".as_bytes(), "~", &client, |_| {
            calls += 1
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Delivery { attempts: 10, .. }));
        assert_eq!(calls, 0);
    }
}
