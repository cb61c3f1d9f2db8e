//! End-to-end tracking: validation, dedup cache, delivery over HTTP.

use std::time::Duration;

use cmdtrack::{
    ClientOptions, CommandRecord, Config, DedupGuard, DeliveryClient, Error, HistoryFetcher,
    RetryPolicy, TrackOutcome, Tracker,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options(server: &MockServer) -> ClientOptions {
    ClientOptions::default()
        .with_base_url(format!("{}/", server.uri()))
        .with_retry(RetryPolicy {
            max_attempts: 2,
            delay: Duration::from_millis(10),
        })
}

fn tracker(server: &MockServer, dir: &tempfile::TempDir) -> Tracker {
    let config = Config::new("secret", "key");
    let client = DeliveryClient::from_config(&config, &options(server)).unwrap();
    Tracker::new(client, DedupGuard::new(dir.path().join(".cmdtrack.last")))
}

#[tokio::test]
async fn consecutive_duplicates_are_sent_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/command"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker(&server, &dir);

    let ls = || CommandRecord::new("ls", "/tmp").with_hostname("host");
    assert_eq!(tracker.track(ls()).await.unwrap(), TrackOutcome::Sent);
    assert_eq!(tracker.track(ls()).await.unwrap(), TrackOutcome::Duplicate);

    let cd = CommandRecord::new("cd ..", "/tmp").with_hostname("host");
    assert_eq!(tracker.track(cd).await.unwrap(), TrackOutcome::Sent);

    let stored = std::fs::read(dir.path().join(".cmdtrack.last")).unwrap();
    assert_eq!(stored.len(), 16);
}

#[tokio::test]
async fn invalid_command_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker(&server, &dir);

    let err = tracker
        .track(CommandRecord::new("ls", "").with_hostname("host"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn tracked_command_round_trips_through_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/command"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    tracker(&server, &dir)
        .track(
            CommandRecord::new("  Example Text to Encrypt  ", "/w")
                .with_hostname("h")
                .with_timestamp(42),
        )
        .await
        .unwrap();

    // Replay what the server received as its history listing.
    let requests = server.received_requests().await.unwrap();
    let listing: Vec<_> = requests
        .iter()
        .map(|r| {
            let fields: std::collections::HashMap<String, String> =
                url::form_urlencoded::parse(&r.body).into_owned().collect();
            serde_json::json!({
                "Command": fields["Command"],
                "Hostname": fields["Hostname"],
                "WorkingDir": fields["WorkingDir"],
                "Timestamp": fields["Timestamp"].parse::<i64>().unwrap(),
            })
        })
        .collect();

    let history_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(&history_server)
        .await;

    let config = Config::new("secret", "key");
    let fetcher = HistoryFetcher::from_config(&config, &options(&history_server)).unwrap();
    let records = fetcher.fetch().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].command, "Example Text to Encrypt");
    assert_eq!(records[0].hostname, "h");
    assert_eq!(records[0].working_dir, "/w");
    assert_eq!(records[0].timestamp, 42);
}
