use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use poller_core::{format_http_date, parse_row_date, PollTiming, Row};
use poller_engine::{
    ChannelEventSink, FetchSettings, PollerEngine, PollerEvent, ReqwestSubmissionFetcher,
};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_timing() -> PollTiming {
    PollTiming {
        interval: Duration::from_millis(50),
        ..PollTiming::default()
    }
}

#[tokio::test]
async fn row_is_replaced_with_server_fragment() {
    poller_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/submission/42/Mon,%2001%20Jan%202024%2000:04:00%20GMT",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<td>Accepted</td>", "text/html"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/submission/42/.+$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let fetcher = ReqwestSubmissionFetcher::new(FetchSettings {
        base_url: server.uri(),
        ..FetchSettings::default()
    })
    .expect("fetcher");
    let (sink, mut events) = ChannelEventSink::channel();
    let engine = PollerEngine::new(Arc::new(fetcher), Arc::new(sink), fast_timing());

    let before = Utc::now();
    let pollers = engine.initialize(vec![Row::new("/submission/42", "2024-01-01T00:05:00Z")]);

    let updated = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Some(PollerEvent::RowUpdated(view)) => break view,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    })
    .await
    .expect("row updated");
    let after = Utc::now();

    assert_eq!(updated.content, "<td>Accepted</td>");
    let new_date = parse_row_date(&updated.date).expect("http date");
    // HTTP dates carry whole seconds.
    assert!(new_date >= before - TimeDelta::minutes(1) - TimeDelta::seconds(1));
    assert!(new_date <= after - TimeDelta::minutes(1));

    // Later polls ask from the refreshed date and get empty replies.
    let mut watch = pollers.get(0).unwrap().subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if server.received_requests().await.unwrap_or_default().len() >= 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("polling continues");
    assert_eq!(watch.borrow_and_update().content, "<td>Accepted</td>");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(
        requests[0].url.path(),
        "/submission/42/Mon,%2001%20Jan%202024%2000:04:00%20GMT"
    );
    let refreshed_since = new_date - TimeDelta::minutes(1);
    assert_eq!(
        requests[1].url.path(),
        format!(
            "/submission/42/{}",
            format_http_date(refreshed_since).replace(' ', "%20")
        )
    );

    pollers.shutdown().await;
}

#[tokio::test]
async fn server_errors_do_not_stop_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = ReqwestSubmissionFetcher::new(FetchSettings {
        base_url: server.uri(),
        ..FetchSettings::default()
    })
    .expect("fetcher");
    let (sink, mut events) = ChannelEventSink::channel();
    let engine = PollerEngine::new(Arc::new(fetcher), Arc::new(sink), fast_timing());
    let row = Row::new("/submission/8", "2024-01-01T00:05:00Z").with_content("<td>Draft</td>");
    let pollers = engine.initialize(vec![row.clone()]);

    let mut failures = 0;
    tokio::time::timeout(Duration::from_secs(5), async {
        while failures < 3 {
            if let Some(PollerEvent::PollFailed { .. }) = events.recv().await {
                failures += 1;
            }
        }
    })
    .await
    .expect("three failed polls");

    let view = pollers.get(0).unwrap().view();
    assert_eq!(view.content, row.content);
    assert_eq!(view.date, row.date);
    pollers.shutdown().await;
}

#[tokio::test]
async fn malformed_utf8_body_still_updates_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/submission/42/Mon,%2001%20Jan%202024%2000:04:00%20GMT",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<td>Accepted \xC3( </td>".to_vec(), "text/html; charset=utf-8"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/submission/42/.+$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let fetcher = ReqwestSubmissionFetcher::new(FetchSettings {
        base_url: server.uri(),
        ..FetchSettings::default()
    })
    .expect("fetcher");
    let (sink, mut events) = ChannelEventSink::channel();
    let engine = PollerEngine::new(Arc::new(fetcher), Arc::new(sink), fast_timing());
    let row = Row::new("/submission/42", "2024-01-01T00:05:00Z");
    let pollers = engine.initialize(vec![row.clone()]);

    let updated = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Some(PollerEvent::RowUpdated(view)) => break view,
                Some(PollerEvent::PollFailed { error, .. }) => panic!("poll failed: {error}"),
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    })
    .await
    .expect("row updated");

    assert_eq!(updated.content, "<td>Accepted \u{fffd}( </td>");
    assert_ne!(updated.date, row.date);
    pollers.shutdown().await;
}
