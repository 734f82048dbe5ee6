use std::time::Duration;

use tokio::time::timeout;

use pingboard::{Config, DisplayZone, Phase, PingRecord, PingStatusView, Renderer};

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn polls_the_containers_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/containers/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"ip":"172.18.0.2","ping_time":3,"last_successful":"2024-01-15T10:30:00Z"},
                {"ip":"172.18.0.3","ping_time":0,"last_successful":null}
            ]"#,
        )
        .create_async()
        .await;

    let config = Config::new(&server.url()).unwrap();
    let view = PingStatusView::http(&config).unwrap();
    let mut updates = view.subscribe();

    view.mount();
    timeout(WAIT, updates.changed()).await.unwrap().unwrap();
    view.unmount();
    mock.assert_async().await;

    let state = view.state();
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(
        state.records,
        vec![
            PingRecord::new("172.18.0.2", 3.0, Some("2024-01-15T10:30:00Z")),
            PingRecord::new("172.18.0.3", 0.0, None),
        ]
    );

    let out = view.render(&Renderer::new(DisplayZone::utc(), false));
    assert!(out.contains("172.18.0.2 | 3 ms    | 15.01.2024 10:30"), "{out}");
    assert!(out.contains("172.18.0.3 | 0 ms    | No data"), "{out}");
}

#[tokio::test]
async fn server_error_shows_banner() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/containers/")
        .with_status(500)
        .create_async()
        .await;

    let config = Config::new(&server.url()).unwrap();
    let view = PingStatusView::http(&config).unwrap();

    assert!(view.fetch_records().await);
    let state = view.state();
    assert_eq!(state.phase(), Phase::Errored);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn wrong_shape_is_a_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/containers/")
        .with_status(200)
        .with_body(r#"[{"address":"10.0.0.1","latency":3}]"#)
        .create_async()
        .await;

    let config = Config::new(&server.url()).unwrap();
    let view = PingStatusView::http(&config).unwrap();

    assert!(view.fetch_records().await);
    assert_eq!(view.state().phase(), Phase::Errored);
}

#[tokio::test]
async fn unreachable_backend_shows_banner() {
    let config = Config::new("http://127.0.0.1:9")
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let view = PingStatusView::http(&config).unwrap();

    assert!(timeout(WAIT, view.fetch_records()).await.unwrap());
    assert_eq!(view.state().phase(), Phase::Errored);
}
