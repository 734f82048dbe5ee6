use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client, StatusCode, Url};
use thiserror::Error;

use crate::config::Config;
use crate::models::{Health, PingRecord};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(StatusCode),

    #[error("unexpected payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Where a fetch cycle gets its records from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<PingRecord>, FetchError>;
}

pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn build(config: &Config) -> Result<HttpSource, FetchError> {
        Ok(HttpSource {
            client: build_client(config)?,
            url: config.records_url(),
        })
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<PingRecord>, FetchError> {
        fetch_records(&self.client, self.url.clone()).await
    }
}

pub fn build_client(config: &Config) -> Result<Client, FetchError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(concat!("pingboard/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

pub async fn fetch_records(client: &Client, url: Url) -> Result<Vec<PingRecord>, FetchError> {
    let body = get_body(client, url).await?;
    let records = serde_json::from_str::<Vec<PingRecord>>(&body)?;
    Ok(records)
}

pub async fn check_health(client: &Client, url: Url) -> Result<Health, FetchError> {
    let body = get_body(client, url).await?;
    let health = serde_json::from_str::<Health>(&body)?;
    Ok(health)
}

async fn get_body(client: &Client, url: Url) -> Result<String, FetchError> {
    let r = client.get(url).send().await?;

    debug!("Status code: {}", r.status());
    if !r.status().is_success() {
        return Err(FetchError::Status(r.status()));
    }

    let body = r.text().await?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(server: &mockito::Server) -> Config {
        Config::new(&server.url()).unwrap()
    }

    #[tokio::test]
    async fn fetches_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/containers/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"ip":"10.0.0.1","ping_time":23,"last_successful":"2024-01-15T10:30:00Z"},
                    {"ip":"10.0.0.2","ping_time":0,"last_successful":null}]"#,
            )
            .create_async()
            .await;

        let source = HttpSource::build(&config(&server)).unwrap();
        let records = source.fetch().await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].address, "10.0.0.1");
        assert_eq!(records[1].last_success_at, None);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/containers/")
            .with_status(503)
            .with_body("[]")
            .create_async()
            .await;

        let source = HttpSource::build(&config(&server)).unwrap();
        match source.fetch().await {
            Err(FetchError::Status(status)) => assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_payload_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/containers/")
            .with_status(200)
            .with_body(r#"{"containers":[]}"#)
            .create_async()
            .await;

        let source = HttpSource::build(&config(&server)).unwrap();
        assert!(matches!(source.fetch().await, Err(FetchError::Payload(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // port 9 (discard) on localhost is expected to refuse connections
        let config = Config::new("http://127.0.0.1:9").unwrap();
        let source = HttpSource::build(&config).unwrap();
        assert!(matches!(source.fetch().await, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn health_probe() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let config = config(&server);
        let client = build_client(&config).unwrap();
        let health = check_health(&client, config.health_url()).await.unwrap();
        assert!(health.is_ok());
    }
}
