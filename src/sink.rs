use crate::config::{SinkConfig, TlsConfig};
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client, StatusCode};
use serde_json::Value;
use std::fs;
use thiserror::Error;
use tracing::{error, info};

/// Why a delivery to the inventory endpoint failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP error occurred: {source}")]
    ClientError {
        status: StatusCode,
        source: reqwest::Error,
    },
    #[error("Internal Server Error occurred: {source}")]
    ServerError {
        status: StatusCode,
        source: reqwest::Error,
    },
    #[error("Error connecting to the endpoint: {0}")]
    Connection(#[source] reqwest::Error),
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("An error occurred while sending the request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(#[source] reqwest::Error),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.is_server_error() => DeliveryError::ServerError {
                status,
                source: err,
            },
            Some(status) => DeliveryError::ClientError {
                status,
                source: err,
            },
            None if err.is_connect() => DeliveryError::Connection(err),
            None if err.is_timeout() => DeliveryError::Timeout(err),
            None if err.is_builder() => DeliveryError::Unexpected(err),
            None => DeliveryError::Request(err),
        }
    }
}

/// HTTP endpoint the serialized image inventory is posted to.
pub struct Sink {
    client: Client,
    url: String,
}

impl Sink {
    pub fn new(sink_config: &SinkConfig, tls_config: &TlsConfig) -> Result<Self> {
        info!("Initializing inventory endpoint HTTP client for {}", sink_config.url);
        // System certificates are loaded automatically with rustls-tls-native-roots
        let mut client_builder = Client::builder().timeout(sink_config.timeout);

        for file_path in &tls_config.ca_certificate_paths {
            let file_content = fs::read(file_path)
                .with_context(|| format!("Failed to read file {}", file_path.display()))?;
            let cert =
                Certificate::from_pem(&file_content).context("Failed to parse certificate")?;
            client_builder = client_builder.add_root_certificate(cert);
        }

        Ok(Self {
            client: client_builder
                .build()
                .context("Failed to build HTTP client")?,
            url: sink_config.url.clone(),
        })
    }

    /// Posts the payload once. Every outcome is logged here, callers only decide what to do with it.
    pub async fn deliver(&self, payload: String) -> Result<Value, DeliveryError> {
        let result = self.post(payload).await;
        match &result {
            Ok(body) => {
                info!("Request was successful.");
                info!("Response JSON: {}", body);
            }
            Err(err) => error!("{}", err),
        }
        result
    }

    async fn post(&self, payload: String) -> Result<Value, DeliveryError> {
        info!("Sending image inventory to {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode as AxumStatusCode;
    use axum::routing::post;
    use serde_json::json;
    use std::net::SocketAddr;
    use std::time::Duration;

    pub(crate) async fn spawn_server(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    pub(crate) fn sink(url: String, timeout: Duration) -> Sink {
        Sink::new(&SinkConfig { url, timeout }, &TlsConfig::default()).unwrap()
    }

    fn endpoint(addr: SocketAddr) -> String {
        format!("http://{}/endpoint", addr)
    }

    fn status_app(status: AxumStatusCode) -> Router {
        Router::new().route("/endpoint", post(move || async move { status }))
    }

    #[tokio::test]
    async fn test_deliver_success_returns_response_json() {
        let addr = spawn_server(crate::mock_server::create_app()).await;
        let sink = sink(endpoint(addr), Duration::from_secs(5));

        let body = sink.deliver(r#"{"key": "value"}"#.to_string()).await.unwrap();

        assert_eq!(
            body,
            json!({"status": "success", "received_data": {"key": "value"}})
        );
    }

    #[tokio::test]
    async fn test_deliver_client_error() {
        let addr = spawn_server(status_app(AxumStatusCode::BAD_REQUEST)).await;
        let sink = sink(endpoint(addr), Duration::from_secs(5));

        let err = sink.deliver("{}".to_string()).await.unwrap_err();

        assert!(matches!(err, DeliveryError::ClientError { status, .. } if status == StatusCode::BAD_REQUEST));
        assert!(err.to_string().starts_with("HTTP error occurred:"));
    }

    #[tokio::test]
    async fn test_deliver_server_error() {
        let addr = spawn_server(status_app(AxumStatusCode::INTERNAL_SERVER_ERROR)).await;
        let sink = sink(endpoint(addr), Duration::from_secs(5));

        let err = sink.deliver("{}".to_string()).await.unwrap_err();

        assert!(matches!(err, DeliveryError::ServerError { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
        assert!(err.to_string().starts_with("Internal Server Error occurred:"));
    }

    #[tokio::test]
    async fn test_deliver_connection_error() {
        // Bind and drop to get a local port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let sink = sink(endpoint(addr), Duration::from_secs(5));

        let err = sink.deliver("{}".to_string()).await.unwrap_err();

        assert!(matches!(err, DeliveryError::Connection(_)));
        assert!(err.to_string().starts_with("Error connecting to the endpoint:"));
    }

    #[tokio::test]
    async fn test_deliver_timeout() {
        let app = Router::new().route(
            "/endpoint",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let addr = spawn_server(app).await;
        let sink = sink(endpoint(addr), Duration::from_millis(200));

        let err = sink.deliver("{}".to_string()).await.unwrap_err();

        assert!(matches!(err, DeliveryError::Timeout(_)));
        assert!(err.to_string().starts_with("Request timed out:"));
    }

    #[tokio::test]
    async fn test_deliver_non_json_response() {
        let app = Router::new().route("/endpoint", post(|| async { "not json" }));
        let addr = spawn_server(app).await;
        let sink = sink(endpoint(addr), Duration::from_secs(5));

        let err = sink.deliver("{}".to_string()).await.unwrap_err();

        assert!(matches!(err, DeliveryError::Request(_)));
    }

    #[tokio::test]
    async fn test_deliver_invalid_url() {
        let sink = sink("not a url".to_string(), Duration::from_secs(5));

        let err = sink.deliver("{}".to_string()).await.unwrap_err();

        assert!(matches!(err, DeliveryError::Unexpected(_)));
        assert!(err.to_string().starts_with("An unexpected error occurred:"));
    }

    #[test]
    fn test_new_fails_on_missing_ca_certificate() {
        let tls_config = TlsConfig {
            ca_certificate_paths: vec!["/nonexistent/ca.pem".into()],
        };
        let result = Sink::new(&SinkConfig::default(), &tls_config);
        assert!(result.is_err());
    }
}
