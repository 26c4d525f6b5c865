use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use brotlink_core::ViewState;

use crate::error::TransportError;
use crate::wire::{BenchmarkResult, RenderResult, BENCHMARK_PATH, UPDATE_PATH};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The render backend as seen by the dispatcher.
///
/// Both methods build their request at call time and return a future that
/// owns it; the request goes out when the future is first polled. The future
/// does not borrow `self` or the view.
pub trait BackendTransport: Send + Sync {
    fn render(
        &self,
        view: ViewState,
    ) -> impl Future<Output = Result<RenderResult, TransportError>> + Send + 'static;

    fn benchmark(
        &self,
        view: ViewState,
    ) -> impl Future<Output = Result<BenchmarkResult, TransportError>> + Send + 'static;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// JSON-over-HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: normalize_base_url(&config.base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post_json<T>(
        &self,
        path: &str,
        view: ViewState,
    ) -> impl Future<Output = Result<T, TransportError>> + Send + 'static
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?view, "Sending view state to backend");
        let request = self.http.post(url).json(&view);
        async move {
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;
            decode_body(status, &text)
        }
    }
}

impl BackendTransport for HttpTransport {
    fn render(
        &self,
        view: ViewState,
    ) -> impl Future<Output = Result<RenderResult, TransportError>> + Send + 'static {
        self.post_json(UPDATE_PATH, view)
    }

    fn benchmark(
        &self,
        view: ViewState,
    ) -> impl Future<Output = Result<BenchmarkResult, TransportError>> + Send + 'static {
        self.post_json(BENCHMARK_PATH, view)
    }
}

/// Turn a raw status and body into a decoded response.
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, TransportError> {
    if !(200..300).contains(&status) {
        return Err(TransportError::Status {
            status,
            body: body.to_string(),
        });
    }
    serde_json::from_str(body).map_err(|e| TransportError::Malformed(e.to_string()))
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
