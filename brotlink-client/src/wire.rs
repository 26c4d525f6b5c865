//! Response bodies returned by the render backend.
//!
//! Request bodies need no wrapper: a [`ViewState`](brotlink_core::ViewState)
//! serializes directly into the shape `/update` and `/benchmark` expect.

use serde::{Deserialize, Deserializer};

/// Path of the standard render endpoint.
pub const UPDATE_PATH: &str = "/update";
/// Path of the CPU-vs-FPGA comparison endpoint.
pub const BENCHMARK_PATH: &str = "/benchmark";

/// Label shown in place of the mode when a dispatch fails.
pub const ERROR_MODE: &str = "Error";

/// Body of a successful `/update` response.
///
/// The metric fields arrive pre-formatted by the backend and are kept as
/// text; plain JSON numbers are accepted and rendered as written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub mode_used: String,
    #[serde(deserialize_with = "metric_text")]
    pub render_time: String,
    #[serde(deserialize_with = "metric_text")]
    pub fps: String,
    #[serde(deserialize_with = "metric_text")]
    pub throughput: String,
    /// PNG frame as a `data:` URI.
    #[serde(default)]
    pub image_base64: Option<String>,
}

impl RenderResult {
    /// Sentinel result standing in for a failed dispatch.
    pub fn error() -> Self {
        Self {
            mode_used: ERROR_MODE.to_string(),
            render_time: String::new(),
            fps: String::new(),
            throughput: String::new(),
            image_base64: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.mode_used == ERROR_MODE
    }

    /// The frame, if the backend sent a non-empty one.
    pub fn image(&self) -> Option<&str> {
        non_empty(self.image_base64.as_deref())
    }
}

/// Body of a successful `/benchmark` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    #[serde(deserialize_with = "metric_text")]
    pub speedup: String,
    #[serde(deserialize_with = "metric_text")]
    pub fpga_time: String,
    #[serde(default)]
    pub image_base64: Option<String>,
    /// Comparison chart as a `data:` URI.
    #[serde(default)]
    pub chart_base64: Option<String>,
}

impl BenchmarkResult {
    /// Mode label composed for the metrics panel.
    pub fn label(&self) -> String {
        format!("BENCHMARK (FPGA is {} faster)", self.speedup)
    }

    pub fn image(&self) -> Option<&str> {
        non_empty(self.image_base64.as_deref())
    }

    pub fn chart(&self) -> Option<&str> {
        non_empty(self.chart_base64.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn metric_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(n) => n.to_string(),
    })
}
