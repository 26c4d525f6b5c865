use brotlink_core::ViewState;

use crate::wire::{BenchmarkResult, RenderResult, ERROR_MODE};

/// Receiver of everything the controller wants shown to the user.
///
/// Implementations decide how to draw; the controller only says what changed.
/// Callbacks are made synchronously from the dispatching task and must not
/// call back into the dispatcher.
pub trait PresentationSync: Send + Sync {
    /// Loading indicator on or off.
    fn on_busy_changed(&self, busy: bool);

    fn on_explanation_changed(&self, explanation: &Explanation);

    fn on_metrics_changed(&self, metrics: &Metrics);

    /// A new frame (`data:` URI). Replaces the placeholder text.
    fn on_image_ready(&self, data_uri: &str);

    fn on_benchmark_chart_ready(&self, data_uri: &str);

    fn on_error(&self, message: &str);
}

/// The four values of the performance panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metrics {
    pub mode: String,
    pub time: String,
    pub fps: String,
    pub throughput: String,
}

impl Metrics {
    /// Panel contents after a failed dispatch. Only the mode label changes
    /// meaning; the remaining values are left blank.
    pub fn error() -> Self {
        Self {
            mode: ERROR_MODE.to_string(),
            ..Self::default()
        }
    }
}

impl From<&RenderResult> for Metrics {
    fn from(r: &RenderResult) -> Self {
        Self {
            mode: r.mode_used.clone(),
            time: r.render_time.clone(),
            fps: r.fps.clone(),
            throughput: r.throughput.clone(),
        }
    }
}

impl From<&BenchmarkResult> for Metrics {
    fn from(b: &BenchmarkResult) -> Self {
        Self {
            mode: b.label(),
            time: b.fpga_time.clone(),
            fps: "-".to_string(),
            throughput: "-".to_string(),
        }
    }
}

/// Plain-language description of what the backend is about to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub mode_text: String,
    pub iter_text: String,
    pub zoom_text: String,
}

impl Explanation {
    pub fn for_view(view: &ViewState) -> Self {
        let zoom_text = if view.is_zoomed_out() {
            "\u{25b6} You are viewing the entire Mandelbrot set.".to_string()
        } else {
            format!(
                "\u{25b6} You are magnifying a region of the set by {:.1}x. This requires high-precision math.",
                view.zoom
            )
        };
        Self {
            mode_text: format!(
                "\u{25b6} Calculations are being performed by {}.",
                view.render_mode.description()
            ),
            iter_text: format!(
                "\u{25b6} The system will check up to {} times per pixel to see if it escapes.",
                view.max_iter
            ),
            zoom_text,
        }
    }
}
