use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, error, info, warn};

use brotlink_client::{Explanation, Metrics, PresentationSync};

use crate::io_worker::IoRequest;

/// Presentation layer for the console: logs what a page would display and
/// hands received images to the I/O worker.
pub(crate) struct ConsolePresenter {
    /// `None` when image saving is turned off.
    sink: Option<ImageSink>,
}

struct ImageSink {
    dir: PathBuf,
    io: mpsc::Sender<IoRequest>,
    /// Start time in seconds, keeps file names unique across sessions.
    session: u64,
    counter: AtomicU64,
}

impl ImageSink {
    fn submit(&self, kind: &str, data_uri: &str) {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let path = self.dir.join(format!("{kind}_{}_{n:04}.png", self.session));
        let request = IoRequest::SaveImage {
            path,
            data_uri: data_uri.to_string(),
        };
        if self.io.send(request).is_err() {
            warn!("IO worker is gone; {kind} not saved");
        }
    }
}

impl ConsolePresenter {
    pub(crate) fn new(images: Option<(PathBuf, mpsc::Sender<IoRequest>)>) -> Self {
        let session = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            sink: images.map(|(dir, io)| ImageSink {
                dir,
                io,
                session,
                counter: AtomicU64::new(0),
            }),
        }
    }
}

impl PresentationSync for ConsolePresenter {
    fn on_busy_changed(&self, busy: bool) {
        if busy {
            info!("Rendering\u{2026}");
        } else {
            debug!("Idle");
        }
    }

    fn on_explanation_changed(&self, explanation: &Explanation) {
        info!("{}", explanation.mode_text);
        info!("{}", explanation.iter_text);
        info!("{}", explanation.zoom_text);
    }

    fn on_metrics_changed(&self, metrics: &Metrics) {
        info!(
            mode = %metrics.mode,
            time = %metrics.time,
            fps = %metrics.fps,
            throughput = %metrics.throughput,
            "Performance"
        );
    }

    fn on_image_ready(&self, data_uri: &str) {
        debug!(len = data_uri.len(), "Frame received");
        if let Some(sink) = &self.sink {
            sink.submit("frame", data_uri);
        }
    }

    fn on_benchmark_chart_ready(&self, data_uri: &str) {
        debug!(len = data_uri.len(), "Benchmark chart received");
        if let Some(sink) = &self.sink {
            sink.submit("chart", data_uri);
        }
    }

    fn on_error(&self, message: &str) {
        error!("Render failed: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_are_queued_with_numbered_names() {
        let (tx, rx) = mpsc::channel();
        let presenter = ConsolePresenter::new(Some((PathBuf::from("/tmp/brotlink"), tx)));

        presenter.on_image_ready("data:image/png;base64,AAAA");
        presenter.on_benchmark_chart_ready("data:image/png;base64,BBBB");

        let IoRequest::SaveImage { path, data_uri } = rx.try_recv().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("frame_") && name.ends_with("_0001.png"), "{name}");
        assert_eq!(data_uri, "data:image/png;base64,AAAA");

        let IoRequest::SaveImage { path, .. } = rx.try_recv().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("chart_") && name.ends_with("_0002.png"), "{name}");
    }

    #[test]
    fn saving_disabled_queues_nothing() {
        let presenter = ConsolePresenter::new(None);
        presenter.on_image_ready("data:image/png;base64,AAAA");
        presenter.on_busy_changed(true);
        presenter.on_error("boom");
    }
}
