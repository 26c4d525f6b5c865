use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use brotlink_core::ViewState;

use crate::error::TransportError;
use crate::presentation::{Explanation, Metrics, PresentationSync};
use crate::transport::{BackendTransport, DEFAULT_REQUEST_TIMEOUT};
use crate::wire::{BenchmarkResult, RenderResult};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// How a single dispatch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The response was the latest one and has been shown.
    Applied(T),
    /// A newer dispatch was issued before this one finished; nothing was shown.
    Superseded,
    /// The request failed and the error state has been shown.
    Failed(TransportError),
}

impl<T> Outcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

impl Outcome<RenderResult> {
    /// The result the metrics panel now reflects: the response itself, or the
    /// `"Error"` sentinel. `None` when the dispatch was superseded.
    pub fn into_result(self) -> Option<RenderResult> {
        match self {
            Self::Applied(result) => Some(result),
            Self::Failed(_) => Some(RenderResult::error()),
            Self::Superseded => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Generation tracking
// ---------------------------------------------------------------------------

/// Numbers dispatches and counts the ones still in flight.
///
/// Issuing a dispatch advances the generation; a response is only shown if
/// its generation is still the current one when it arrives.
#[derive(Debug, Default)]
pub struct DispatchTracker {
    generation: AtomicU64,
    in_flight: Mutex<usize>,
}

impl DispatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Advance the generation and return the new value.
    fn advance(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Number of dispatches that have started but not finished.
    pub fn in_flight(&self) -> usize {
        *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by a running dispatch. Dropping it ends the dispatch, which clears
/// the busy indicator once nothing else is in flight, even if the dispatch
/// future was abandoned half-way.
struct InFlight<'a> {
    generation: u64,
    tracker: &'a DispatchTracker,
    presenter: &'a dyn PresentationSync,
}

impl<'a> InFlight<'a> {
    fn start(tracker: &'a DispatchTracker, presenter: &'a dyn PresentationSync) -> Self {
        let generation = tracker.advance();
        let mut count = tracker
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *count += 1;
        if *count == 1 {
            presenter.on_busy_changed(true);
        }
        Self {
            generation,
            tracker,
            presenter,
        }
    }

    fn is_current(&self) -> bool {
        self.tracker.is_current(self.generation)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut count = self
            .tracker
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.presenter.on_busy_changed(false);
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Sends view-state snapshots to the backend and routes the answers to the
/// presentation layer.
pub struct Dispatcher<T> {
    transport: T,
    presenter: Arc<dyn PresentationSync>,
    tracker: DispatchTracker,
    timeout: Duration,
}

impl<T: BackendTransport> Dispatcher<T> {
    pub fn new(transport: T, presenter: Arc<dyn PresentationSync>) -> Self {
        Self {
            transport,
            presenter,
            tracker: DispatchTracker::new(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Upper bound on how long a dispatch waits for the backend.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tracker(&self) -> &DispatchTracker {
        &self.tracker
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request a normal render of `snapshot`.
    ///
    /// The generation is assigned, the explanation published, the busy
    /// indicator raised and the request built before this returns; the
    /// future sends it, then waits for and applies the response.
    pub fn dispatch_render(
        &self,
        snapshot: ViewState,
    ) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        let ticket = self.begin(&snapshot);
        let request = self.transport.render(snapshot);
        debug!(generation = ticket.generation, "Render dispatched");

        async move {
            let outcome = match self.wait(request).await {
                Ok(result) if ticket.is_current() => {
                    let metrics = Metrics::from(&result);
                    info!(
                        generation = ticket.generation,
                        mode = %metrics.mode,
                        time = %metrics.time,
                        fps = %metrics.fps,
                        throughput = %metrics.throughput,
                        "Render complete"
                    );
                    self.presenter.on_metrics_changed(&metrics);
                    if let Some(image) = result.image() {
                        self.presenter.on_image_ready(image);
                    }
                    Outcome::Applied(result)
                }
                Err(err) if ticket.is_current() => {
                    self.show_failure(&err);
                    Outcome::Failed(err)
                }
                stale => self.discard(ticket.generation, stale.err()),
            };
            drop(ticket);
            outcome
        }
    }

    /// Request a CPU-vs-FPGA comparison of `snapshot`.
    pub fn dispatch_benchmark(
        &self,
        snapshot: ViewState,
    ) -> impl Future<Output = Outcome<BenchmarkResult>> + Send + '_ {
        let ticket = self.begin(&snapshot);
        let request = self.transport.benchmark(snapshot);
        debug!(generation = ticket.generation, "Benchmark dispatched");

        async move {
            let outcome = match self.wait(request).await {
                Ok(result) if ticket.is_current() => {
                    let metrics = Metrics::from(&result);
                    info!(
                        generation = ticket.generation,
                        speedup = %result.speedup,
                        fpga_time = %result.fpga_time,
                        "Benchmark complete"
                    );
                    self.presenter.on_metrics_changed(&metrics);
                    if let Some(image) = result.image() {
                        self.presenter.on_image_ready(image);
                    }
                    if let Some(chart) = result.chart() {
                        self.presenter.on_benchmark_chart_ready(chart);
                    }
                    Outcome::Applied(result)
                }
                Err(err) if ticket.is_current() => {
                    self.show_failure(&err);
                    Outcome::Failed(err)
                }
                stale => self.discard(ticket.generation, stale.err()),
            };
            drop(ticket);
            outcome
        }
    }

    fn begin(&self, snapshot: &ViewState) -> InFlight<'_> {
        self.presenter
            .on_explanation_changed(&Explanation::for_view(snapshot));
        InFlight::start(&self.tracker, self.presenter.as_ref())
    }

    async fn wait<R>(
        &self,
        request: impl Future<Output = Result<R, TransportError>>,
    ) -> Result<R, TransportError> {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }

    fn show_failure(&self, err: &TransportError) {
        warn!("Error updating view: {err}");
        self.presenter.on_metrics_changed(&Metrics::error());
        self.presenter.on_error(&err.to_string());
    }

    fn discard<R>(&self, generation: u64, err: Option<TransportError>) -> Outcome<R> {
        match err {
            Some(err) => debug!(
                generation,
                current = self.tracker.generation(),
                "Dropping stale failure: {err}"
            ),
            None => debug!(
                generation,
                current = self.tracker.generation(),
                "Dropping stale response"
            ),
        }
        Outcome::Superseded
    }
}
