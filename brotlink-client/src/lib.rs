pub mod bindings;
pub mod dispatcher;
pub mod error;
pub mod presentation;
pub mod transport;
pub mod wire;

pub use bindings::{InputBindings, Key, PointerButton, PointerEvent, PAN_STEP, ZOOM_STEP};
pub use dispatcher::{DispatchTracker, Dispatcher, Outcome};
pub use error::TransportError;
pub use presentation::{Explanation, Metrics, PresentationSync};
pub use transport::{BackendTransport, HttpTransport, TransportConfig};
pub use wire::{BenchmarkResult, RenderResult};

/// Convenience result type for the client crate.
pub type Result<T> = std::result::Result<T, TransportError>;
