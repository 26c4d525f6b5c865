pub mod error;
pub mod preset;
pub mod store;
pub mod view_state;
pub mod viewport;

// Re-export primary types for convenience.
pub use error::CoreError;
pub use preset::Preset;
pub use store::ViewStateStore;
pub use view_state::{ColorScheme, RenderMode, ViewState, ViewUpdate};
pub use viewport::{PlaneDelta, Surface, BASE_WIDTH};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
