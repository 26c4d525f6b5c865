use thiserror::Error;

/// Errors originating from view-state handling.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid surface: {reason}")]
    InvalidSurface { reason: String },

    #[error("unknown preset: {0:?} (expected seahorse, elephant or spiral)")]
    UnknownPreset(String),

    #[error("unknown color scheme: {0:?}")]
    UnknownColorScheme(String),

    #[error("unknown render mode: {0:?} (expected cpu or fpga)")]
    UnknownRenderMode(String),
}
