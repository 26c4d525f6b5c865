use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use brotlink_client::transport::{TransportConfig, DEFAULT_BACKEND_URL};
use brotlink_core::{ColorScheme, RenderMode, ViewState};

/// Overrides `backend_url` when set.
pub const BACKEND_URL_ENV: &str = "BROTLINK_BACKEND_URL";

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Size of the virtual display surface clicks are measured against.
    /// Matches the backend's frame size by default.
    #[serde(default = "default_surface_width")]
    pub surface_width: f64,
    #[serde(default = "default_surface_height")]
    pub surface_height: f64,

    // Initial control values and the ranges of the bounded controls.
    #[serde(default = "default_max_iter")]
    pub initial_max_iter: u32,
    #[serde(default = "default_iter_min")]
    pub iter_min: u32,
    #[serde(default = "default_iter_max")]
    pub iter_max: u32,
    #[serde(default = "default_precision")]
    pub initial_precision: u32,
    #[serde(default = "default_precision_min")]
    pub precision_min: u32,
    #[serde(default = "default_precision_max")]
    pub precision_max: u32,
    #[serde(default)]
    pub initial_color_scheme: ColorScheme,
    #[serde(default)]
    pub initial_render_mode: RenderMode,

    /// Write every delivered frame and chart to the images directory.
    #[serde(default = "default_true")]
    pub save_images: bool,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_surface_width() -> f64 {
    640.0
}
fn default_surface_height() -> f64 {
    480.0
}
fn default_max_iter() -> u32 {
    100
}
fn default_iter_min() -> u32 {
    10
}
fn default_iter_max() -> u32 {
    5000
}
fn default_precision() -> u32 {
    32
}
fn default_precision_min() -> u32 {
    16
}
fn default_precision_max() -> u32 {
    128
}
fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            surface_width: default_surface_width(),
            surface_height: default_surface_height(),
            initial_max_iter: default_max_iter(),
            iter_min: default_iter_min(),
            iter_max: default_iter_max(),
            initial_precision: default_precision(),
            precision_min: default_precision_min(),
            precision_max: default_precision_max(),
            initial_color_scheme: ColorScheme::default(),
            initial_render_mode: RenderMode::default(),
            save_images: true,
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    /// The backend URL can be overridden from the environment.
    pub fn load() -> Self {
        let mut prefs = Self::load_from(&config_path());
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                info!("Backend URL taken from {BACKEND_URL_ENV}");
                prefs.backend_url = url;
            }
        }
        prefs
    }

    fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        let path = config_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    info!("Saved preferences to {}", path.display());
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.backend_url.clone(),
            request_timeout: self.request_timeout(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// The view the session starts from, seeded from the initial control values.
    pub fn initial_view(&self) -> ViewState {
        ViewState::new(
            self.clamp_iter(self.initial_max_iter),
            self.clamp_precision(self.initial_precision),
            self.initial_color_scheme,
            self.initial_render_mode,
        )
    }

    /// Keep the current controls as the start-up values for next time.
    pub fn remember_controls(&mut self, view: &ViewState) {
        self.initial_max_iter = view.max_iter;
        self.initial_precision = view.precision;
        self.initial_color_scheme = view.color_scheme;
        self.initial_render_mode = view.render_mode;
    }

    pub fn clamp_iter(&self, value: u32) -> u32 {
        clamp_to(value, self.iter_min, self.iter_max)
    }

    pub fn clamp_precision(&self, value: u32) -> u32 {
        clamp_to(value, self.precision_min, self.precision_max)
    }
}

/// `u32::clamp` panics on an inverted range; a hand-edited file may have one.
fn clamp_to(value: u32, min: u32, max: u32) -> u32 {
    value.max(min.min(max)).min(max.max(min))
}

/// Directory holding the running binary; preferences and received frames
/// live next to it. Falls back to the working directory.
pub fn data_directory() -> PathBuf {
    match std::env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        Err(_) => PathBuf::from("."),
    }
}

/// Where frames and benchmark charts are written.
pub fn images_directory() -> PathBuf {
    data_directory().join("images")
}

fn config_path() -> PathBuf {
    data_directory().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let prefs: AppPreferences = serde_json::from_str(
            r#"{ "backend_url": "http://pynq:5000", "initial_render_mode": "cpu" }"#,
        )
        .unwrap();
        assert_eq!(prefs.backend_url, "http://pynq:5000");
        assert_eq!(prefs.initial_render_mode, RenderMode::Cpu);
        assert_eq!(prefs.initial_max_iter, 100);
        assert_eq!(prefs.surface_width, 640.0);
        assert!(prefs.save_images);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let prefs = AppPreferences::load_from(Path::new("/nonexistent/brotlink/preferences.json"));
        assert_eq!(prefs, AppPreferences::default());
    }

    #[test]
    fn initial_view_is_clamped() {
        let prefs = AppPreferences {
            initial_max_iter: 1_000_000,
            initial_precision: 1,
            ..AppPreferences::default()
        };
        let view = prefs.initial_view();
        assert_eq!(view.max_iter, 5000);
        assert_eq!(view.precision, 16);
        assert_eq!(view.zoom, 1.0);
        assert_eq!(view.center_x, -0.7);
    }

    #[test]
    fn inverted_range_does_not_panic() {
        assert_eq!(clamp_to(50, 100, 10), 50);
        assert_eq!(clamp_to(500, 100, 10), 100);
        assert_eq!(clamp_to(1, 100, 10), 10);
    }

    #[test]
    fn remember_controls_keeps_view_values() {
        let mut prefs = AppPreferences::default();
        let view = ViewState::new(640, 64, ColorScheme::Fire, RenderMode::Cpu);
        prefs.remember_controls(&view);
        assert_eq!(prefs.initial_view(), view);
    }

    #[test]
    fn transport_config_carries_timeouts() {
        let prefs = AppPreferences {
            request_timeout_secs: 0,
            ..AppPreferences::default()
        };
        let config = prefs.transport_config();
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }
}
