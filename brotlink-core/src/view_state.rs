use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Real part of the centre shown at start-up and after a reset.
pub const DEFAULT_CENTER_X: f64 = -0.7;
/// Imaginary part of the centre shown at start-up and after a reset.
pub const DEFAULT_CENTER_Y: f64 = 0.0;
/// Fully zoomed-out view. Zoom is never allowed below this.
pub const MIN_ZOOM: f64 = 1.0;

// ---------------------------------------------------------------------------
// Render mode
// ---------------------------------------------------------------------------

/// Backend execution path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Cpu,
    #[default]
    Fpga,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Fpga => "fpga",
        }
    }

    /// Human description used by the live explanation panel.
    pub fn description(self) -> &'static str {
        match self {
            Self::Cpu => "the sequential CPU",
            Self::Fpga => "the parallel FPGA hardware",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "fpga" => Ok(Self::Fpga),
            _ => Err(CoreError::UnknownRenderMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Color scheme
// ---------------------------------------------------------------------------

/// Palettes the backend knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Classic,
    Fire,
    Ocean,
    Grayscale,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 4] = [Self::Classic, Self::Fire, Self::Ocean, Self::Grayscale];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Fire => "fire",
            Self::Ocean => "ocean",
            Self::Grayscale => "grayscale",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownColorScheme(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Everything the backend needs to render one frame.
///
/// The serialized form is the request body sent to the backend, so field
/// names follow the backend's camelCase keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Real part of the view centre.
    pub center_x: f64,
    /// Imaginary part of the view centre.
    pub center_y: f64,
    /// Magnification relative to [`BASE_WIDTH`](crate::BASE_WIDTH). Always `>= 1.0`.
    pub zoom: f64,
    /// Iteration cap per pixel.
    pub max_iter: u32,
    /// Numeric bit-width hint forwarded to the backend.
    pub precision: u32,
    pub color_scheme: ColorScheme,
    pub render_mode: RenderMode,
}

impl ViewState {
    /// Default centre and zoom with the given control values.
    pub fn new(
        max_iter: u32,
        precision: u32,
        color_scheme: ColorScheme,
        render_mode: RenderMode,
    ) -> Self {
        Self {
            center_x: DEFAULT_CENTER_X,
            center_y: DEFAULT_CENTER_Y,
            zoom: MIN_ZOOM,
            max_iter,
            precision,
            color_scheme,
            render_mode,
        }
    }

    /// True when the whole set is in view.
    pub fn is_zoomed_out(&self) -> bool {
        self.zoom <= MIN_ZOOM
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(100, 32, ColorScheme::default(), RenderMode::default())
    }
}

// ---------------------------------------------------------------------------
// ViewUpdate
// ---------------------------------------------------------------------------

/// A partial update: every `Some` field is written, `None` fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewUpdate {
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
    pub zoom: Option<f64>,
    pub max_iter: Option<u32>,
    pub precision: Option<u32>,
    pub color_scheme: Option<ColorScheme>,
    pub render_mode: Option<RenderMode>,
}

impl ViewUpdate {
    pub fn center(mut self, x: f64, y: f64) -> Self {
        self.center_x = Some(x);
        self.center_y = Some(y);
        self
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn max_iter(mut self, max_iter: u32) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = Some(scheme);
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = Some(mode);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the update into `state`. A new zoom is clamped to [`MIN_ZOOM`];
    /// non-finite centre or zoom values are ignored.
    pub fn apply_to(&self, state: &mut ViewState) {
        if let Some(x) = self.center_x.filter(|x| x.is_finite()) {
            state.center_x = x;
        }
        if let Some(y) = self.center_y.filter(|y| y.is_finite()) {
            state.center_y = y;
        }
        if let Some(zoom) = self.zoom.filter(|z| z.is_finite()) {
            state.zoom = zoom.max(MIN_ZOOM);
        }
        if let Some(max_iter) = self.max_iter {
            state.max_iter = max_iter;
        }
        if let Some(precision) = self.precision {
            state.precision = precision;
        }
        if let Some(scheme) = self.color_scheme {
            state.color_scheme = scheme;
        }
        if let Some(mode) = self.render_mode {
            state.render_mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_backend_keys() {
        let state = ViewState::new(250, 64, ColorScheme::Ocean, RenderMode::Cpu);
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["centerX"], -0.7);
        assert_eq!(json["centerY"], 0.0);
        assert_eq!(json["zoom"], 1.0);
        assert_eq!(json["maxIter"], 250);
        assert_eq!(json["precision"], 64);
        assert_eq!(json["colorScheme"], "ocean");
        assert_eq!(json["renderMode"], "cpu");
        assert_eq!(json.as_object().unwrap().len(), 7);
    }

    #[test]
    fn parse_render_mode() {
        assert_eq!("cpu".parse::<RenderMode>(), Ok(RenderMode::Cpu));
        assert_eq!(" FPGA ".parse::<RenderMode>(), Ok(RenderMode::Fpga));
        assert!("gpu".parse::<RenderMode>().is_err());
    }

    #[test]
    fn parse_color_scheme() {
        for scheme in ColorScheme::ALL {
            assert_eq!(scheme.as_str().parse::<ColorScheme>(), Ok(scheme));
        }
        assert_eq!(
            "rainbow".parse::<ColorScheme>(),
            Err(CoreError::UnknownColorScheme("rainbow".into()))
        );
    }

    #[test]
    fn update_touches_only_given_fields() {
        let mut state = ViewState::default();
        ViewUpdate::default().max_iter(500).apply_to(&mut state);
        assert_eq!(state.max_iter, 500);
        assert_eq!(state.center_x, DEFAULT_CENTER_X);
        assert_eq!(state.zoom, MIN_ZOOM);
        assert_eq!(state.precision, 32);
    }

    #[test]
    fn update_clamps_zoom() {
        let mut state = ViewState::default();
        ViewUpdate::default().zoom(0.25).apply_to(&mut state);
        assert_eq!(state.zoom, MIN_ZOOM);
    }

    #[test]
    fn update_skips_non_finite_geometry() {
        let mut state = ViewState::default();
        ViewUpdate::default()
            .center(f64::NAN, f64::INFINITY)
            .zoom(f64::INFINITY)
            .max_iter(300)
            .apply_to(&mut state);
        assert_eq!(state.center_x, DEFAULT_CENTER_X);
        assert_eq!(state.center_y, DEFAULT_CENTER_Y);
        assert_eq!(state.zoom, MIN_ZOOM);
        assert_eq!(state.max_iter, 300);

        let json = serde_json::to_value(state).unwrap();
        assert!(json["centerX"].is_f64());
    }

    #[test]
    fn empty_update() {
        assert!(ViewUpdate::default().is_empty());
        assert!(!ViewUpdate::default().precision(8).is_empty());
    }
}
