use std::future::Future;
use std::str::FromStr;

use tracing::debug;

use brotlink_core::{ColorScheme, Preset, RenderMode, Surface, ViewStateStore, ViewUpdate};

use crate::dispatcher::{Dispatcher, Outcome};
use crate::transport::BackendTransport;
use crate::wire::{BenchmarkResult, RenderResult};

/// Pan distance per arrow-key press, in plane units at zoom `1.0`.
pub const PAN_STEP: f64 = 0.2;
/// Zoom multiplier for a click on the display surface.
pub const ZOOM_STEP: f64 = 2.0;

/// Which pointer button went down on the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    /// Zoom in.
    #[default]
    Primary,
    /// Zoom out.
    Secondary,
}

impl FromStr for PointerButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "left" | "0" => Ok(Self::Primary),
            "secondary" | "right" | "2" => Ok(Self::Secondary),
            other => Err(format!("unknown pointer button: {other:?}")),
        }
    }
}

/// A click on the display surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position relative to the surface's top-left corner.
    pub x: f64,
    pub y: f64,
    /// Size of the surface at the time of the click.
    pub surface: Surface,
    pub button: PointerButton,
}

/// Keyboard keys the view reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value (or a short direction name),
    /// ignoring case.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "arrowup" | "up" => Self::ArrowUp,
            "arrowdown" | "down" => Self::ArrowDown,
            "arrowleft" | "left" => Self::ArrowLeft,
            "arrowright" | "right" => Self::ArrowRight,
            _ => Self::Other,
        }
    }

    /// Unit pan direction in plane axes. Up moves toward smaller imaginary
    /// values, matching the y-down layout of the surface.
    fn direction(self) -> Option<(f64, f64)> {
        match self {
            Self::ArrowUp => Some((0.0, -1.0)),
            Self::ArrowDown => Some((0.0, 1.0)),
            Self::ArrowLeft => Some((-1.0, 0.0)),
            Self::ArrowRight => Some((1.0, 0.0)),
            Self::Other => None,
        }
    }
}

/// Turns control events into view-state changes followed by a dispatch.
///
/// Every commit method mutates the store, assigns the dispatch generation and
/// builds the request before it returns; the returned future sends the
/// request and waits for the response.
pub struct InputBindings<T> {
    store: ViewStateStore,
    dispatcher: Dispatcher<T>,
}

impl<T: BackendTransport> InputBindings<T> {
    pub fn new(store: ViewStateStore, dispatcher: Dispatcher<T>) -> Self {
        Self { store, dispatcher }
    }

    pub fn store(&self) -> &ViewStateStore {
        &self.store
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Render whatever the store currently holds (page load).
    pub fn initial_render(
        &self,
    ) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        self.dispatcher.dispatch_render(self.store.get())
    }

    fn commit(
        &self,
        update: ViewUpdate,
    ) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        let snapshot = self.store.set(update);
        self.dispatcher.dispatch_render(snapshot)
    }

    /// Live label while the iteration slider is being dragged.
    pub fn iter_slider_input(&self, value: u32) -> String {
        value.to_string()
    }

    pub fn iter_slider_change(
        &self,
        value: u32,
    ) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        self.commit(ViewUpdate::default().max_iter(value))
    }

    /// Live label while the precision slider is being dragged.
    pub fn precision_slider_input(&self, value: u32) -> String {
        format!("{value}-bit")
    }

    pub fn precision_slider_change(
        &self,
        value: u32,
    ) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        self.commit(ViewUpdate::default().precision(value))
    }

    pub fn color_scheme_change(
        &self,
        scheme: ColorScheme,
    ) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        self.commit(ViewUpdate::default().color_scheme(scheme))
    }

    pub fn render_mode_change(
        &self,
        mode: RenderMode,
    ) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        self.commit(ViewUpdate::default().render_mode(mode))
    }

    pub fn reset(&self) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        let snapshot = self.store.reset_view();
        self.dispatcher.dispatch_render(snapshot)
    }

    pub fn preset(
        &self,
        preset: Preset,
    ) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        let snapshot = self.store.apply_preset(preset);
        self.dispatcher.dispatch_render(snapshot)
    }

    /// Re-centre on the clicked pixel, then zoom in (primary) or out (secondary).
    pub fn pointer(
        &self,
        event: PointerEvent,
    ) -> impl Future<Output = Outcome<RenderResult>> + Send + '_ {
        debug!(x = event.x, y = event.y, button = ?event.button, "Surface clicked");
        let snapshot = self.store.update(|view| {
            let (center_x, center_y) = event.surface.recenter_on(event.x, event.y, view);
            let zoom = match event.button {
                PointerButton::Primary => view.zoom * ZOOM_STEP,
                PointerButton::Secondary => view.zoom / ZOOM_STEP,
            };
            ViewUpdate::default()
                .center(center_x, center_y)
                .zoom(zoom)
                .apply_to(view);
        });
        self.dispatcher.dispatch_render(snapshot)
    }

    /// Pan one step for arrow keys. Returns `None` for keys the view ignores;
    /// `Some` means the key was consumed and its default action should be
    /// suppressed.
    pub fn key(
        &self,
        key: Key,
    ) -> Option<impl Future<Output = Outcome<RenderResult>> + Send + '_> {
        let (ux, uy) = key.direction()?;
        let snapshot = self.store.update(|view| {
            let step = PAN_STEP / view.zoom;
            view.center_x += ux * step;
            view.center_y += uy * step;
        });
        Some(self.dispatcher.dispatch_render(snapshot))
    }

    pub fn benchmark(&self) -> impl Future<Output = Outcome<BenchmarkResult>> + Send + '_ {
        self.dispatcher.dispatch_benchmark(self.store.get())
    }
}
