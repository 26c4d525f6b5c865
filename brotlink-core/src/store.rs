use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::preset::Preset;
use crate::view_state::{ViewState, ViewUpdate, DEFAULT_CENTER_X, DEFAULT_CENTER_Y, MIN_ZOOM};

/// The single mutable view-state record shared by input handling and dispatch.
///
/// Every write goes through [`set`](Self::set) or one of the helpers built on
/// the same lock, so readers never observe a half-applied update. The lock is
/// only held for the duration of a field copy.
#[derive(Debug, Default)]
pub struct ViewStateStore {
    state: Mutex<ViewState>,
}

impl ViewStateStore {
    pub fn new(initial: ViewState) -> Self {
        let mut state = initial;
        state.zoom = state.zoom.max(MIN_ZOOM);
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        // The guarded value is plain `Copy` data; a panic elsewhere cannot
        // leave it half-written.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current view.
    pub fn get(&self) -> ViewState {
        *self.lock()
    }

    /// Apply `update` in one step and return the resulting snapshot.
    pub fn set(&self, update: ViewUpdate) -> ViewState {
        let mut state = self.lock();
        update.apply_to(&mut state);
        debug!(?update, "View state updated");
        *state
    }

    /// Read-modify-write under a single lock. The closure sees the current
    /// state; zoom is clamped afterwards and the resulting snapshot returned.
    pub fn update(&self, f: impl FnOnce(&mut ViewState)) -> ViewState {
        let mut state = self.lock();
        f(&mut state);
        state.zoom = state.zoom.max(MIN_ZOOM);
        debug!(
            center_x = state.center_x,
            center_y = state.center_y,
            zoom = state.zoom,
            "View state updated in place"
        );
        *state
    }

    /// Multiply the zoom by `factor`, never going below the zoomed-out view.
    pub fn zoom_by(&self, factor: f64) -> ViewState {
        let mut state = self.lock();
        state.zoom = (state.zoom * factor).max(MIN_ZOOM);
        debug!(factor, zoom = state.zoom, "Zoom changed");
        *state
    }

    /// Shift the centre by `(dx, dy)` plane units. Zoom is untouched.
    pub fn pan_by(&self, dx: f64, dy: f64) -> ViewState {
        let mut state = self.lock();
        state.center_x += dx;
        state.center_y += dy;
        debug!(
            center_x = state.center_x,
            center_y = state.center_y,
            "View panned"
        );
        *state
    }

    /// Restore the default centre and zoom. Iterations, precision, palette and
    /// render mode are kept.
    pub fn reset_view(&self) -> ViewState {
        self.set(
            ViewUpdate::default()
                .center(DEFAULT_CENTER_X, DEFAULT_CENTER_Y)
                .zoom(MIN_ZOOM),
        )
    }

    /// Jump to a named location.
    pub fn apply_preset(&self, preset: Preset) -> ViewState {
        let (x, y, zoom) = preset.location();
        debug!(%preset, "Applying preset");
        self.set(ViewUpdate::default().center(x, y).zoom(zoom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_state::{ColorScheme, RenderMode};

    #[test]
    fn set_returns_snapshot() {
        let store = ViewStateStore::default();
        let snap = store.set(ViewUpdate::default().center(0.1, 0.2).max_iter(900));
        assert_eq!(snap, store.get());
        assert_eq!(snap.center_x, 0.1);
        assert_eq!(snap.center_y, 0.2);
        assert_eq!(snap.max_iter, 900);
    }

    #[test]
    fn new_clamps_initial_zoom() {
        let mut initial = ViewState::default();
        initial.zoom = 0.1;
        let store = ViewStateStore::new(initial);
        assert_eq!(store.get().zoom, MIN_ZOOM);
    }

    #[test]
    fn reset_keeps_render_parameters() {
        let store = ViewStateStore::new(ViewState::new(
            777,
            64,
            ColorScheme::Fire,
            RenderMode::Cpu,
        ));
        store.apply_preset(Preset::Spiral);
        let snap = store.reset_view();
        assert_eq!(snap.center_x, DEFAULT_CENTER_X);
        assert_eq!(snap.center_y, DEFAULT_CENTER_Y);
        assert_eq!(snap.zoom, MIN_ZOOM);
        assert_eq!(snap.max_iter, 777);
        assert_eq!(snap.precision, 64);
        assert_eq!(snap.color_scheme, ColorScheme::Fire);
        assert_eq!(snap.render_mode, RenderMode::Cpu);
    }

    #[test]
    fn pan_leaves_zoom_alone() {
        let store = ViewStateStore::default();
        store.zoom_by(8.0);
        let snap = store.pan_by(0.01, -0.02);
        assert_eq!(snap.zoom, 8.0);
        assert!((snap.center_x - (-0.69)).abs() < 1e-12);
        assert!((snap.center_y - (-0.02)).abs() < 1e-12);
    }

    #[test]
    fn update_reads_and_writes_in_one_step() {
        let store = ViewStateStore::default();
        store.zoom_by(4.0);
        let snap = store.update(|view| {
            view.center_x += 1.0 / view.zoom;
            view.zoom /= 8.0;
        });
        assert!((snap.center_x - (-0.45)).abs() < 1e-12);
        assert_eq!(snap.zoom, MIN_ZOOM);
        assert_eq!(store.get(), snap);
    }

    #[test]
    fn zoom_out_stops_at_floor() {
        let store = ViewStateStore::default();
        store.zoom_by(4.0);
        assert_eq!(store.zoom_by(0.5).zoom, 2.0);
        assert_eq!(store.zoom_by(0.5).zoom, MIN_ZOOM);
        assert_eq!(store.zoom_by(0.5).zoom, MIN_ZOOM);
    }
}
