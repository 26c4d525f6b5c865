use std::ops::Neg;

use crate::error::CoreError;
use crate::view_state::ViewState;

/// Width of the complex-plane region shown at zoom `1.0`.
pub const BASE_WIDTH: f64 = 3.5;

/// The display surface the user interacts with, in pixels.
///
/// Pixel `(0, 0)` is the top-left corner and y grows downward, the same
/// orientation the backend uses when it lays out image rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    width: f64,
    height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> crate::Result<Self> {
        if !(width > 0.0 && width.is_finite()) || !(height > 0.0 && height.is_finite()) {
            return Err(CoreError::InvalidSurface {
                reason: format!("dimensions must be positive and finite, got {width}×{height}"),
            });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Height over width.
    pub fn aspect(&self) -> f64 {
        self.height / self.width
    }

    /// Complex-plane extent `(width, height)` visible at `zoom`.
    ///
    /// The height follows the surface's aspect ratio so square pixels map to
    /// square plane regions.
    pub fn plane_extent(&self, zoom: f64) -> (f64, f64) {
        let view_width = BASE_WIDTH / zoom;
        (view_width, view_width * self.aspect())
    }

    /// Plane offset from the view centre to pixel `(x, y)`.
    pub fn delta_to(&self, x: f64, y: f64, zoom: f64) -> PlaneDelta {
        let (view_width, view_height) = self.plane_extent(zoom);
        PlaneDelta {
            dx: (x / self.width - 0.5) * view_width,
            dy: (y / self.height - 0.5) * view_height,
        }
    }

    /// New centre that puts pixel `(x, y)` in the middle of the view.
    pub fn recenter_on(&self, x: f64, y: f64, view: &ViewState) -> (f64, f64) {
        self.delta_to(x, y, view.zoom)
            .apply(view.center_x, view.center_y)
    }
}

/// A displacement in the complex plane.
///
/// The transform does not decide which way a gesture moves the view; call
/// sites apply the delta as-is or negate it first.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaneDelta {
    pub dx: f64,
    pub dy: f64,
}

impl PlaneDelta {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub fn apply(self, center_x: f64, center_y: f64) -> (f64, f64) {
        (center_x + self.dx, center_y + self.dy)
    }
}

impl Neg for PlaneDelta {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}
