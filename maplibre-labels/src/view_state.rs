//! The pose of the viewer as seen by the labeling subsystem.

use cgmath::{Angle, Deg};

use crate::{
    coords::{WorldCoords, WorldTileCoords, ZoomLevel},
    util::SignificantlyDifferent,
};

/// Position, zoom and rotation of the viewport.
///
/// A pose is always copied into the worker. The camera which produces it keeps mutating its own
/// live pose independently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewPose {
    /// Position in pixels at `zoom_level`.
    pub position: WorldCoords,
    pub zoom_level: ZoomLevel,
    /// Scale of the content relative to `zoom_level`.
    pub scale: f64,
    /// Rotation of the map, clockwise.
    pub angle: Deg<f64>,
}

impl ViewPose {
    pub fn new(position: WorldCoords, zoom_level: ZoomLevel, angle: Deg<f64>) -> Self {
        Self {
            position,
            zoom_level,
            scale: 1.0,
            angle,
        }
    }

    /// Difference in zoom levels between tiles at `z` and this pose.
    pub fn zoom_delta(&self, z: ZoomLevel) -> i32 {
        z.delta(self.zoom_level)
    }

    /// Moves this pose into the tile grid at zoom level `z`.
    ///
    /// The position is snapped to the upper-left corner of the tile which contains it, the zoom
    /// level becomes `z` and the power-of-two scale between both zoom levels is folded into
    /// `scale`. Returns the snapped pose together with the tile it is anchored at.
    ///
    /// Snapping an already snapped pose to the same `z` returns it unchanged.
    pub fn snap_to_tiles(&self, z: ZoomLevel, tile_size: f64) -> (ViewPose, WorldTileCoords) {
        let scale = 2.0_f64.powi(self.zoom_delta(z));
        let anchor = self.position.into_world_tile(z, scale, tile_size);

        let pose = ViewPose {
            position: anchor.origin(tile_size),
            zoom_level: z,
            scale: self.scale * scale,
            angle: self.angle,
        };

        (pose, anchor)
    }
}

impl Default for ViewPose {
    fn default() -> Self {
        Self::new(WorldCoords::default(), ZoomLevel::default(), Deg(0.0))
    }
}

impl SignificantlyDifferent for ViewPose {
    type Epsilon = f64;

    fn ne(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.zoom_level != other.zoom_level
            || (self.scale - other.scale).abs() > epsilon
            || (self.position.x - other.position.x).abs() > epsilon
            || (self.position.y - other.position.y).abs() > epsilon
            || (self.angle - other.angle).normalize_signed().0.abs() > epsilon
    }
}

/// Provides the current pose of the viewport. Called once at the start of every build.
pub trait Viewport: Send + 'static {
    fn current_pose(&self) -> ViewPose;
}
