//! Transforms tile-local label geometry into the frame of a text layer.

use cgmath::{Angle, Deg, Rad};

use crate::coords::WorldTileCoords;

/// Translation of a tile relative to the anchor tile of a layer, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TileOffset {
    pub dx: i32,
    pub dy: i32,
}

impl TileOffset {
    /// Computes `((tile.x - anchor.x) * tile_size, (tile.y - anchor.y) * tile_size)`.
    ///
    /// Both coordinates are expected to live on the same zoom level.
    pub fn between(tile: &WorldTileCoords, anchor: &WorldTileCoords, tile_size: f64) -> Self {
        Self {
            dx: ((tile.x - anchor.x) as f64 * tile_size) as i32,
            dy: ((tile.y - anchor.y) as f64 * tile_size) as i32,
        }
    }
}

/// `cos` and `sin` of the view rotation, computed once per build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationBasis {
    cos: f32,
    sin: f32,
}

impl RotationBasis {
    pub fn new(angle: Deg<f64>) -> Self {
        let (sin, cos) = Rad::from(angle).sin_cos();
        Self {
            cos: cos as f32,
            sin: sin as f32,
        }
    }

    /// Whether a line from `(x1, y1)` to `(x2, y2)` would read upside-down with this rotation.
    #[inline]
    pub fn reads_backwards(&self, segment: &LabelSegment) -> bool {
        self.cos * (segment.x2 - segment.x1) - self.sin * (segment.y2 - segment.y1) < 0.0
    }
}

/// The line a label is laid out along.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LabelSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl LabelSegment {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[must_use]
    pub fn translated(&self, offset: TileOffset) -> Self {
        let (dx, dy) = (offset.dx as f32, offset.dy as f32);
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Swaps both endpoints.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            x1: self.x2,
            y1: self.y2,
            x2: self.x1,
            y2: self.y1,
        }
    }

    /// Returns the segment, flipped if it would otherwise read upside-down.
    #[must_use]
    pub fn oriented(&self, basis: &RotationBasis) -> Self {
        if basis.reads_backwards(self) {
            self.flipped()
        } else {
            *self
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use crate::{
        coords::{WorldTileCoords, ZoomLevel, TILE_SIZE},
        geometry::{LabelSegment, RotationBasis, TileOffset},
    };

    #[test]
    fn test_tile_offset() {
        let anchor = WorldTileCoords::from((10, 20, ZoomLevel::from(5)));

        assert_eq!(
            TileOffset::between(&anchor, &anchor, TILE_SIZE),
            TileOffset { dx: 0, dy: 0 }
        );
        assert_eq!(
            TileOffset::between(
                &WorldTileCoords::from((12, 19, ZoomLevel::from(5))),
                &anchor,
                TILE_SIZE
            ),
            TileOffset { dx: 1024, dy: -512 }
        );
        assert_eq!(
            TileOffset::between(
                &WorldTileCoords::from((9, 21, ZoomLevel::from(5))),
                &anchor,
                256.0
            ),
            TileOffset { dx: -256, dy: 256 }
        );
    }

    #[test]
    fn test_no_flip_without_rotation() {
        let segment = LabelSegment::new(0.0, 0.0, 10.0, 0.0);
        let basis = RotationBasis::new(Deg(0.0));

        assert!(!basis.reads_backwards(&segment));
        assert_eq!(segment.oriented(&basis), segment);
    }

    #[test]
    fn test_flip_when_upside_down() {
        let segment = LabelSegment::new(0.0, 0.0, 10.0, 0.0);
        let basis = RotationBasis::new(Deg(180.0));

        assert!(basis.reads_backwards(&segment));
        assert_eq!(
            segment.oriented(&basis),
            LabelSegment::new(10.0, 0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_flip_vertical_segment() {
        // Pointing up in screen space: -sin(90°) * -10 = 10
        let up = LabelSegment::new(0.0, 10.0, 0.0, 0.0);
        let basis = RotationBasis::new(Deg(90.0));
        assert!(!basis.reads_backwards(&up));
        assert!(basis.reads_backwards(&up.flipped()));
    }

    #[test]
    fn test_translate() {
        let segment = LabelSegment::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            segment.translated(TileOffset { dx: 512, dy: -512 }),
            LabelSegment::new(513.0, -510.0, 515.0, -508.0)
        );
    }
}
