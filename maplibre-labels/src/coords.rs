//! Provides utilities related to coordinates.

use std::{
    fmt,
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

/// Edge length of a tile in pixels at its own zoom level.
pub const TILE_SIZE: f64 = 512.0;

#[derive(
    Ord, PartialOrd, Eq, PartialEq, Hash, Copy, Clone, Debug, Default, Serialize, Deserialize,
)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    pub const fn new(z: u8) -> Self {
        ZoomLevel(z)
    }

    /// Signed difference `self - other` in zoom levels.
    pub fn delta(self, other: ZoomLevel) -> i32 {
        self.0 as i32 - other.0 as i32
    }
}

impl Display for ZoomLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ZoomLevel {
    fn from(zoom_level: u8) -> Self {
        ZoomLevel(zoom_level)
    }
}

impl From<ZoomLevel> for u8 {
    fn from(val: ZoomLevel) -> Self {
        val.0
    }
}

/// Every tile has tile coordinates within the tile grid of its zoom level.
///
/// # Coordinate System Origin
///
/// The origin of the coordinate system is in the upper-left corner.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct WorldTileCoords {
    pub x: i32,
    pub y: i32,
    pub z: ZoomLevel,
}

impl WorldTileCoords {
    /// Upper-left corner of this tile in pixels at the zoom level `z` of the tile.
    pub fn origin(&self, tile_size: f64) -> WorldCoords {
        WorldCoords {
            x: self.x as f64 * tile_size,
            y: self.y as f64 * tile_size,
        }
    }
}

impl From<(i32, i32, ZoomLevel)> for WorldTileCoords {
    fn from(tuple: (i32, i32, ZoomLevel)) -> Self {
        WorldTileCoords {
            x: tuple.0,
            y: tuple.1,
            z: tuple.2,
        }
    }
}

/// Pixel coordinates within the world at some zoom level.
///
/// # Coordinate System Origin
///
/// The origin of the coordinate system is in the upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldCoords {
    pub x: f64,
    pub y: f64,
}

impl WorldCoords {
    pub fn at_ground(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the tile which contains these coordinates after dividing them by `scale`.
    ///
    /// `scale` is the power-of-two factor between the zoom level these coordinates are expressed
    /// in and the zoom level `z` of the resulting tile grid.
    pub fn into_world_tile(self, z: ZoomLevel, scale: f64, tile_size: f64) -> WorldTileCoords {
        WorldTileCoords {
            x: (self.x / scale / tile_size).floor() as i32,
            y: (self.y / scale / tile_size).floor() as i32,
            z,
        }
    }
}

impl From<(f64, f64)> for WorldCoords {
    fn from(tuple: (f64, f64)) -> Self {
        WorldCoords {
            x: tuple.0,
            y: tuple.1,
        }
    }
}

impl Display for WorldTileCoords {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WT(x={x},y={y},z={z})",
            x = self.x,
            y = self.y,
            z = self.z
        )
    }
}

impl Display for WorldCoords {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "W(x={x},y={y})", x = self.x, y = self.y,)
    }
}

#[cfg(test)]
mod tests {
    use crate::coords::{WorldCoords, WorldTileCoords, ZoomLevel, TILE_SIZE};

    #[test]
    fn test_zoom_delta() {
        assert_eq!(ZoomLevel::from(14).delta(ZoomLevel::from(12)), 2);
        assert_eq!(ZoomLevel::from(3).delta(ZoomLevel::from(5)), -2);
    }

    #[test]
    fn test_into_world_tile() {
        let coords = WorldCoords::at_ground(1300.0, 700.0);
        assert_eq!(
            coords.into_world_tile(ZoomLevel::from(5), 1.0, TILE_SIZE),
            WorldTileCoords::from((2, 1, ZoomLevel::from(5)))
        );
        assert_eq!(
            coords.into_world_tile(ZoomLevel::from(5), 2.0, TILE_SIZE),
            WorldTileCoords::from((1, 0, ZoomLevel::from(5)))
        );

        // Negative positions floor instead of truncating towards zero
        let coords = WorldCoords::at_ground(-10.0, -600.0);
        assert_eq!(
            coords.into_world_tile(ZoomLevel::from(5), 1.0, TILE_SIZE),
            WorldTileCoords::from((-1, -2, ZoomLevel::from(5)))
        );
    }

    #[test]
    fn test_tile_origin() {
        let tile = WorldTileCoords::from((3, 4, ZoomLevel::from(7)));
        assert_eq!(tile.origin(TILE_SIZE), WorldCoords::at_ground(1536.0, 2048.0));
    }
}
