//! Snapshots of the visible tiles and the label candidates they carry.

use std::{fmt, sync::Arc};

use crate::{
    coords::{WorldTileCoords, ZoomLevel},
    geometry::LabelSegment,
};

/// Text and style shared between all candidates which display the same string.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelText {
    pub string: String,
    /// In pixels
    pub font_size: f32,
    pub color: [u8; 4],
}

impl LabelText {
    pub fn new(string: impl Into<String>, font_size: f32, color: [u8; 4]) -> Self {
        Self {
            string: string.into(),
            font_size,
            color,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelKind {
    /// A point label. It has no direction and is placed at its anchor.
    #[default]
    Caption,
    /// A label which is laid out along a line segment.
    Line,
}

/// A label which was extracted from a tile. All coordinates are in pixels relative to the
/// upper-left corner of the tile.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelCandidate {
    pub kind: LabelKind,
    pub x: f32,
    pub y: f32,
    /// Only meaningful for [`LabelKind::Line`].
    pub segment: LabelSegment,
    pub text: Arc<LabelText>,
}

impl LabelCandidate {
    pub fn caption(x: f32, y: f32, text: Arc<LabelText>) -> Self {
        Self {
            kind: LabelKind::Caption,
            x,
            y,
            segment: LabelSegment::new(x, y, x, y),
            text,
        }
    }

    /// A line label anchored at the middle of `segment`.
    pub fn line(segment: LabelSegment, text: Arc<LabelText>) -> Self {
        Self {
            kind: LabelKind::Line,
            x: (segment.x1 + segment.x2) / 2.0,
            y: (segment.y1 + segment.y2) / 2.0,
            segment,
            text,
        }
    }

    pub fn is_caption(&self) -> bool {
        self.kind == LabelKind::Caption
    }
}

/// A tile which is currently part of the view.
#[derive(Clone, Debug)]
pub struct VisibleTile {
    pub coords: WorldTileCoords,
    pub visible: bool,
    pub labels: Vec<LabelCandidate>,
}

impl VisibleTile {
    pub fn new(coords: WorldTileCoords, labels: Vec<LabelCandidate>) -> Self {
        Self {
            coords,
            visible: true,
            labels,
        }
    }

    pub fn hidden(coords: WorldTileCoords, labels: Vec<LabelCandidate>) -> Self {
        Self {
            coords,
            visible: false,
            labels,
        }
    }
}

/// An immutable, point-in-time list of the active tiles.
///
/// All tiles within a snapshot are on the same zoom level. Cloning a snapshot is cheap. A new
/// snapshot always replaces the previous one completely.
#[derive(Clone)]
pub struct TileSnapshot {
    tiles: Arc<[VisibleTile]>,
}

impl TileSnapshot {
    pub fn new(tiles: Vec<VisibleTile>) -> Self {
        Self {
            tiles: tiles.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The zoom level of the snapshot, taken from its first tile.
    pub fn zoom_level(&self) -> Option<ZoomLevel> {
        self.tiles.first().map(|tile| tile.coords.z)
    }

    pub fn tiles(&self) -> &[VisibleTile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether both snapshots are the very same instance.
    pub fn same_as(&self, other: &TileSnapshot) -> bool {
        Arc::ptr_eq(&self.tiles, &other.tiles)
    }

    pub fn label_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.visible)
            .map(|tile| tile.labels.len())
            .sum()
    }
}

impl Default for TileSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for TileSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileSnapshot")
            .field("tiles", &self.tiles.len())
            .field("zoom_level", &self.zoom_level())
            .finish()
    }
}

/// Provides the set of active tiles.
pub trait TileSource: Send + 'static {
    /// Returns the current tiles. `previous` is the snapshot which was returned by the last call,
    /// sources may hand it back if nothing changed.
    fn active_tiles(&mut self, previous: Option<&TileSnapshot>) -> TileSnapshot;
}
