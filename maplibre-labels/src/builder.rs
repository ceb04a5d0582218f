//! Builds a text layer from a tile snapshot and a viewport pose.

use std::ops::RangeInclusive;

use crate::{
    geometry::{RotationBasis, TileOffset},
    settings::LabelSettings,
    text::{DrawResources, TextLayer},
    tile::TileSnapshot,
    view_state::ViewPose,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BuildOutcome {
    /// The work layer was refilled and prepared. Its content is valid for the contained pose.
    Built(ViewPose),
    /// There are no tiles. The previously published layer stays valid.
    Unchanged,
    /// The tiles are too far away from the zoom level of the viewport. The labels would be
    /// scaled visibly wrong, so the work layer is left as it is until tiles and viewport converge.
    Deferred { zoom_delta: i32 },
}

pub struct LabelLayerBuilder {
    tile_size: f64,
    zoom_window: RangeInclusive<i32>,
}

impl LabelLayerBuilder {
    pub fn new(settings: &LabelSettings) -> Self {
        Self {
            tile_size: settings.tile_size,
            zoom_window: settings.zoom_window(),
        }
    }

    /// Fills `layer` with the labels of all visible tiles in `snapshot`, moved into a frame
    /// which is anchored at the tile that contains the position of `pose`.
    ///
    /// Tiles in the snapshot might be from another zoom level than the viewport. The returned
    /// pose is the viewport pose moved into the zoom level of the tiles. It must be used together
    /// with the layer instead of the live pose.
    #[tracing::instrument(skip_all)]
    pub fn build<R: DrawResources>(
        &self,
        snapshot: &TileSnapshot,
        pose: &ViewPose,
        layer: &mut TextLayer<R>,
    ) -> BuildOutcome {
        let Some(z) = snapshot.zoom_level() else {
            return BuildOutcome::Unchanged;
        };

        let zoom_delta = pose.zoom_delta(z);
        if !self.zoom_window.contains(&zoom_delta) {
            log::debug!(
                "deferring labels, tiles at z={} but viewport at z={}",
                z,
                pose.zoom_level
            );
            return BuildOutcome::Deferred { zoom_delta };
        }

        let (layer_pose, anchor) = pose.snap_to_tiles(z, self.tile_size);
        let basis = RotationBasis::new(pose.angle);

        layer.clear();

        for tile in snapshot.tiles().iter().filter(|tile| tile.visible) {
            let offset = TileOffset::between(&tile.coords, &anchor, self.tile_size);

            for candidate in &tile.labels {
                let mut item = layer.acquire_item();
                item.set_from(candidate, offset);

                if !candidate.is_caption() {
                    item.segment = item.segment.oriented(&basis);
                }

                layer.add_text(item);
            }
        }

        layer.prepare();

        tracing::trace!("labeled {} items anchored at {}", layer.len(), anchor);

        BuildOutcome::Built(layer_pose)
    }
}
