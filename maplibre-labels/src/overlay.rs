//! The consumer side: the text overlay which the render loop updates every frame.

use std::sync::Arc;

use crate::{
    environment::LabelEnvironment,
    error::Error,
    handoff::{Handoff, PublishedLayer},
    kernel::Kernel,
    settings::LabelSettings,
    text::TextLayer,
    util::SignificantlyDifferent,
    view_state::ViewPose,
    worker::LabelWorker,
};

/// Owns the labeling thread and the text layer which is currently displayed.
///
/// The overlay never waits for the worker. Every frame, [`TextOverlay::on_frame_update`] swaps in
/// a newly published layer if there is one.
pub struct TextOverlay<E: LabelEnvironment> {
    handoff: Arc<Handoff<E::Resources>>,
    worker: LabelWorker,
    /// The displayed layer and the pose its content was built for.
    current: Option<PublishedLayer<E::Resources>>,
}

impl<E: LabelEnvironment> TextOverlay<E> {
    pub fn new(kernel: Kernel<E>, settings: &LabelSettings) -> Result<Self, Error> {
        let handoff = Arc::new(Handoff::new());
        let worker = LabelWorker::spawn(kernel, handoff.clone(), settings)?;

        Ok(Self {
            handoff,
            worker,
            current: None,
        })
    }

    /// Schedules a debounced rebuild if the position or the set of tiles changed. Does nothing
    /// after [`TextOverlay::shutdown`].
    pub fn notify_viewport_or_tiles_changed(
        &self,
        position_changed: bool,
        tiles_changed: bool,
    ) -> Result<(), Error> {
        if !(position_changed || tiles_changed) || self.worker.is_stopped() {
            return Ok(());
        }
        self.worker.request_relabel()
    }

    /// Swaps in the latest published layer. Returns whether the displayed layer changed.
    ///
    /// The replaced layer is cleared and given back to the worker, which refills it during its
    /// next build.
    #[tracing::instrument(skip_all)]
    pub fn on_frame_update(&mut self) -> Result<bool, Error> {
        let Some(published) = self.handoff.consume_if_present()? else {
            return Ok(false);
        };

        if let Some(PublishedLayer { mut layer, .. }) = self.current.replace(published) {
            layer.clear();
            self.handoff.recycle(layer)?;
        }

        Ok(true)
    }

    pub fn layer(&self) -> Option<&TextLayer<E::Resources>> {
        self.current.as_ref().map(|current| current.layer.as_ref())
    }

    /// The pose the displayed layer is valid for. It can differ from the live pose of the
    /// viewport by the snapping to the tile grid and by the zoom level of the tiles.
    pub fn pose(&self) -> Option<&ViewPose> {
        self.current.as_ref().map(|current| &current.pose)
    }

    /// Whether the displayed layer no longer matches `live`. Snaps `live` into the zoom level of
    /// the displayed layer and compares anchor tile, scale and rotation with the layer's pose.
    pub fn needs_relabel(&self, live: &ViewPose, tile_size: f64) -> bool {
        let Some(pose) = self.pose() else {
            return true;
        };
        let (snapped, _) = live.snap_to_tiles(pose.zoom_level, tile_size);
        SignificantlyDifferent::ne(&snapped, pose, f64::EPSILON)
    }

    pub fn worker(&self) -> &LabelWorker {
        &self.worker
    }

    /// Stops the worker. Later change notifications are ignored, the displayed layer stays.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.worker.shutdown()
    }
}
