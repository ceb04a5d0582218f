use crate::{environment::LabelEnvironment, error::Error};

/// Holds the collaborators of the labeling subsystem. The kernel is moved into the
/// [`LabelWorker`](crate::worker::LabelWorker) and lives on its thread.
///
/// A [`LabelEnvironment`] defines the types which are used.
pub struct Kernel<E: LabelEnvironment> {
    tile_source: E::TileSource,
    viewport: E::Viewport,
    redraw_trigger: E::RedrawTrigger,
}

impl<E: LabelEnvironment> Kernel<E> {
    pub fn tile_source_mut(&mut self) -> &mut E::TileSource {
        &mut self.tile_source
    }

    pub fn viewport(&self) -> &E::Viewport {
        &self.viewport
    }

    pub fn redraw_trigger(&self) -> &E::RedrawTrigger {
        &self.redraw_trigger
    }
}

/// A convenient builder for [Kernels](Kernel).
pub struct KernelBuilder<E: LabelEnvironment> {
    tile_source: Option<E::TileSource>,
    viewport: Option<E::Viewport>,
    redraw_trigger: Option<E::RedrawTrigger>,
}

impl<E: LabelEnvironment> Default for KernelBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: LabelEnvironment> KernelBuilder<E> {
    pub fn new() -> Self {
        Self {
            tile_source: None,
            viewport: None,
            redraw_trigger: None,
        }
    }

    pub fn with_tile_source(mut self, tile_source: E::TileSource) -> Self {
        self.tile_source = Some(tile_source);
        self
    }

    pub fn with_viewport(mut self, viewport: E::Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_redraw_trigger(mut self, redraw_trigger: E::RedrawTrigger) -> Self {
        self.redraw_trigger = Some(redraw_trigger);
        self
    }

    pub fn build(self) -> Result<Kernel<E>, Error> {
        Ok(Kernel {
            tile_source: self
                .tile_source
                .ok_or(Error::MissingCollaborator("tile source"))?,
            viewport: self
                .viewport
                .ok_or(Error::MissingCollaborator("viewport"))?,
            redraw_trigger: self
                .redraw_trigger
                .ok_or(Error::MissingCollaborator("redraw trigger"))?,
        })
    }
}
