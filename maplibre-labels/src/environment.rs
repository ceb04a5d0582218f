use crate::{text::DrawResources, tile::TileSource, view_state::Viewport};

/// Fire-and-forget notification that a new text layer is ready to be drawn.
pub trait RedrawTrigger: Send + 'static {
    fn request_redraw(&self);
}

impl<F> RedrawTrigger for F
where
    F: Fn() + Send + 'static,
{
    fn request_redraw(&self) {
        (self)()
    }
}

/// Defines the collaborators the labeling subsystem is wired up with.
pub trait LabelEnvironment: 'static {
    type TileSource: TileSource;
    type Viewport: Viewport;
    type Resources: DrawResources + Default;
    type RedrawTrigger: RedrawTrigger;
}
