//! In-memory collaborators for running the labeling subsystem without a window or renderer.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, PoisonError,
};

use crate::{
    environment::{LabelEnvironment, RedrawTrigger},
    error::Error,
    text::VertexBuffers,
    tile::{TileSnapshot, TileSource},
    view_state::{ViewPose, Viewport},
};

/// Tile source which returns whatever snapshot was stored last.
#[derive(Clone, Default)]
pub struct SharedTileSource {
    current: Arc<Mutex<TileSnapshot>>,
}

impl SharedTileSource {
    pub fn new(snapshot: TileSnapshot) -> Self {
        Self {
            current: Arc::new(Mutex::new(snapshot)),
        }
    }

    pub fn replace(&self, snapshot: TileSnapshot) -> Result<(), Error> {
        *self
            .current
            .lock()
            .map_err(Error::poisoned("tile snapshot"))? = snapshot;
        Ok(())
    }
}

impl TileSource for SharedTileSource {
    fn active_tiles(&mut self, previous: Option<&TileSnapshot>) -> TileSnapshot {
        // A snapshot is never partially written, so a poisoned lock still holds a valid one.
        let current = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match previous {
            Some(previous) if previous.same_as(&current) => {
                log::trace!("tile snapshot unchanged");
            }
            _ => log::debug!(
                "tile snapshot replaced, {} tiles with {} labels",
                current.len(),
                current.label_count()
            ),
        }
        current
    }
}

/// Viewport whose pose is set from another thread.
#[derive(Clone, Default)]
pub struct SharedViewport {
    pose: Arc<Mutex<ViewPose>>,
}

impl SharedViewport {
    pub fn new(pose: ViewPose) -> Self {
        Self {
            pose: Arc::new(Mutex::new(pose)),
        }
    }

    pub fn set(&self, pose: ViewPose) {
        *self.pose.lock().unwrap_or_else(PoisonError::into_inner) = pose;
    }
}

impl Viewport for SharedViewport {
    fn current_pose(&self) -> ViewPose {
        *self.pose.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts redraw requests.
#[derive(Clone, Default)]
pub struct RedrawCounter {
    count: Arc<AtomicUsize>,
}

impl RedrawCounter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl RedrawTrigger for RedrawCounter {
    fn request_redraw(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct HeadlessEnvironment;

impl LabelEnvironment for HeadlessEnvironment {
    type TileSource = SharedTileSource;
    type Viewport = SharedViewport;
    type Resources = VertexBuffers;
    type RedrawTrigger = RedrawCounter;
}
